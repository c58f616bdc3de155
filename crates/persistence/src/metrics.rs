//! Record store metrics collection.

use metrics::histogram;
use std::time::Instant;

/// Record how long a store operation took.
pub fn record_store_duration(operation: &str, duration_secs: f64) {
    histogram!(
        "store_operation_duration_seconds",
        "operation" => operation.to_string()
    )
    .record(duration_secs);
}

/// Times a load or save and records it when finished.
///
/// ```ignore
/// let timer = StoreTimer::new("load");
/// let result = read_ledger(&path);
/// timer.record();
/// result
/// ```
pub struct StoreTimer {
    operation: &'static str,
    start: Instant,
}

impl StoreTimer {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        record_store_duration(self.operation, self.start.elapsed().as_secs_f64());
    }
}
