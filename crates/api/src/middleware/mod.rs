//! HTTP middleware components.

pub mod logging;
pub mod metrics;
pub mod security_headers;
pub mod technician_auth;
pub mod trace_id;

pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use security_headers::security_headers_middleware;
pub use technician_auth::{require_technician, Technician};
pub use trace_id::{trace_id, RequestId, REQUEST_ID_HEADER};
