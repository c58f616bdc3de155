//! Health check endpoint handler.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: StoreHealth,
}

/// Ledger readability.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreHealth {
    pub readable: bool,
    pub records: Option<usize>,
}

/// Health check endpoint.
///
/// Loads the ledger; answers 503 when it cannot be read.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let records = match state.requests.list().await {
        Ok(records) => Some(records.len()),
        Err(err) => {
            warn!(error = %err, "Health check could not read the ledger");
            None
        }
    };
    let readable = records.is_some();

    let response = HealthResponse {
        status: if readable { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: StoreHealth { readable, records },
    };

    let status = if readable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
