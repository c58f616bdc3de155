//! Technician routes over the request ledger.

use axum::{
    extract::{Path, State},
    response::{Html, Response},
    Extension,
};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::Technician;
use crate::routes::found;
use crate::views::{render, LedgerPage};

/// List every request.
///
/// GET /registros
pub async fn list_requests(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let requests = state.requests.list().await?;
    render(&LedgerPage::new(&requests))
}

/// Mark a request as completed.
///
/// POST /concluir/:id
pub async fn complete_request(
    State(state): State<AppState>,
    Extension(technician): Extension<Technician>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let changed = state.requests.complete(id).await?;

    info!(
        id,
        changed,
        technician = %technician.username,
        "Completion submitted"
    );

    Ok(found("/registros"))
}
