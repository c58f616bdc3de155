//! Public intake routes: the submission form and its target.

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, Response},
    Form,
};
use domain::models::SubmitRequestForm;
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::found;
use crate::views::{render, RequestFormPage};

/// Render the submission form.
///
/// GET /
pub async fn show_form() -> Result<Html<String>, ApiError> {
    render(&RequestFormPage)
}

/// Register a new maintenance request.
///
/// POST /nova
///
/// Missing fields are rejected by the form extractor, empty or oversized
/// ones by validation. Both answer 400.
pub async fn submit_request(
    State(state): State<AppState>,
    form: Result<Form<SubmitRequestForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(form) = form.map_err(|rejection| {
        debug!(error = %rejection, "Rejected request form");
        ApiError::Validation(rejection.body_text())
    })?;

    state.requests.create(form).await?;
    Ok(found("/"))
}
