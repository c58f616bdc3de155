//! HTML pages rendered with askama.

use askama::Template;
use axum::response::Html;
use domain::models::{MaintenanceRequest, RequestStatus};

use crate::error::ApiError;

/// Public submission form.
#[derive(Template)]
#[template(path = "formulario.html")]
pub struct RequestFormPage;

/// Technician ledger listing.
#[derive(Template)]
#[template(path = "registros.html")]
pub struct LedgerPage {
    pub rows: Vec<LedgerRow>,
}

/// One ledger line, flattened for the template.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub id: i64,
    pub requester_name: String,
    pub requester_email: String,
    pub equipment: String,
    pub description: String,
    pub created_date: String,
    pub status_label: String,
    /// CSS class matching the workbook row fill
    pub row_class: &'static str,
    /// Anything not yet completed can be completed
    pub completable: bool,
}

impl From<&MaintenanceRequest> for LedgerRow {
    fn from(request: &MaintenanceRequest) -> Self {
        let row_class = match request.status {
            RequestStatus::Completed => "concluida",
            RequestStatus::Open => "aberta",
            RequestStatus::Other(_) => "",
        };

        Self {
            id: request.id,
            requester_name: request.requester_name.clone(),
            requester_email: request.requester_email.clone(),
            equipment: request.equipment.clone(),
            description: request.description.clone(),
            created_date: request.created_date.clone(),
            status_label: request.status.label().to_string(),
            row_class,
            completable: !request.is_completed(),
        }
    }
}

impl LedgerPage {
    pub fn new(requests: &[MaintenanceRequest]) -> Self {
        Self {
            rows: requests.iter().map(LedgerRow::from).collect(),
        }
    }
}

/// Render a template into an HTML response.
pub fn render<T: Template>(page: &T) -> Result<Html<String>, ApiError> {
    Ok(Html(page.render()?))
}
