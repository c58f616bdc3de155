//! Maintenance request domain model.

use serde::{Deserialize, Serialize};
use shared::validation::{validate_not_empty, MAX_FIELD_CHARS};
use validator::Validate;

/// Ledger label for an open request.
pub const STATUS_OPEN_LABEL: &str = "Aberta";

/// Ledger label for a completed request.
pub const STATUS_COMPLETED_LABEL: &str = "Concluída";

/// Status of a maintenance request.
///
/// `Other` keeps whatever a hand-edited ledger contains so it survives a
/// load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum RequestStatus {
    Open,
    Completed,
    Other(String),
}

impl RequestStatus {
    /// Label written to the `Status` column.
    pub fn label(&self) -> &str {
        match self {
            RequestStatus::Open => STATUS_OPEN_LABEL,
            RequestStatus::Completed => STATUS_COMPLETED_LABEL,
            RequestStatus::Other(raw) => raw,
        }
    }

    /// Parses a stored label. English names are accepted as well.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            STATUS_OPEN_LABEL | "Open" => RequestStatus::Open,
            STATUS_COMPLETED_LABEL | "Completed" => RequestStatus::Completed,
            other => RequestStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for RequestStatus {
    fn from(value: String) -> Self {
        RequestStatus::from_label(&value)
    }
}

impl From<RequestStatus> for String {
    fn from(value: RequestStatus) -> Self {
        value.label().to_string()
    }
}

/// A single entry in the maintenance ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MaintenanceRequest {
    pub id: i64,
    pub requester_name: String,
    pub requester_email: String,
    pub equipment: String,
    pub description: String,
    /// Local calendar date, `dd/mm/yyyy`.
    pub created_date: String,
    pub status: RequestStatus,
}

impl MaintenanceRequest {
    /// Builds a freshly submitted request. New requests always start open.
    pub fn open(id: i64, form: SubmitRequestForm, created_date: String) -> Self {
        Self {
            id,
            requester_name: form.requester_name,
            requester_email: form.requester_email,
            equipment: form.equipment,
            description: form.description,
            created_date,
            status: RequestStatus::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == RequestStatus::Open
    }

    pub fn is_completed(&self) -> bool {
        self.status == RequestStatus::Completed
    }

    /// Sets the status to `Completed`, whatever it was before.
    ///
    /// Returns `true` when the status changed. Completing an already completed
    /// request is a no-op.
    pub fn complete(&mut self) -> bool {
        if self.is_completed() {
            return false;
        }
        self.status = RequestStatus::Completed;
        true
    }
}

/// Id handed to the next submission: one past the current ledger size.
///
/// This is not a unique key. If rows are removed from the ledger by hand the
/// next id collides with an existing one.
pub fn next_request_id(existing: usize) -> i64 {
    i64::try_from(existing).map_or(i64::MAX, |count| count.saturating_add(1))
}

/// Form payload posted to `/nova`.
///
/// Every field is required and must fit in one ledger cell.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitRequestForm {
    #[serde(rename = "solicitante")]
    #[validate(
        length(max = MAX_FIELD_CHARS, code = "too_long"),
        custom(function = "validate_not_empty")
    )]
    pub requester_name: String,

    #[serde(rename = "email_solicitante")]
    #[validate(
        length(max = MAX_FIELD_CHARS, code = "too_long"),
        custom(function = "validate_not_empty")
    )]
    pub requester_email: String,

    #[serde(rename = "equipamento")]
    #[validate(
        length(max = MAX_FIELD_CHARS, code = "too_long"),
        custom(function = "validate_not_empty")
    )]
    pub equipment: String,

    #[serde(rename = "descricao")]
    #[validate(
        length(max = MAX_FIELD_CHARS, code = "too_long"),
        custom(function = "validate_not_empty")
    )]
    pub description: String,
}
