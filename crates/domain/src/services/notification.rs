//! Technician notification for new maintenance requests.
//!
//! Notification is best-effort: implementations report failures through
//! [`NotificationResult`] instead of returning errors, so the submission flow
//! never stops because a mail could not be delivered.

use std::sync::{Arc, Mutex};

use crate::models::MaintenanceRequest;

/// Subject line used for every new-request mail.
pub const NEW_REQUEST_SUBJECT: &str = "📢 Nova Solicitação de Manutenção Preventiva";

/// The facts a technician gets about a newly registered request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequestNotice {
    pub requester_name: String,
    /// Used as the `Reply-To` of the outgoing mail.
    pub requester_email: String,
    pub equipment: String,
    pub description: String,
    pub created_date: String,
}

impl NewRequestNotice {
    pub fn subject(&self) -> &'static str {
        NEW_REQUEST_SUBJECT
    }

    /// Plain-text body of the technician mail.
    pub fn body(&self) -> String {
        format!(
            r#"
Olá, técnico responsável!

Uma nova solicitação de manutenção preventiva foi registrada:

🧑 Solicitante: {name} ({email})
🛠️ Equipamento: {equipment}
📝 Descrição: {description}
📅 Data: {date}

Por favor, verifique o sistema e agende a manutenção.
"#,
            name = self.requester_name,
            email = self.requester_email,
            equipment = self.equipment,
            description = self.description,
            date = self.created_date,
        )
    }
}

impl From<&MaintenanceRequest> for NewRequestNotice {
    fn from(request: &MaintenanceRequest) -> Self {
        Self {
            requester_name: request.requester_name.clone(),
            requester_email: request.requester_email.clone(),
            equipment: request.equipment.clone(),
            description: request.description.clone(),
            created_date: request.created_date.clone(),
        }
    }
}

/// Result of a notification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    /// The mail was handed to the relay.
    Sent,
    /// Notifications are disabled by configuration.
    Skipped,
    /// Delivery failed; the reason has already been logged.
    Failed(String),
}

/// Sends the technician a notice about a new request.
#[async_trait::async_trait]
pub trait RequestNotifier: Send + Sync {
    async fn notify_new_request(&self, notice: &NewRequestNotice) -> NotificationResult;
}

/// Mock notifier for development and testing.
///
/// Records every notice it receives. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MockRequestNotifier {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
    received: Arc<Mutex<Vec<NewRequestNotice>>>,
}

impl MockRequestNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock notifier that simulates delivery failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Notices received so far, oldest first.
    pub fn received(&self) -> Vec<NewRequestNotice> {
        self.received
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl RequestNotifier for MockRequestNotifier {
    async fn notify_new_request(&self, notice: &NewRequestNotice) -> NotificationResult {
        if let Ok(mut notices) = self.received.lock() {
            notices.push(notice.clone());
        }

        if self.simulate_failure {
            tracing::warn!(
                reply_to = %notice.requester_email,
                "Mock notifier simulating failure"
            );
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            reply_to = %notice.requester_email,
            equipment = %notice.equipment,
            "Mock: Would send new request notification"
        );

        NotificationResult::Sent
    }
}
