//! Email service for technician notifications.
//!
//! Supports two providers:
//! - `console`: Logs emails to console (development)
//! - `smtp`: Sends via an SMTP relay (STARTTLS, then authenticates)

use crate::config::EmailConfig;
use domain::services::{NewRequestNotice, NotificationResult, RequestNotifier};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build email: {0}")]
    BuildFailed(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Address replies should go to
    pub reply_to: Option<String>,
    pub subject: String,
    /// Plain text body
    pub body_text: String,
}

/// Email service sending the technician notification.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Check if email service is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Mail for a new maintenance request, addressed to the technician.
    pub fn new_request_message(&self, notice: &NewRequestNotice) -> EmailMessage {
        EmailMessage {
            to: self.config.technician_email.clone(),
            reply_to: Some(notice.requester_email.clone()),
            subject: notice.subject().to_string(),
            body_text: notice.body(),
        }
    }

    /// Send an email message.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message).await,
            "smtp" => self.send_smtp(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Builds the MIME message: plain text, `Reply-To` set when given.
    ///
    /// Requester addresses are free text. One that is not a valid mailbox is
    /// dropped from `Reply-To` and the mail goes out without it.
    pub fn build_message(&self, message: &EmailMessage) -> Result<Message, EmailError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.config.sender_email)?)
            .to(parse_mailbox(&message.to)?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN);

        if let Some(reply_to) = &message.reply_to {
            match parse_mailbox(reply_to) {
                Ok(mailbox) => builder = builder.reply_to(mailbox),
                Err(err) => warn!(error = %err, "Sending without Reply-To"),
            }
        }

        builder
            .body(message.body_text.clone())
            .map_err(|e| EmailError::BuildFailed(e.to_string()))
    }

    /// Console provider - logs email to console (for development).
    async fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            reply_to = ?message.reply_to,
            subject = %message.subject,
            from = %self.config.sender_email,
            "📧 Email (console provider)"
        );

        info!(
            body_text = %message.body_text,
            "📧 Email body (plain text)"
        );

        Ok(())
    }

    /// SMTP provider - one session per message, no pooling.
    async fn send_smtp(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.smtp_host.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let email = self.build_message(&message)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendFailed(format!("SMTP relay setup failed: {}", e)))?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            ))
            .timeout(Some(Duration::from_secs(self.config.smtp_timeout_secs)))
            .build();

        mailer
            .send(email)
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        info!(
            to = %message.to,
            subject = %message.subject,
            smtp_host = %self.config.smtp_host,
            "📧 Email sent via SMTP"
        );
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .trim()
        .parse()
        .map_err(|e| EmailError::InvalidAddress(format!("{}: {}", address, e)))
}

#[async_trait::async_trait]
impl RequestNotifier for EmailService {
    async fn notify_new_request(&self, notice: &NewRequestNotice) -> NotificationResult {
        if !self.is_enabled() {
            return NotificationResult::Skipped;
        }

        match self.send(self.new_request_message(notice)).await {
            Ok(()) => NotificationResult::Sent,
            Err(err) => NotificationResult::Failed(err.to_string()),
        }
    }
}
