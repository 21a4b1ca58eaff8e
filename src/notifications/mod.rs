/*!
 * # Outbound Email
 *
 * Procurement documents leave the system as emails: RFQs and purchase orders
 * go to a single vendor, announcements fan out to every visible vendor over
 * BCC, and account flows (verification, password reset) send links to users.
 *
 * The `Mailer` trait hides the transport. Production uses SMTP via lettre;
 * development defaults to a logging mailer, and tests capture messages with
 * the in-memory implementation.
 */

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{error, info};

#[cfg(test)]
use mockall::automock;

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::metrics::BUSINESS_METRICS;

/// Mailer errors
#[derive(Error, Debug)]
pub enum MailerError {
    #[error("Invalid email address '{0}'")]
    InvalidAddress(String),
    #[error("Failed to build message: {0}")]
    MessageBuild(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Outgoing email envelope.
///
/// Announcement fan-out goes through `bcc` so vendor addresses are not
/// disclosed to each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub to: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl OutboundEmail {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            to: vec![to.into()],
            bcc: Vec::new(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// A broadcast message with every recipient on BCC
    pub fn broadcast(
        bcc: Vec<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            to: Vec::new(),
            bcc,
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.bcc.len()
    }
}

/// Transport abstraction for outgoing mail
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError>;
}

/// SMTP mailer backed by lettre
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        from: &str,
    ) -> Result<Self, MailerError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| MailerError::Transport(e.to_string()))?
            .port(port);

        if let (Some(user), Some(pass)) = (username, password) {
            builder = builder.credentials(Credentials::new(user.to_string(), pass.to_string()));
        }

        let from = from
            .parse::<Mailbox>()
            .map_err(|_| MailerError::InvalidAddress(from.to_string()))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, email: &OutboundEmail) -> Result<Message, MailerError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(email.subject.clone());

        for to in &email.to {
            let mailbox = to
                .parse::<Mailbox>()
                .map_err(|_| MailerError::InvalidAddress(to.clone()))?;
            builder = builder.to(mailbox);
        }
        // BCC-only broadcasts need a visible recipient; address them to ourselves
        if email.to.is_empty() {
            builder = builder.to(self.from.clone());
        }
        for bcc in &email.bcc {
            let mailbox = bcc
                .parse::<Mailbox>()
                .map_err(|_| MailerError::InvalidAddress(bcc.clone()))?;
            builder = builder.bcc(mailbox);
        }

        builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| MailerError::MessageBuild(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        let message = self.build_message(&email)?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailerError::Transport(e.to_string()))
    }
}

/// Mailer that logs messages instead of delivering them (development default)
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        info!(
            subject = %email.subject,
            to = ?email.to,
            bcc_count = email.bcc.len(),
            "Email (log backend):\n{}",
            email.body
        );
        Ok(())
    }
}

/// In-memory mailer that captures messages for inspection in tests
#[derive(Debug, Default, Clone)]
pub struct InMemoryMailer {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Builds the mailer selected by configuration
pub fn build_mailer(config: &AppConfig) -> Result<Arc<dyn Mailer>, MailerError> {
    match config.mailer_backend.to_ascii_lowercase().as_str() {
        "smtp" => {
            let host = config
                .smtp_host
                .as_deref()
                .ok_or_else(|| MailerError::Transport("smtp_host is not configured".into()))?;
            let mailer = SmtpMailer::new(
                host,
                config.smtp_port,
                config.smtp_username.as_deref(),
                config.smtp_password.as_deref(),
                &config.smtp_from,
            )?;
            Ok(Arc::new(mailer))
        }
        _ => Ok(Arc::new(LogMailer)),
    }
}

/// Sends an email through the given mailer, recording metrics and mapping
/// transport failures onto the service error space.
pub async fn deliver(mailer: &dyn Mailer, email: OutboundEmail) -> Result<(), ServiceError> {
    let subject = email.subject.clone();
    let recipients = email.recipient_count();

    match mailer.send(email).await {
        Ok(()) => {
            BUSINESS_METRICS.emails_sent.inc();
            info!(subject = %subject, recipients, "Email sent");
            Ok(())
        }
        Err(e) => {
            BUSINESS_METRICS.emails_failed.inc();
            error!(subject = %subject, error = %e, "Email delivery failed");
            Err(ServiceError::EmailError(e.to_string()))
        }
    }
}

/// Renders a plain-text body around a document snapshot.
///
/// The snapshot is the JSON representation of the document at send time, so
/// the recipient sees the exact content that was dispatched even if the
/// document changes later.
pub fn document_email_body(heading: &str, snapshot: &serde_json::Value) -> String {
    let rendered = serde_json::to_string_pretty(snapshot)
        .unwrap_or_else(|_| snapshot.to_string());
    format!("{}\n\n{}\n", heading, rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn in_memory_mailer_captures_sent_mail() {
        let mailer = InMemoryMailer::new();
        let email = OutboundEmail::new("vendor@example.com", "RFQ000001", "body");

        mailer.send(email).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["vendor@example.com".to_string()]);
        assert_eq!(sent[0].subject, "RFQ000001");
    }

    #[tokio::test]
    async fn broadcast_puts_all_recipients_on_bcc() {
        let email = OutboundEmail::broadcast(
            vec!["a@example.com".into(), "b@example.com".into()],
            "New catalog",
            "body",
        );

        assert!(email.to.is_empty());
        assert_eq!(email.bcc.len(), 2);
        assert_eq!(email.recipient_count(), 2);
    }

    #[tokio::test]
    async fn deliver_maps_transport_failure_to_email_error() {
        let mut mock = MockMailer::new();
        mock.expect_send()
            .returning(|_| Err(MailerError::Transport("connection refused".into())));

        let result = deliver(
            &mock,
            OutboundEmail::new("vendor@example.com", "PO000001", "body"),
        )
        .await;

        assert!(matches!(result, Err(ServiceError::EmailError(_))));
    }

    #[test]
    fn document_email_body_embeds_pretty_snapshot() {
        let snapshot = json!({"id": "RFQ000001", "items": []});
        let body = document_email_body("Please quote the following request.", &snapshot);

        assert!(body.starts_with("Please quote the following request."));
        assert!(body.contains("\"id\": \"RFQ000001\""));
    }
}
