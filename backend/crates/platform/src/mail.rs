//! Outbound Mail
//!
//! Delivery is a collaborator behind [`Mailer`]; the bundled [`LogMailer`]
//! writes messages to the log instead of sending them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError>;
}

/// Mailer that logs each message at INFO level
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        tracing::info!(to = %to, subject = %subject, body = %html, "Outbound mail");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{LogMailer, Mailer};

    #[tokio::test]
    async fn test_log_mailer_accepts_messages() {
        let mailer = LogMailer;
        assert!(
            mailer
                .send("bob@example.com", "Hello", "<p>hi</p>")
                .await
                .is_ok()
        );
    }
}
