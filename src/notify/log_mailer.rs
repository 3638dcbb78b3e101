use async_trait::async_trait;

use super::{Email, MailError, Mailer};

/// Used when no mail provider is configured: the email is written to the log.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    fn transport(&self) -> &'static str {
        "log"
    }

    async fn send(&self, email: &Email) -> Result<(), MailError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "No mail provider configured, email logged instead"
        );
        tracing::debug!(body = %email.text, "Logged email body");
        Ok(())
    }
}
