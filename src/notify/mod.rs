//! Best-effort email notifications.
//!
//! `Notifier` hands every email to a detached tokio task. Callers get a
//! `JoinHandle` they are free to drop; nothing on a request's success path
//! waits for delivery. Each outcome is logged and published as a
//! [`DeliveryReport`] on a broadcast channel. There is no retry.

pub mod log_mailer;
pub mod resend;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

pub use log_mailer::LogMailer;
pub use resend::ResendMailer;

/// Buffered reports per subscriber before old ones are dropped.
const REPORT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail transport error: {0}")]
    Transport(String),
    #[error("Mail provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// A way to deliver one email.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Short transport name for logs and health output.
    fn transport(&self) -> &'static str;

    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "detail", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Sent,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    pub to: String,
    pub subject: String,
    pub transport: &'static str,
    pub outcome: DeliveryOutcome,
}

#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    reports: broadcast::Sender<DeliveryReport>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        let (reports, _) = broadcast::channel(REPORT_CHANNEL_CAPACITY);
        Self { mailer, reports }
    }

    pub fn transport(&self) -> &'static str {
        self.mailer.transport()
    }

    /// Receive reports for every dispatch made after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<DeliveryReport> {
        self.reports.subscribe()
    }

    /// Send one email in the background.
    pub fn dispatch(&self, email: Email) -> JoinHandle<()> {
        self.dispatch_all(vec![email])
    }

    /// Send several emails concurrently in one background task. A failed
    /// delivery is reported on its own and does not affect the others.
    pub fn dispatch_all(&self, emails: Vec<Email>) -> JoinHandle<()> {
        let mailer = Arc::clone(&self.mailer);
        let reports = self.reports.clone();

        tokio::spawn(async move {
            let results = join_all(emails.iter().map(|email| mailer.send(email))).await;

            for (email, result) in emails.into_iter().zip(results) {
                let outcome = match result {
                    Ok(()) => {
                        tracing::info!(
                            to = %email.to,
                            subject = %email.subject,
                            transport = mailer.transport(),
                            "Notification sent"
                        );
                        DeliveryOutcome::Sent
                    }
                    Err(e) => {
                        tracing::warn!(
                            to = %email.to,
                            subject = %email.subject,
                            transport = mailer.transport(),
                            error = %e,
                            "Notification failed"
                        );
                        DeliveryOutcome::Failed(e.to_string())
                    }
                };

                // No subscribers is the normal case outside tests.
                let _ = reports.send(DeliveryReport {
                    to: email.to,
                    subject: email.subject,
                    transport: mailer.transport(),
                    outcome,
                });
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every email; fails for addresses listed in `fail_for`.
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<Email>>,
        pub fail_for: Vec<String>,
    }

    impl RecordingMailer {
        pub fn failing_for(addresses: &[&str]) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_for: addresses.iter().map(|a| a.to_string()).collect(),
            }
        }

        pub fn sent(&self) -> Vec<Email> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        fn transport(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, email: &Email) -> Result<(), MailError> {
            if self.fail_for.iter().any(|a| a == &email.to) {
                return Err(MailError::Transport("mailbox unavailable".into()));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }
}
