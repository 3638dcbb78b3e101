//! Transactional-email HTTP API transport (Resend-compatible `POST /emails`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::{Email, MailError, Mailer};

pub const DEFAULT_API_URL: &str = "https://api.resend.com";

const REQUEST_TIMEOUT_SECS: u64 = 15;

pub struct ResendMailer {
    base_url: String,
    api_key: String,
    from: String,
    client: reqwest::Client,
}

/// Request body for `POST /emails`
#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

impl ResendMailer {
    pub fn new(base_url: &str, api_key: &str, from: &str) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| MailError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
            client,
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    fn transport(&self) -> &'static str {
        "resend"
    }

    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let url = format!("{}/emails", self.base_url);
        let body = SendEmailRequest {
            from: &self.from,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
            reply_to: email.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MailError::Transport(format!(
                        "Request timed out after {REQUEST_TIMEOUT_SECS}s"
                    ))
                } else {
                    MailError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
