//! Outgoing mail
//!
//! Delivery goes through a webhook relay when one is configured;
//! otherwise mail is logged and dropped so the rest of the system keeps
//! working in development.

use async_trait::async_trait;

use shared::error::AppError;

/// Mail delivery backend
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError>;
}

/// Posts mail as JSON to an external relay endpoint
pub struct WebhookMailer {
    client: reqwest::Client,
    endpoint: String,
    from: String,
}

impl WebhookMailer {
    pub fn new(endpoint: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            from,
        }
    }
}

#[async_trait]
impl Mailer for WebhookMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        let payload = serde_json::json!({
            "from": self.from,
            "to": to,
            "subject": subject,
            "body": body,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Mail relay unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::internal(format!(
                "Mail relay returned {}",
                response.status()
            )));
        }

        tracing::info!(to = to, "Mail delivered via relay");
        Ok(())
    }
}

/// Logs mail instead of sending it
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), AppError> {
        tracing::info!(to = to, subject = subject, "Mail relay not configured, message logged only");
        Ok(())
    }
}
