//! Event relay
//!
//! Pushes domain events (new inquiry, contact submission) to an
//! external consumer, typically a chat webhook. Delivery is best-effort
//! and never blocks the request that produced the event.

use std::sync::Arc;

use async_trait::async_trait;

use shared::error::AppError;

/// Event fan-out backend
#[async_trait]
pub trait RelayPublisher: Send + Sync {
    async fn publish(&self, event: &str, payload: serde_json::Value) -> Result<(), AppError>;
}

/// Posts events as JSON to an external webhook
pub struct WebhookRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookRelay {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl RelayPublisher for WebhookRelay {
    async fn publish(&self, event: &str, payload: serde_json::Value) -> Result<(), AppError> {
        let body = serde_json::json!({ "event": event, "payload": payload });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Relay unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::internal(format!(
                "Relay returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Logs events instead of delivering them
pub struct LogRelay;

#[async_trait]
impl RelayPublisher for LogRelay {
    async fn publish(&self, event: &str, payload: serde_json::Value) -> Result<(), AppError> {
        tracing::debug!(event = event, payload = %payload, "Relay not configured, event logged only");
        Ok(())
    }
}

/// Publish without waiting. Failures are logged, not surfaced.
pub fn publish_background(relay: Arc<dyn RelayPublisher>, event: &'static str, payload: serde_json::Value) {
    tokio::spawn(async move {
        if let Err(e) = relay.publish(event, payload).await {
            tracing::warn!(event = event, "Event relay failed: {e}");
        }
    });
}
