//! Outbound webhook — receives a verbatim copy of every accepted lead.

use serde_json::Value;

use crate::error::RelayError;

/// Posts lead payloads to the configured webhook. No auth, no retry.
pub struct WebhookForwarder {
    client: reqwest::Client,
    url: String,
}

impl WebhookForwarder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Forward `payload` as-is. Unreachable hosts and non-2xx answers are
    /// both reported as `UpstreamDelivery`.
    pub async fn forward(&self, payload: &Value) -> Result<(), RelayError> {
        let resp = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| RelayError::UpstreamDelivery(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RelayError::UpstreamDelivery(format!(
                "webhook answered {status}"
            )));
        }
        Ok(())
    }
}
