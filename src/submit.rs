//! Client side of the relay contract — posts a lead to `/api/submit-form`.

use async_trait::async_trait;

use crate::error::SubmitError;
use crate::lead::LeadSubmission;

/// Relay path for lead submissions.
pub const SUBMIT_PATH: &str = "/api/submit-form";

/// Something that can deliver a lead to the relay.
#[async_trait]
pub trait LeadSubmitter: Send + Sync {
    async fn submit(&self, submission: &LeadSubmission) -> Result<(), SubmitError>;
}

/// Submits leads over HTTP. One attempt per call, no retry, no timeout.
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(relay_base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{SUBMIT_PATH}", relay_base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LeadSubmitter for HttpSubmitter {
    async fn submit(&self, submission: &LeadSubmission) -> Result<(), SubmitError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await
            .map_err(|e| SubmitError::Http(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(SubmitError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
