use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::repository::{NotifyError, WebhookNotifier, WebhookPayload};

/// Posts the payload as JSON to a fixed endpoint. Success is a 2xx status with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpWebhookNotifier {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpWebhookNotifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WebhookNotifier for HttpWebhookNotifier {
    async fn notify(&self, payload: &WebhookPayload) -> Result<(), NotifyError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        // The body is not consumed beyond confirming it parses.
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|err| NotifyError::InvalidBody(err.to_string()))?;

        debug!(endpoint = %self.endpoint, status = status.as_u16(), "webhook accepted payload");
        Ok(())
    }
}
