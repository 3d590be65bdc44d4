use async_trait::async_trait;
use tracing::debug;

use studyassist_protocol::study::{
    STUDY_PATH, StudyErrorBody, StudyRequestBody, StudyResponseBody,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Non-2xx reply; `message` is the server's `error` field when it sent one.
    #[error("Error {status}{}", message_suffix(.message))]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!(": {message}"),
        _ => String::new(),
    }
}

/// The single HTTP call the controller makes.
#[async_trait]
pub trait StudyTransport: Send + Sync {
    async fn post_study(
        &self,
        body: &StudyRequestBody,
    ) -> Result<StudyResponseBody, TransportError>;
}

#[derive(Clone)]
pub struct WreqTransport {
    endpoint: String,
    client: wreq::Client,
}

impl WreqTransport {
    pub fn new(server_base_url: &str) -> Result<Self, TransportError> {
        let client = wreq::Client::builder()
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(Self::with_client(server_base_url, client))
    }

    pub fn with_client(server_base_url: &str, client: wreq::Client) -> Self {
        Self {
            endpoint: format!("{}{STUDY_PATH}", server_base_url.trim_end_matches('/')),
            client,
        }
    }

    #[cfg(test)]
    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StudyTransport for WreqTransport {
    async fn post_study(
        &self,
        body: &StudyRequestBody,
    ) -> Result<StudyResponseBody, TransportError> {
        let payload =
            serde_json::to_vec(body).map_err(|err| TransportError::Decode(err.to_string()))?;
        let resp = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        let status = resp.status().as_u16();
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        debug!(status, bytes = bytes.len(), "study reply received");

        if !(200..300).contains(&status) {
            let message = serde_json::from_slice::<StudyErrorBody>(&bytes)
                .ok()
                .map(|body| body.error);
            return Err(TransportError::Status { status, message });
        }
        serde_json::from_slice(&bytes).map_err(|err| TransportError::Decode(err.to_string()))
    }
}
