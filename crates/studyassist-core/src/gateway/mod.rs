//! Provider gateway: one generateContent call per prompt, normalized into a
//! [`GenerationResult`].

mod normalize;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{info, warn};

use studyassist_protocol::gemini::generate_content::{
    GenerateContentPath, GenerateContentRequestBody, HarmBlockThreshold, HarmCategory,
    SafetySetting,
};

use crate::error::ConfigError;
use crate::state::AppState;
use crate::upstream_client::{
    UpstreamClient, UpstreamClientConfig, UpstreamHttpRequest, WreqUpstreamClient,
};

pub use normalize::normalize_response;

pub const SAFETY_BLOCKED_MESSAGE: &str =
    "⚠️ Content was blocked by safety filters. Try rephrasing your text.";
pub const NO_OUTPUT_MESSAGE: &str = "No output produced.";

/// Outcome of one generation. Exactly one variant per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success(String),
    /// The call succeeded but the provider withheld the content.
    SafetyBlocked,
    /// Non-2xx from the provider; `details` is the raw body, unparsed.
    ProviderError { status: u16, details: String },
    InternalError(String),
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, ConfigError>;
}

/// Lenient defaults: block only high-severity harassment and hate speech.
pub fn default_safety_settings() -> Vec<SafetySetting> {
    vec![
        SafetySetting {
            category: HarmCategory::HarmCategoryHarassment,
            threshold: HarmBlockThreshold::BlockOnlyHigh,
        },
        SafetySetting {
            category: HarmCategory::HarmCategoryHateSpeech,
            threshold: HarmBlockThreshold::BlockOnlyHigh,
        },
    ]
}

pub struct GeminiGateway {
    state: Arc<AppState>,
    client: Arc<dyn UpstreamClient>,
}

impl GeminiGateway {
    pub fn new(state: Arc<AppState>, client: Arc<dyn UpstreamClient>) -> Self {
        Self { state, client }
    }

    /// Gateway over a wreq client that follows the live proxy/timeout settings.
    pub fn from_state(state: Arc<AppState>) -> Result<Self, wreq::Error> {
        let resolver_state = state.clone();
        let client = WreqUpstreamClient::new_with_resolver(move || {
            UpstreamClientConfig::from_global(&resolver_state.config())
        })?;
        Ok(Self::new(state, Arc::new(client)))
    }
}

pub fn generate_content_url(base_url: &str, model: &str, api_key: &str) -> String {
    let path = GenerateContentPath {
        model: model.to_string(),
    };
    format!(
        "{}/v1beta/{}:generateContent?key={}",
        base_url.trim_end_matches('/'),
        path.normalized_model(),
        urlencoding::encode(api_key)
    )
}

#[async_trait]
impl ContentGenerator for GeminiGateway {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, ConfigError> {
        let config = self.state.config();
        let api_key = config.api_key().ok_or(ConfigError::MissingApiKey)?;

        let body = GenerateContentRequestBody::single_prompt(prompt, default_safety_settings());
        let body = match serde_json::to_vec(&body) {
            Ok(body) => body,
            Err(err) => return Ok(GenerationResult::InternalError(err.to_string())),
        };
        let request = UpstreamHttpRequest {
            url: generate_content_url(&config.gemini_base_url, &config.gemini_model, api_key),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("accept".to_string(), "application/json".to_string()),
            ],
            body: Bytes::from(body),
        };

        let started_at = Instant::now();
        info!(
            event = "upstream_sent",
            model = %config.gemini_model,
            prompt_chars = prompt.chars().count()
        );
        let response = match self.client.post(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    event = "upstream_failed",
                    error = %err,
                    elapsed_ms = started_at.elapsed().as_millis()
                );
                return Ok(GenerationResult::InternalError(err.to_string()));
            }
        };
        info!(
            event = "upstream_responded",
            status = response.status,
            elapsed_ms = started_at.elapsed().as_millis()
        );
        Ok(normalize_response(&response))
    }
}
