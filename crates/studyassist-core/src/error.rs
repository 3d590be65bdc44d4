/// Rejections raised before any upstream call is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No lesson text provided.")]
    EmptyText,
    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),
    #[error("Invalid request body: {0}")]
    MalformedBody(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("API Key is missing. Set GEMINI_API_KEY.")]
    MissingApiKey,
}
