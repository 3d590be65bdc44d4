use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-lite";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, thiserror::Error)]
pub enum GlobalConfigError {
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Final, merged global configuration used by the running process.
///
/// Merge order: CLI > ENV > defaults.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub host: String,
    pub port: u16,
    /// Missing key is not a startup error; requests fail with 500 until one is set.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Optional outbound proxy (for upstream egress).
    pub proxy: Option<String>,
    /// Whole-request timeout for the upstream call; none by default.
    pub request_timeout_secs: Option<u64>,
}

impl GlobalConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            proxy: None,
            request_timeout_secs: None,
        }
    }
}

// Hand-written so the api key never reaches logs through `{:?}`.
impl std::fmt::Debug for GlobalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("gemini_api_key", &self.api_key().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("proxy", &self.proxy)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Optional layer used for merging global config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalConfigPatch {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,
    pub proxy: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl GlobalConfigPatch {
    pub fn overlay(&mut self, other: GlobalConfigPatch) {
        if other.host.is_some() {
            self.host = other.host;
        }
        if other.port.is_some() {
            self.port = other.port;
        }
        if other.gemini_api_key.is_some() {
            self.gemini_api_key = other.gemini_api_key;
        }
        if other.gemini_model.is_some() {
            self.gemini_model = other.gemini_model;
        }
        if other.gemini_base_url.is_some() {
            self.gemini_base_url = other.gemini_base_url;
        }
        if other.proxy.is_some() {
            self.proxy = other.proxy;
        }
        if other.request_timeout_secs.is_some() {
            self.request_timeout_secs = other.request_timeout_secs;
        }
    }

    pub fn into_config(self) -> Result<GlobalConfig, GlobalConfigError> {
        let gemini_base_url = self
            .gemini_base_url
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());
        if !(gemini_base_url.starts_with("http://") || gemini_base_url.starts_with("https://")) {
            return Err(GlobalConfigError::InvalidValue {
                field: "gemini_base_url",
                value: gemini_base_url,
            });
        }
        if self.request_timeout_secs == Some(0) {
            return Err(GlobalConfigError::InvalidValue {
                field: "request_timeout_secs",
                value: "0".to_string(),
            });
        }
        Ok(GlobalConfig {
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            gemini_api_key: self.gemini_api_key,
            gemini_model: self
                .gemini_model
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: gemini_base_url.trim_end_matches('/').to_string(),
            proxy: self.proxy,
            request_timeout_secs: self.request_timeout_secs,
        })
    }
}
