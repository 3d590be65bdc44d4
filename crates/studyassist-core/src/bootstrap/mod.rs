use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::info;

use studyassist_common::{GlobalConfig, GlobalConfigPatch};

use crate::gateway::GeminiGateway;
use crate::state::AppState;

#[derive(Debug, Clone, Default, Args)]
pub struct CliArgs {
    /// Bind host.
    #[arg(long, env = "STUDYASSIST_HOST")]
    pub host: Option<String>,

    /// Bind port.
    #[arg(long, env = "STUDYASSIST_PORT")]
    pub port: Option<String>,

    /// Gemini API key. Requests fail with 500 while it is unset.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model id.
    #[arg(long, env = "GEMINI_MODEL")]
    pub gemini_model: Option<String>,

    /// Base URL of the generative-language API.
    #[arg(long, env = "GEMINI_BASE_URL")]
    pub gemini_base_url: Option<String>,

    /// Optional outbound proxy for upstream requests.
    #[arg(long, env = "STUDYASSIST_PROXY")]
    pub proxy: Option<String>,

    /// Whole-request timeout for the upstream call, in seconds.
    #[arg(long, env = "STUDYASSIST_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<String>,
}

pub struct Bootstrap {
    pub state: Arc<AppState>,
    pub gateway: Arc<GeminiGateway>,
}

/// clap already applies CLI > ENV precedence per field; this overlays the result on defaults.
pub fn resolve_config(args: CliArgs) -> anyhow::Result<GlobalConfig> {
    let patch = GlobalConfigPatch {
        host: sanitize_optional_env_value(args.host),
        port: parse_env_value::<u16>(args.port, "STUDYASSIST_PORT")?,
        gemini_api_key: sanitize_optional_env_value(args.gemini_api_key),
        gemini_model: sanitize_optional_env_value(args.gemini_model),
        gemini_base_url: sanitize_optional_env_value(args.gemini_base_url),
        proxy: sanitize_optional_env_value(args.proxy),
        request_timeout_secs: parse_env_value::<u64>(
            args.request_timeout_secs,
            "STUDYASSIST_REQUEST_TIMEOUT_SECS",
        )?,
    };
    let mut merged = GlobalConfigPatch::default();
    merged.overlay(patch);
    merged
        .into_config()
        .context("finalize merged global config")
}

pub fn bootstrap(args: CliArgs) -> anyhow::Result<Bootstrap> {
    let global = resolve_config(args)?;
    info!(
        host = %global.host,
        port = global.port,
        model = %global.gemini_model,
        base_url = %global.gemini_base_url,
        api_key_set = global.api_key().is_some(),
        proxy = %global.proxy.as_deref().unwrap_or(""),
        "config loaded"
    );
    let state = Arc::new(AppState::new(global));
    let gateway = GeminiGateway::from_state(state.clone()).context("build upstream client")?;
    Ok(Bootstrap {
        state,
        gateway: Arc::new(gateway),
    })
}

fn sanitize_optional_env_value(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    if trimmed.is_empty() {
        return None;
    }
    // Some PaaS systems may inject unresolved placeholders like `${VAR}`.
    if trimmed.starts_with("${") && trimmed.ends_with('}') {
        return None;
    }
    Some(trimmed)
}

fn parse_env_value<T: std::str::FromStr>(
    value: Option<String>,
    env_name: &str,
) -> anyhow::Result<Option<T>> {
    let Some(raw) = sanitize_optional_env_value(value) else {
        return Ok(None);
    };
    let parsed = raw
        .parse::<T>()
        .map_err(|_| anyhow::anyhow!("invalid {env_name} value: {raw}"))?;
    Ok(Some(parsed))
}
