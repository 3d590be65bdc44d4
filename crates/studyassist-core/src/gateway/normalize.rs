use tracing::{debug, warn};

use studyassist_protocol::gemini::generate_content::{FinishReason, GenerateContentResponse};

use crate::gateway::{GenerationResult, NO_OUTPUT_MESSAGE};
use crate::upstream_client::UpstreamHttpResponse;

pub fn normalize_response(response: &UpstreamHttpResponse) -> GenerationResult {
    if !response.is_success() {
        return GenerationResult::ProviderError {
            status: response.status,
            details: String::from_utf8_lossy(&response.body).into_owned(),
        };
    }

    let parsed: GenerateContentResponse = match serde_json::from_slice(&response.body) {
        Ok(parsed) => parsed,
        Err(err) => {
            return GenerationResult::InternalError(format!(
                "invalid generateContent response: {err}"
            ));
        }
    };

    if let Some(reason) = parsed
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason)
    {
        warn!(event = "prompt_blocked", block_reason = ?reason);
    }
    if let Some(usage) = parsed.usage_metadata.as_ref() {
        debug!(
            event = "upstream_usage",
            prompt_tokens = ?usage.prompt_token_count,
            candidates_tokens = ?usage.candidates_token_count,
            total_tokens = ?usage.total_token_count
        );
    }

    let Some(candidate) = parsed.first_candidate() else {
        return GenerationResult::Success(NO_OUTPUT_MESSAGE.to_string());
    };
    if candidate.finish_reason == Some(FinishReason::Safety) {
        return GenerationResult::SafetyBlocked;
    }
    GenerationResult::Success(
        candidate
            .first_text()
            .unwrap_or(NO_OUTPUT_MESSAGE)
            .to_string(),
    )
}
