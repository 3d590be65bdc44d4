use std::time::Instant;

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde_json::Value;
use tracing::{Instrument, error, info, info_span, warn};

use studyassist_core::{
    GenerationRequest, GenerationResult, SAFETY_BLOCKED_MESSAGE, ValidationError, build_prompt,
};
use studyassist_protocol::study::{StudyRequestBody, StudyResponseBody};

use crate::error::ApiError;
use crate::{RequestTraceId, StudyState};

pub(crate) async fn study_generate(
    State(state): State<StudyState>,
    Extension(trace_id): Extension<RequestTraceId>,
    body: Bytes,
) -> Response {
    let span = info_span!("study", trace_id = %trace_id.0);
    async move {
        let started_at = Instant::now();
        let response = match generate(&state, &body).await {
            Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Err(err) => {
                warn!(
                    event = "downstream_rejected",
                    status = err.status.as_u16(),
                    error = %err.body.error
                );
                err.into_response()
            }
        };
        info!(
            event = "downstream_responded",
            status = response.status().as_u16(),
            elapsed_ms = started_at.elapsed().as_millis()
        );
        response
    }
    .instrument(span)
    .await
}

async fn generate(state: &StudyState, body: &[u8]) -> Result<StudyResponseBody, ApiError> {
    let body = parse_body(body)?;
    let request = GenerationRequest::from_body(body)?;
    info!(
        event = "downstream_received",
        mode = %request.mode,
        lang = %request.language_style,
        text_chars = request.text.chars().count()
    );
    let prompt = build_prompt(&request)?;

    match state.generator.generate(&prompt).await? {
        GenerationResult::Success(result) => Ok(StudyResponseBody { result }),
        GenerationResult::SafetyBlocked => Ok(StudyResponseBody {
            result: SAFETY_BLOCKED_MESSAGE.to_string(),
        }),
        GenerationResult::ProviderError { status, details } => {
            Err(ApiError::provider(status, details))
        }
        GenerationResult::InternalError(message) => {
            error!(event = "generation_failed", error = %message);
            Err(ApiError::internal(message))
        }
    }
}

/// An empty body or JSON `null` reads as `{}`; anything else must be a JSON object.
fn parse_body(body: &[u8]) -> Result<StudyRequestBody, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StudyRequestBody::default());
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| ValidationError::MalformedBody(err.to_string()))?;
    match value {
        Value::Null => Ok(StudyRequestBody::default()),
        Value::Object(_) => serde_json::from_value(value)
            .map_err(|err| ValidationError::MalformedBody(err.to_string())),
        _ => Err(ValidationError::MalformedBody(
            "expected a JSON object".to_string(),
        )),
    }
}

pub(crate) async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

pub(crate) async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "ok": true })))
}
