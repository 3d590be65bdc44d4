use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use studyassist_core::{ConfigError, ValidationError};
use studyassist_protocol::study::StudyErrorBody;

/// Every non-200 answer of `/api/ai`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: StudyErrorBody,
}

impl ApiError {
    pub fn method_not_allowed() -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            body: StudyErrorBody::new("Only POST allowed"),
        }
    }

    /// Provider status is mirrored; anything unrepresentable becomes 502.
    pub fn provider(status: u16, details: String) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            body: StudyErrorBody::new(format!("Gemini API Error: {status}")).with_details(details),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: StudyErrorBody::new("Internal Server Error").with_message(message),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: StudyErrorBody::new(err.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: StudyErrorBody::new(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_mirrors_status() {
        let err = ApiError::provider(429, "slow down".to_string());
        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.body.error, "Gemini API Error: 429");
        assert_eq!(err.body.details.as_deref(), Some("slow down"));
    }

    #[test]
    fn invalid_provider_status_becomes_bad_gateway() {
        let err = ApiError::provider(1000, String::new());
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.body.error, "Gemini API Error: 1000");
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let err = ApiError::from(ValidationError::EmptyText);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.error, "No lesson text provided.");
    }
}
