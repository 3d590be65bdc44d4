mod error;
mod study;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderValue, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use studyassist_core::ContentGenerator;
use studyassist_protocol::study::STUDY_PATH;

pub use error::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-studyassist-request-id";

#[derive(Clone)]
pub struct StudyState {
    pub generator: Arc<dyn ContentGenerator>,
}

#[derive(Debug, Clone)]
pub(crate) struct RequestTraceId(pub(crate) String);

pub fn study_router(generator: Arc<dyn ContentGenerator>) -> Router {
    let state = StudyState { generator };

    Router::new()
        .route(
            STUDY_PATH,
            post(study::study_generate).fallback(study::method_not_allowed),
        )
        .route("/health", get(study::health))
        .layer(middleware::from_fn(trace_request))
        .with_state(state)
}

async fn trace_request(mut req: Request<Body>, next: Next) -> Response {
    let trace_id = uuid::Uuid::now_v7().to_string();
    req.extensions_mut()
        .insert(RequestTraceId(trace_id.clone()));
    let mut resp = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    resp
}
