use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;

use studyassist_client::{
    Capabilities, CapabilityError, SpeechSettings, StudyController, WreqTransport,
};
use studyassist_common::GlobalConfig;
use studyassist_core::{AppState, GeminiGateway};
use studyassist_protocol::study::{LanguageStyle, Mode};
use studyassist_router::study_router;

struct Provider {
    status: StatusCode,
    reply: String,
    prompts: Mutex<Vec<String>>,
}

async fn generate_content(State(provider): State<Arc<Provider>>, body: Bytes) -> (StatusCode, String) {
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap_or_default();
    if let Some(prompt) = body["contents"][0]["parts"][0]["text"].as_str() {
        provider.prompts.lock().unwrap().push(prompt.to_string());
    }
    (provider.status, provider.reply.clone())
}

async fn bind(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Provider mock, study server and a controller wired to it.
async fn stack(status: StatusCode, reply: &str) -> (StudyController, Arc<Provider>) {
    let provider = Arc::new(Provider {
        status,
        reply: reply.to_string(),
        prompts: Mutex::new(Vec::new()),
    });
    let provider_url = bind(
        Router::new()
            .route("/v1beta/{*rest}", post(generate_content))
            .with_state(provider.clone()),
    )
    .await;

    let state = Arc::new(AppState::new(GlobalConfig {
        gemini_api_key: Some("e2e-key".to_string()),
        gemini_base_url: provider_url,
        ..GlobalConfig::default()
    }));
    let gateway = Arc::new(GeminiGateway::from_state(state).unwrap());
    let server_url = bind(study_router(gateway)).await;

    let transport = Arc::new(WreqTransport::new(&server_url).unwrap());
    let controller = StudyController::new(transport, Arc::new(SilentHost));
    (controller, provider)
}

struct SilentHost;

impl Capabilities for SilentHost {
    fn speak(&self, _text: &str, _settings: &SpeechSettings) -> Result<(), CapabilityError> {
        Ok(())
    }

    fn cancel(&self) {}

    fn copy(&self, _text: &str) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unavailable("clipboard"))
    }

    fn download_as_file(&self, _name: &str, _text: &str) -> Result<(), CapabilityError> {
        Ok(())
    }
}

#[tokio::test]
async fn summary_round_trip_shows_provider_text() {
    let (mut controller, provider) = stack(
        StatusCode::OK,
        r#"{"candidates":[{"content":{"parts":[{"text":"Plants turn light into food."}],"role":"model"},"finishReason":"STOP"}]}"#,
    )
    .await;

    controller.set_text("Photosynthesis converts light to energy.");
    controller.select_mode(Mode::Summary);
    controller.select_language(LanguageStyle::English);
    controller.submit().await;

    assert_eq!(controller.error(), "");
    assert_eq!(controller.result(), "Plants turn light into food.");
    let prompts = provider.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Do NOT use bullet points"));
    assert!(prompts[0].contains("Photosynthesis converts light to energy."));
    assert_eq!(
        controller.copy_result(),
        Err(CapabilityError::Unavailable("clipboard"))
    );
}

#[tokio::test]
async fn provider_rate_limit_surfaces_as_inline_error() {
    let (mut controller, _provider) = stack(
        StatusCode::TOO_MANY_REQUESTS,
        r#"{"error":{"code":429,"message":"quota"}}"#,
    )
    .await;

    controller.set_text("Cells divide.");
    controller.submit().await;

    assert_eq!(controller.result(), "");
    assert_eq!(controller.error(), "Error 429: Gemini API Error: 429");
}

#[tokio::test]
async fn safety_block_is_displayed_as_result() {
    let (mut controller, _provider) =
        stack(StatusCode::OK, r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).await;

    controller.set_text("Cells divide.");
    controller.submit().await;

    assert_eq!(controller.error(), "");
    assert!(controller.result().contains("blocked by safety filters"));
}
