use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use studyassist_core::{ConfigError, ContentGenerator, GenerationResult};
use studyassist_router::{REQUEST_ID_HEADER, study_router};

struct FakeGenerator {
    outcome: Result<GenerationResult, ConfigError>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    fn returning(outcome: Result<GenerationResult, ConfigError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, ConfigError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.outcome.clone()
    }
}

async fn serve(generator: Arc<FakeGenerator>) -> String {
    let app = study_router(generator);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

struct Reply {
    status: u16,
    request_id: Option<String>,
    json: serde_json::Value,
}

async fn post_json(base: &str, body: &str) -> Reply {
    let client = wreq::Client::builder().build().unwrap();
    let resp = client
        .post(format!("{base}/api/ai"))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    read_reply(resp).await
}

async fn read_reply(resp: wreq::Response) -> Reply {
    let status = resp.status().as_u16();
    let request_id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = resp.bytes().await.unwrap();
    Reply {
        status,
        request_id,
        json: serde_json::from_slice(&bytes).unwrap(),
    }
}

fn success(text: &str) -> Result<GenerationResult, ConfigError> {
    Ok(GenerationResult::Success(text.to_string()))
}

#[tokio::test]
async fn summary_request_builds_prompt_and_returns_result() {
    let generator = FakeGenerator::returning(success("Plants turn light into food."));
    let base = serve(generator.clone()).await;

    let reply = post_json(
        &base,
        r#"{"text":"Photosynthesis converts light to energy.","mode":"Summary","lang":"English"}"#,
    )
    .await;

    assert_eq!(reply.status, 200);
    assert_eq!(
        reply.json,
        serde_json::json!({ "result": "Plants turn light into food." })
    );
    assert!(reply.request_id.is_some());
    let prompts = generator.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Do NOT use bullet points"));
    assert!(prompts[0].ends_with("Photosynthesis converts light to energy."));
}

#[tokio::test]
async fn empty_text_is_rejected_without_calling_the_provider() {
    let generator = FakeGenerator::returning(success("unused"));
    let base = serve(generator.clone()).await;

    for body in [r#"{"text":""}"#, r#"{"text":"   \n "}"#, "{}", ""] {
        let reply = post_json(&base, body).await;
        assert_eq!(reply.status, 400, "body {body:?}");
        assert_eq!(
            reply.json,
            serde_json::json!({ "error": "No lesson text provided." })
        );
    }
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn unsupported_mode_is_rejected_without_calling_the_provider() {
    let generator = FakeGenerator::returning(success("unused"));
    let base = serve(generator.clone()).await;

    let reply = post_json(&base, r#"{"text":"Cells divide.","mode":"Essay"}"#).await;
    assert_eq!(reply.status, 400);
    assert_eq!(reply.json["error"], "Unsupported mode: Essay");
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let generator = FakeGenerator::returning(success("unused"));
    let base = serve(generator.clone()).await;

    for body in ["{not json", r#"["Cells divide.","Summary","English"]"#] {
        let reply = post_json(&base, body).await;
        assert_eq!(reply.status, 400, "body {body:?}");
        assert!(
            reply.json["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request body")
        );
    }
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn provider_rate_limit_is_passed_through() {
    let generator = FakeGenerator::returning(Ok(GenerationResult::ProviderError {
        status: 429,
        details: "quota exhausted".to_string(),
    }));
    let base = serve(generator.clone()).await;

    let reply = post_json(&base, r#"{"text":"Cells divide."}"#).await;
    assert_eq!(reply.status, 429);
    assert!(
        reply.json["error"]
            .as_str()
            .unwrap()
            .contains("Gemini API Error: 429")
    );
    assert_eq!(reply.json["details"], "quota exhausted");
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn safety_block_returns_warning_with_ok_status() {
    let generator = FakeGenerator::returning(Ok(GenerationResult::SafetyBlocked));
    let base = serve(generator).await;

    let reply = post_json(&base, r#"{"text":"Cells divide.","mode":"MCQs"}"#).await;
    assert_eq!(reply.status, 200);
    assert_eq!(
        reply.json["result"],
        "⚠️ Content was blocked by safety filters. Try rephrasing your text."
    );
}

#[tokio::test]
async fn missing_api_key_is_server_error() {
    let generator = FakeGenerator::returning(Err(ConfigError::MissingApiKey));
    let base = serve(generator).await;

    let reply = post_json(&base, r#"{"text":"Cells divide."}"#).await;
    assert_eq!(reply.status, 500);
    assert_eq!(
        reply.json,
        serde_json::json!({ "error": "API Key is missing. Set GEMINI_API_KEY." })
    );
}

#[tokio::test]
async fn internal_failure_carries_message() {
    let generator = FakeGenerator::returning(Ok(GenerationResult::InternalError(
        "connection refused".to_string(),
    )));
    let base = serve(generator).await;

    let reply = post_json(&base, r#"{"text":"Cells divide."}"#).await;
    assert_eq!(reply.status, 500);
    assert_eq!(
        reply.json,
        serde_json::json!({ "error": "Internal Server Error", "message": "connection refused" })
    );
}

#[tokio::test]
async fn non_post_methods_are_rejected() {
    let generator = FakeGenerator::returning(success("unused"));
    let base = serve(generator.clone()).await;
    let client = wreq::Client::builder().build().unwrap();

    let resp = client.get(format!("{base}/api/ai")).send().await.unwrap();
    let reply = read_reply(resp).await;
    assert_eq!(reply.status, 405);
    assert_eq!(reply.json, serde_json::json!({ "error": "Only POST allowed" }));

    let resp = client.put(format!("{base}/api/ai")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 405);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn health_reports_ok() {
    let generator = FakeGenerator::returning(success("unused"));
    let base = serve(generator).await;
    let client = wreq::Client::builder().build().unwrap();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    let reply = read_reply(resp).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.json, serde_json::json!({ "ok": true }));
}
