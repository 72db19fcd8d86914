//! End-to-end tests for the tutoring HTTP API.
//!
//! Each test starts two servers on ephemeral ports: a fake OpenAI-compatible
//! provider that returns canned replies, and the tutor API configured to
//! call it. Requests go over real HTTP with `reqwest`.

use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tutor_engine::{
    create_router, AppState, ChatCompletionClient, ErrorResponse, HealthResponse, LlmConfig,
    QuizResponse, TutorResponse, TutorService,
};

/// Helper to find an available port for testing.
fn find_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

/// Reads a canned model reply from the fixtures directory.
fn reply_fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures/replies")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {e}", path.display()))
}

/// What the fake provider answers with.
#[derive(Clone)]
enum ProviderReply {
    /// 200 with this completion text.
    Completion(String),
    /// This status with a provider-style error body.
    Failure(u16),
}

async fn fake_completion(
    State(reply): State<Arc<ProviderReply>>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    assert_eq!(body["messages"][0]["role"], "user");

    match reply.as_ref() {
        ProviderReply::Completion(text) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": text},
                    "finish_reason": "stop"
                }]
            })),
        ),
        ProviderReply::Failure(code) => (
            StatusCode::from_u16(*code).expect("Invalid status code"),
            Json(serde_json::json!({"error": {"message": "provider unavailable"}})),
        ),
    }
}

/// Spawns a server for `router` and returns its base URL.
async fn spawn(router: Router) -> String {
    let port = find_available_port();
    let addr = format!("127.0.0.1:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://{addr}")
}

/// Spawns the fake provider and a tutor API wired to it; returns the API base URL.
async fn spawn_tutor(reply: ProviderReply) -> String {
    let provider = Router::new()
        .route("/v1/chat/completions", post(fake_completion))
        .with_state(Arc::new(reply));
    let provider_url = spawn(provider).await;

    let llm = LlmConfig {
        base_url: format!("{provider_url}/v1"),
        ..LlmConfig::default()
    };
    let client = ChatCompletionClient::new(&llm, "test-key");
    let service = TutorService::new(Arc::new(client));

    spawn(create_router(AppState::new(service))).await
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let base = spawn_tutor(ProviderReply::Completion(String::new())).await;

    let response = reqwest::get(format!("{base}/health"))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let health: HealthResponse = response.json().await.expect("Invalid JSON");
    assert_eq!(health.status, "API is running");
}

// ============================================================================
// Tutoring
// ============================================================================

#[tokio::test]
async fn test_tutor_round_trip_with_visual_note() {
    let base = spawn_tutor(ProviderReply::Completion(
        "Photosynthesis turns light into chemical energy.".to_string(),
    ))
    .await;

    let response = reqwest::Client::new()
        .post(format!("{base}/tutor"))
        .json(&serde_json::json!({
            "subject": "Biology",
            "level": "Beginner",
            "question": "What is photosynthesis?",
            "learning_style": "Visual"
        }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: TutorResponse = response.json().await.expect("Invalid JSON");
    assert!(body
        .response
        .starts_with("Photosynthesis turns light into chemical energy."));
    assert!(body.response.ends_with(
        "\n\n*Note: Visualize these concepts as you read for better retention.*"
    ));
}

#[tokio::test]
async fn test_tutor_provider_failure_returns_500() {
    let base = spawn_tutor(ProviderReply::Failure(503)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/tutor"))
        .json(&serde_json::json!({
            "subject": "Biology",
            "level": "Beginner",
            "question": "What is a cell?"
        }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = response.json().await.expect("Invalid JSON");
    assert!(error.error.starts_with("Error generating explanation: "));
    assert!(error.error.contains("server"));
}

// ============================================================================
// Quiz
// ============================================================================

#[tokio::test]
async fn test_quiz_from_fenced_reply() {
    let base = spawn_tutor(ProviderReply::Completion(reply_fixture("fenced_quiz.txt"))).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/quiz"))
        .json(&serde_json::json!({"subject": "Chemistry", "level": "Beginner", "num_questions": 2}))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: QuizResponse = response.json().await.expect("Invalid JSON");

    assert_eq!(body.quiz.len(), 2);
    let second = &body.quiz.questions()[1];
    assert_eq!(second.correct_answer, "Carbon dioxide");
    assert_eq!(second.hint, "Think carefully about the key concept here.");

    let html = body.formatted_quiz.expect("formatted_quiz missing");
    assert!(html.contains("Q1: What is the chemical symbol for gold?"));
    assert!(!html.contains("Q3:"));
}

#[tokio::test]
async fn test_quiz_fallback_on_prose_reply() {
    let base = spawn_tutor(ProviderReply::Completion(reply_fixture("prose_reply.txt"))).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/quiz"))
        .json(&serde_json::json!({
            "subject": "Chemistry",
            "level": "Beginner",
            "num_questions": 3,
            "reveal_format": false
        }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Invalid JSON");

    assert!(body["formatted_quiz"].is_null());
    let quiz = body["quiz"].as_array().expect("quiz is not an array");
    assert_eq!(quiz.len(), 3);
    assert_eq!(quiz[0]["question"], "Sample Chemistry Question #1");
    assert_eq!(quiz[2]["correct_answer"], "Option A");
}

#[tokio::test]
async fn test_quiz_rejects_too_many_questions() {
    let base = spawn_tutor(ProviderReply::Completion(reply_fixture("fenced_quiz.txt"))).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/quiz"))
        .json(&serde_json::json!({"subject": "Chemistry", "level": "Beginner", "num_questions": 25}))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = response.json().await.expect("Invalid JSON");
    assert!(error.error.contains("25"));
}

#[tokio::test]
async fn test_quiz_provider_auth_failure_returns_500() {
    let base = spawn_tutor(ProviderReply::Failure(401)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/quiz"))
        .json(&serde_json::json!({"subject": "Chemistry", "level": "Beginner"}))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = response.json().await.expect("Invalid JSON");
    assert!(error.error.starts_with("Error generating quiz: "));
    assert!(error.error.contains("authentication"));
}

// ============================================================================
// Quiz Page
// ============================================================================

#[tokio::test]
async fn test_quiz_html_page() {
    let base = spawn_tutor(ProviderReply::Completion(reply_fixture("fenced_quiz.txt"))).await;

    let response = reqwest::get(format!("{base}/quiz-html/Chemistry/Beginner/3"))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let html = response.text().await.expect("Invalid body");
    assert_eq!(html.matches("class=\"question\"").count(), 3);
    assert!(html.contains("Q3: What is the pH of pure water at 25°C?"));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let base = spawn_tutor(ProviderReply::Completion(reply_fixture("fenced_quiz.txt"))).await;
    let client = reqwest::Client::new();

    let requests = (1..=5).map(|n| {
        let client = client.clone();
        let url = format!("{base}/quiz");
        async move {
            let response = client
                .post(url)
                .json(&serde_json::json!({"subject": "Chemistry", "level": "Beginner", "num_questions": n}))
                .send()
                .await
                .expect("Request failed");
            let body: QuizResponse = response.json().await.expect("Invalid JSON");
            (n, body.quiz.len())
        }
    });

    for (requested, received) in futures::future::join_all(requests).await {
        let expected = usize::try_from(requested).expect("count fits usize").min(3);
        assert_eq!(received, expected);
    }
}
