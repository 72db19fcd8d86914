//! HTTP API for the tutoring service.
//!
//! # Endpoints
//!
//! - `POST /tutor` - Personalized explanation
//! - `POST /quiz` - Multiple-choice quiz as JSON, optionally with HTML
//! - `GET /quiz-html/{subject}/{level}/{num_questions}` - Quiz as an HTML page
//! - `GET /health` - Liveness check
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tutor_engine::{create_router, AppState, ChatCompletionClient, Config, TutorService};
//!
//! # async fn example() -> tutor_engine::Result<()> {
//! let config = Config::default();
//! let client = ChatCompletionClient::new(&config.llm, config.api_key()?);
//! let state = AppState::new(TutorService::new(Arc::new(client)));
//!
//! let router = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tutor_quiz::Quiz;

use crate::error::TutorError;
use crate::request::{QuizRequest, TutoringRequest};
use crate::service::TutorService;

/// Body returned by `GET /health`.
pub const HEALTH_STATUS: &str = "API is running";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response body for `POST /tutor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorResponse {
    /// The formatted explanation.
    pub response: String,
}

/// Response body for `POST /quiz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResponse {
    /// The quiz questions.
    pub quiz: Quiz,
    /// Interactive HTML document, or `null` when not requested.
    pub formatted_quiz: Option<String>,
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always [`HEALTH_STATUS`].
    pub status: String,
}

/// Error response body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Description of the error.
    pub error: String,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The service every handler delegates to.
    pub service: TutorService,
}

impl AppState {
    /// Creates a new `AppState` around `service`.
    #[must_use]
    pub const fn new(service: TutorService) -> Self {
        Self { service }
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Internal error type for API handlers.
#[derive(Debug)]
enum ApiError {
    /// The request carried an unusable value.
    InvalidRequest(String),
    /// The model call failed.
    Generation(String),
}

impl ApiError {
    /// Maps a service error, prefixing generation failures with `context`.
    fn from_service(context: &str, error: &TutorError) -> Self {
        if error.is_client_error() {
            Self::InvalidRequest(error.to_string())
        } else {
            Self::Generation(format!("{context}: {error}"))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidRequest(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::Generation(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all endpoints.
///
/// The router is configured with:
/// - CORS middleware open to any origin
/// - Tracing middleware for request logging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/tutor", post(handle_tutor))
        .route("/quiz", post(handle_quiz))
        .route(
            "/quiz-html/:subject/:level/:num_questions",
            get(handle_quiz_html),
        )
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for `POST /tutor`.
async fn handle_tutor(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TutoringRequest>,
) -> Result<Json<TutorResponse>, ApiError> {
    let response = state.service.tutor(&request).await.map_err(|e| {
        warn!(error = %e, "Tutoring request failed");
        ApiError::from_service("Error generating explanation", &e)
    })?;

    Ok(Json(TutorResponse { response }))
}

/// Handler for `POST /quiz`.
async fn handle_quiz(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuizRequest>,
) -> Result<Json<QuizResponse>, ApiError> {
    let result = state.service.generate_quiz(&request).await.map_err(|e| {
        warn!(error = %e, "Quiz request failed");
        ApiError::from_service("Error generating quiz", &e)
    })?;

    info!(
        questions = result.quiz.len(),
        fallback = result.used_fallback,
        "Quiz generated"
    );

    Ok(Json(QuizResponse {
        quiz: result.quiz,
        formatted_quiz: result.formatted_quiz,
    }))
}

/// Handler for `GET /quiz-html/{subject}/{level}/{num_questions}`.
async fn handle_quiz_html(
    State(state): State<Arc<AppState>>,
    Path((subject, level, num_questions)): Path<(String, String, u32)>,
) -> Result<Html<String>, ApiError> {
    let html = state
        .service
        .quiz_html(&subject, &level, num_questions)
        .await
        .map_err(|e| {
            warn!(error = %e, "Quiz page request failed");
            ApiError::from_service("Error generating quiz", &e)
        })?;

    Ok(Html(html))
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTH_STATUS.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
