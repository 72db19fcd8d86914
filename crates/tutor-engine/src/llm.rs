//! LLM access for the tutoring engine.
//!
//! The service talks to the model through the [`CompletionClient`] trait: one
//! instruction in, one completion out. [`ChatCompletionClient`] implements it
//! for any OpenAI-compatible `chat/completions` endpoint (Groq by default).
//!
//! There is no retry, timeout or streaming: a failed call surfaces as a
//! [`TutorError::LlmApiError`] classified by [`LlmErrorKind`].

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::error::{LlmErrorKind, Result, TutorError};

/// Maximum length of a provider error body quoted in error messages.
const MAX_ERROR_DETAIL_LENGTH: usize = 300;

/// Something that turns a single prompt into a single completion.
pub trait CompletionClient: Send + Sync {
    /// Sends `prompt` as one user message and returns the completion text.
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>>;
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// ============================================================================
// Chat Completion Client
// ============================================================================

/// Client for OpenAI-compatible chat-completion APIs.
#[derive(Clone)]
pub struct ChatCompletionClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: String,
}

impl ChatCompletionClient {
    /// Creates a client from provider settings and an API key.
    #[must_use]
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key: api_key.into(),
        }
    }

    /// Returns the full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending completion request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TutorError::llm_api_error(classify_transport_error(&e), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let kind = classify_status(status);
            warn!(status = %status, kind = %kind, "LLM request rejected");
            return Err(TutorError::llm_api_error(
                kind,
                format!("HTTP {status}: {}", truncate_detail(&detail)),
            ));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            TutorError::llm_api_error(
                LlmErrorKind::Other,
                format!("unreadable completion response: {e}"),
            )
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                TutorError::llm_api_error(
                    LlmErrorKind::Other,
                    "completion response contained no message",
                )
            })?;

        debug!(completion_len = content.len(), "Received completion");
        Ok(content)
    }
}

impl std::fmt::Debug for ChatCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl CompletionClient for ChatCompletionClient {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        self.send(prompt).boxed()
    }
}

/// Maps a non-success HTTP status to an error category.
fn classify_status(status: StatusCode) -> LlmErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmErrorKind::Authentication,
        StatusCode::TOO_MANY_REQUESTS => LlmErrorKind::RateLimit,
        s if s.is_server_error() => LlmErrorKind::Server,
        _ => LlmErrorKind::Other,
    }
}

/// Maps a failure to reach the provider to an error category.
fn classify_transport_error(error: &reqwest::Error) -> LlmErrorKind {
    if error.is_builder() || error.is_decode() {
        LlmErrorKind::Other
    } else {
        LlmErrorKind::Network
    }
}

/// Shortens a provider error body to its first line, on a char boundary.
fn truncate_detail(detail: &str) -> String {
    let first_line = detail.lines().next().unwrap_or("").trim();

    if first_line.len() <= MAX_ERROR_DETAIL_LENGTH {
        first_line.to_string()
    } else {
        let truncate_at = first_line
            .char_indices()
            .take_while(|(idx, _)| *idx < MAX_ERROR_DETAIL_LENGTH)
            .last()
            .map_or(0, |(idx, c)| idx + c.len_utf8());
        format!("{}...", &first_line[..truncate_at])
    }
}

// ============================================================================
// Test Support
// ============================================================================


// ============================================================================
// Tests
// ============================================================================
