//! AI Tutor Engine
//!
//! Builds prompts, calls the language model, turns its replies into
//! explanations and quizzes, and serves the whole thing over HTTP.
//!
//! # Modules
//!
//! - [`prompt`] - Tutoring and quiz instructions for the model
//! - [`parser`] - Extracts a validated quiz from free-form model output
//! - [`formatter`] - Learning-style notes on tutoring replies
//! - [`llm`] - Completion client trait and the chat-completions implementation
//! - [`service`] - The request workflow shared by the API and the CLI
//! - [`api`] - axum router and handlers
//! - [`config`] - `tutor.json` loading and validation

pub mod api;
pub mod config;
pub mod error;
pub mod formatter;
pub mod llm;
pub mod parser;
pub mod prompt;
pub mod request;
pub mod service;

pub use api::{
    create_router, AppState, ErrorResponse, HealthResponse, QuizResponse, TutorResponse,
    HEALTH_STATUS,
};
pub use config::{Config, LlmConfig, QuizConfig, ServerConfig, CONFIG_FILE_NAME};
pub use error::{LlmErrorKind, Result, TutorError};
pub use formatter::format_tutoring_response;
pub use llm::{ChatCompletionClient, CompletionClient};
pub use parser::{ParseFailure, ParsedQuiz, QuizParser};
pub use prompt::{quiz_prompt, tutoring_prompt};
pub use request::{
    validate_question_count, LearningStyle, QuizRequest, TutoringRequest, DEFAULT_QUESTIONS,
    MAX_QUESTIONS, MIN_QUESTIONS,
};
pub use service::{QuizResult, TutorService};
