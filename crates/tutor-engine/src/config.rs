//! Configuration types for the tutoring service.
//!
//! This module provides the configuration structures used to reach the LLM
//! provider, bind the HTTP server and size generated quizzes. Secrets are
//! never stored in the file; the API key is read from the environment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TutorError};
use crate::request::{DEFAULT_QUESTIONS, MAX_QUESTIONS, MIN_QUESTIONS};

/// The default config file name.
pub const CONFIG_FILE_NAME: &str = "tutor.json";

/// Environment variable holding the API key by default.
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variable consulted when the default one is unset.
pub const FALLBACK_API_KEY_ENV: &str = "OPENAI_API_KEY";

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_questions() -> u32 {
    DEFAULT_QUESTIONS
}

fn default_export_path() -> String {
    tutor_quiz::DEFAULT_EXPORT_PATH.to_string()
}

/// Main configuration for the tutoring service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// LLM provider settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Quiz generation settings.
    #[serde(default)]
    pub quiz: QuizConfig,
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `tutor.json` in the current directory. If found, loads and
    /// validates the configuration. If not found, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            TutorError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `tutor.json` in a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        Self::load_from_file(&config_path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::ConfigParseError` if the file exists but contains
    /// invalid JSON.
    ///
    /// Returns `TutorError::ConfigValidationError` if the configuration values
    /// are invalid (e.g., out-of-range temperature, empty base URL).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(TutorError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| TutorError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// Checks that:
    /// - `llm.baseUrl`, `llm.model` and `llm.apiKeyEnv` are not empty
    /// - `llm.temperature` is between 0.0 and 2.0
    /// - `server.port` is not 0
    /// - `quiz.defaultQuestions` is between 1 and 10
    /// - `quiz.exportPath` is not empty
    ///
    /// # Errors
    ///
    /// Returns `TutorError::ConfigValidationError` if any validation check fails.
    pub fn validate(&self) -> Result<()> {
        if self.llm.base_url.trim().is_empty() {
            return Err(TutorError::config_validation(
                "llm.baseUrl must not be empty",
                "Set llm.baseUrl to your provider's API root in tutor.json",
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(TutorError::config_validation(
                "llm.model must not be empty",
                "Set llm.model to a model name your provider serves in tutor.json",
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(TutorError::config_validation(
                format!(
                    "llm.temperature must be between 0.0 and 2.0, got {}",
                    self.llm.temperature
                ),
                "Set llm.temperature to a value such as 0.7 in tutor.json",
            ));
        }

        if self.llm.api_key_env.trim().is_empty() {
            return Err(TutorError::config_validation(
                "llm.apiKeyEnv must not be empty",
                "Set llm.apiKeyEnv to the name of the variable holding your API key",
            ));
        }

        if self.server.port == 0 {
            return Err(TutorError::config_validation(
                "server.port must be greater than 0",
                "Set server.port to a free port such as 8000 in tutor.json",
            ));
        }

        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.quiz.default_questions) {
            return Err(TutorError::config_validation(
                format!(
                    "quiz.defaultQuestions must be between {MIN_QUESTIONS} and {MAX_QUESTIONS}"
                ),
                "Set quiz.defaultQuestions to a value such as 5 in tutor.json",
            ));
        }

        if self.quiz.export_path.trim().is_empty() {
            return Err(TutorError::config_validation(
                "quiz.exportPath must not be empty",
                "Provide a file path such as quiz.html for quiz.exportPath in tutor.json",
            ));
        }

        Ok(())
    }

    /// Reads the LLM API key from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::MissingApiKey` if no non-empty key is set.
    pub fn api_key(&self) -> Result<String> {
        self.llm.resolve_api_key(|var| std::env::var(var).ok())
    }
}

/// LLM provider settings.
///
/// Any OpenAI-compatible chat-completions endpoint works; the defaults
/// point at Groq.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    /// API root, without the `/chat/completions` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl LlmConfig {
    /// Resolves the API key through `lookup`.
    ///
    /// Tries `api_key_env` first. When that is the default variable and it
    /// is unset or empty, `OPENAI_API_KEY` is tried as well.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::MissingApiKey` naming `api_key_env` if nothing is found.
    pub fn resolve_api_key(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        let non_empty = |var: &str| lookup(var).filter(|key| !key.trim().is_empty());

        let key = non_empty(self.api_key_env.as_str()).or_else(|| {
            if self.api_key_env == DEFAULT_API_KEY_ENV {
                non_empty(FALLBACK_API_KEY_ENV)
            } else {
                None
            }
        });

        key.ok_or_else(|| TutorError::missing_api_key(&self.api_key_env))
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Quiz generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    /// Question count used by the CLI when none is given.
    #[serde(default = "default_questions")]
    pub default_questions: u32,

    /// Where the CLI writes exported quizzes.
    #[serde(default = "default_export_path")]
    pub export_path: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            default_questions: default_questions(),
            export_path: default_export_path(),
        }
    }
}
