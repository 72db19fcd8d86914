//! Request types shared by the service and the HTTP API.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TutorError};

/// Smallest quiz the service will generate.
pub const MIN_QUESTIONS: u32 = 1;

/// Largest quiz the service will generate.
pub const MAX_QUESTIONS: u32 = 10;

/// Quiz size used when a request does not specify one.
pub const DEFAULT_QUESTIONS: u32 = 5;

fn default_learning_style() -> LearningStyle {
    LearningStyle::TextBased
}

fn default_background() -> String {
    "Unknown".to_string()
}

fn default_language() -> String {
    "English".to_string()
}

const fn default_num_questions() -> u32 {
    DEFAULT_QUESTIONS
}

const fn default_true() -> bool {
    true
}

fn null_as_true<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// How the student prefers to learn.
///
/// Only the exact labels `"Text-based"`, `"Visual"` and `"Hands-on"` map to
/// known styles. Anything else, including other casings, is kept verbatim in
/// [`LearningStyle::Other`] so it still reaches the model as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LearningStyle {
    /// Structured written explanations (default).
    #[default]
    TextBased,
    /// Diagrams, mental models and visual descriptions.
    Visual,
    /// Worked examples and exercises.
    HandsOn,
    /// Any other label supplied by the client.
    Other(String),
}

impl LearningStyle {
    /// Returns the display label, e.g. `"Hands-on"`.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::TextBased => "Text-based",
            Self::Visual => "Visual",
            Self::HandsOn => "Hands-on",
            Self::Other(label) => label,
        }
    }
}

impl From<&str> for LearningStyle {
    fn from(s: &str) -> Self {
        match s {
            "Text-based" => Self::TextBased,
            "Visual" => Self::Visual,
            "Hands-on" => Self::HandsOn,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl std::fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for LearningStyle {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

impl Serialize for LearningStyle {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

/// A request for a personalized explanation.
///
/// All fields are free text and are interpolated into the prompt as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutoringRequest {
    /// Academic subject, e.g. "Physics".
    pub subject: String,

    /// Learning level, e.g. "Beginner".
    pub level: String,

    /// The student's question.
    pub question: String,

    /// Preferred learning style.
    #[serde(default = "default_learning_style")]
    pub learning_style: LearningStyle,

    /// Background knowledge of the student.
    #[serde(default = "default_background")]
    pub background: String,

    /// Language the explanation should be written in.
    #[serde(default = "default_language")]
    pub language: String,
}

impl TutoringRequest {
    /// Creates a request with default style, background and language.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        level: impl Into<String>,
        question: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            level: level.into(),
            question: question.into(),
            learning_style: default_learning_style(),
            background: default_background(),
            language: default_language(),
        }
    }

    /// Sets the learning style.
    #[must_use]
    pub fn with_learning_style(mut self, style: impl Into<LearningStyle>) -> Self {
        self.learning_style = style.into();
        self
    }

    /// Sets the student's background.
    #[must_use]
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Sets the response language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// A request for a multiple-choice quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRequest {
    /// Academic subject.
    pub subject: String,

    /// Learning level.
    pub level: String,

    /// Number of questions, between [`MIN_QUESTIONS`] and [`MAX_QUESTIONS`].
    #[serde(default = "default_num_questions")]
    pub num_questions: u32,

    /// Whether to include the interactive HTML rendering in the result.
    /// Missing or `null` means yes.
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub reveal_format: bool,
}

impl QuizRequest {
    /// Creates a request for `num_questions` questions with the HTML rendering enabled.
    #[must_use]
    pub fn new(subject: impl Into<String>, level: impl Into<String>, num_questions: u32) -> Self {
        Self {
            subject: subject.into(),
            level: level.into(),
            num_questions,
            reveal_format: true,
        }
    }

    /// Sets whether the HTML rendering is included.
    #[must_use]
    pub const fn with_reveal_format(mut self, reveal_format: bool) -> Self {
        self.reveal_format = reveal_format;
        self
    }

    /// Checks that the question count is within bounds.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::InvalidRequest` if `num_questions` is outside
    /// `MIN_QUESTIONS..=MAX_QUESTIONS`.
    pub fn validate(&self) -> Result<()> {
        validate_question_count(self.num_questions)
    }
}

/// Checks that a requested question count is within bounds.
///
/// # Errors
///
/// Returns `TutorError::InvalidRequest` when the count is out of range.
pub fn validate_question_count(num_questions: u32) -> Result<()> {
    if (MIN_QUESTIONS..=MAX_QUESTIONS).contains(&num_questions) {
        Ok(())
    } else {
        Err(TutorError::invalid_request(format!(
            "num_questions must be between {MIN_QUESTIONS} and {MAX_QUESTIONS}, got {num_questions}"
        )))
    }
}
