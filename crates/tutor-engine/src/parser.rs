//! Turning free-form model output into a validated [`Quiz`].
//!
//! Models are asked for a bare JSON array but often wrap it in a markdown
//! fence or surround it with prose. [`QuizParser`] looks for the array in
//! three places, in order:
//!
//! 1. the first fenced block marked `json` whose content is an array
//! 2. the first `[ { ... } ]` span anywhere in the text
//! 3. the whole text
//!
//! The candidate is then checked question by question. Any failure yields a
//! placeholder quiz instead of an error, so callers always get something to
//! render; [`ParsedQuiz`] records which branch was taken and why.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, error, info_span, warn, Span};
use tutor_quiz::{Quiz, QuizQuestion, OPTION_COUNT};

/// Hint used when a question arrives without one.
pub const DEFAULT_HINT: &str = "Think carefully about the key concept here.";

const FALLBACK_OPTIONS: [&str; OPTION_COUNT] = ["Option A", "Option B", "Option C", "Option D"];
const FALLBACK_CORRECT_ANSWER: &str = "Option A";
const FALLBACK_HINT: &str = "No hint available for this question.";
const FALLBACK_EXPLANATION: &str = "This is a sample explanation.";

static FENCED_JSON: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"```json\s*(\[[\s\S]*?\])\s*```").ok());

static BARE_ARRAY: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?s)\[\s*\{.*\}\s*\]").ok());

// ============================================================================
// Parse Outcome
// ============================================================================

/// Why a model reply could not be used as a quiz.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    /// The candidate text is not JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// The JSON is valid but not an array.
    #[error("quiz data must be a list of questions")]
    NotAList,

    /// An array element is not an object.
    #[error("question {index} is not an object")]
    NotAnObject {
        /// Zero-based position in the array.
        index: usize,
    },

    /// A required field is absent.
    #[error("question {index} is missing '{field}'")]
    MissingField {
        /// Zero-based position in the array.
        index: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A field has the wrong JSON type.
    #[error("question {index} has a non-text '{field}'")]
    InvalidField {
        /// Zero-based position in the array.
        index: usize,
        /// Name of the offending field.
        field: &'static str,
    },

    /// The options list does not have exactly four entries.
    #[error("question {index} has {count} options, expected 4")]
    WrongOptionCount {
        /// Zero-based position in the array.
        index: usize,
        /// Number of options found.
        count: usize,
    },
}

/// Result of parsing a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedQuiz {
    /// The reply contained a valid quiz.
    Parsed(Quiz),
    /// The reply was unusable; `quiz` holds placeholder questions.
    Fallback {
        /// Placeholder quiz of the requested length.
        quiz: Quiz,
        /// Why the reply was rejected.
        reason: ParseFailure,
    },
}

impl ParsedQuiz {
    /// Returns the quiz, parsed or placeholder.
    #[must_use]
    pub fn into_quiz(self) -> Quiz {
        match self {
            Self::Parsed(quiz) | Self::Fallback { quiz, .. } => quiz,
        }
    }

    /// Returns a reference to the quiz, parsed or placeholder.
    #[must_use]
    pub const fn quiz(&self) -> &Quiz {
        match self {
            Self::Parsed(quiz) | Self::Fallback { quiz, .. } => quiz,
        }
    }

    /// Returns `true` if the placeholder quiz was used.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Returns the rejection reason for a fallback outcome.
    #[must_use]
    pub const fn failure(&self) -> Option<&ParseFailure> {
        match self {
            Self::Parsed(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Extracts and validates quizzes from model replies.
#[derive(Debug, Clone)]
pub struct QuizParser {
    span: Span,
}

impl Default for QuizParser {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizParser {
    /// Creates a parser that logs under its own `quiz_parser` span.
    #[must_use]
    pub fn new() -> Self {
        Self::with_span(info_span!("quiz_parser"))
    }

    /// Creates a parser that logs under `span`.
    #[must_use]
    pub const fn with_span(span: Span) -> Self {
        Self { span }
    }

    /// Parses `raw` into at most `num_questions` questions.
    ///
    /// Never fails: unusable replies produce [`ParsedQuiz::Fallback`] with
    /// exactly `num_questions` placeholder questions about `subject`.
    #[must_use]
    pub fn parse(&self, raw: &str, subject: &str, num_questions: u32) -> ParsedQuiz {
        let limit = usize::try_from(num_questions).unwrap_or(usize::MAX);
        let candidate = extract_candidate(raw);

        let validated = serde_json::from_str::<Value>(candidate)
            .map_err(|e| ParseFailure::InvalidJson(e.to_string()))
            .and_then(questions_from_value);

        match validated {
            Ok(mut questions) => {
                let received = questions.len();
                questions.truncate(limit);
                debug!(
                    parent: &self.span,
                    received,
                    kept = questions.len(),
                    "Parsed quiz response"
                );
                ParsedQuiz::Parsed(Quiz::new(questions))
            }
            Err(reason) => {
                error!(parent: &self.span, reason = %reason, "Error parsing quiz response");
                warn!(parent: &self.span, subject, "Using fallback quiz");
                ParsedQuiz::Fallback {
                    quiz: fallback_quiz(subject, num_questions),
                    reason,
                }
            }
        }
    }
}

/// Picks the part of `raw` most likely to hold the quiz array.
fn extract_candidate(raw: &str) -> &str {
    if let Some(fenced) = FENCED_JSON
        .as_ref()
        .and_then(|re| re.captures(raw))
        .and_then(|caps| caps.get(1))
    {
        return fenced.as_str();
    }

    if let Some(array) = BARE_ARRAY.as_ref().and_then(|re| re.find(raw)) {
        return array.as_str();
    }

    raw
}

/// Builds `num_questions` placeholder questions about `subject`.
fn fallback_quiz(subject: &str, num_questions: u32) -> Quiz {
    (1..=num_questions)
        .map(|n| {
            QuizQuestion::new(
                format!("Sample {subject} Question #{n}"),
                FALLBACK_OPTIONS,
                FALLBACK_CORRECT_ANSWER,
                FALLBACK_HINT,
                FALLBACK_EXPLANATION,
            )
        })
        .collect()
}

// ============================================================================
// Validation
// ============================================================================

fn questions_from_value(value: Value) -> Result<Vec<QuizQuestion>, ParseFailure> {
    let Value::Array(items) = value else {
        return Err(ParseFailure::NotAList);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| question_from_value(index, item))
        .collect()
}

fn question_from_value(index: usize, item: Value) -> Result<QuizQuestion, ParseFailure> {
    let Value::Object(mut fields) = item else {
        return Err(ParseFailure::NotAnObject { index });
    };

    for field in ["question", "options", "correct_answer"] {
        if !fields.contains_key(field) {
            return Err(ParseFailure::MissingField { index, field });
        }
    }

    let options = take_options(&mut fields, index)?;
    let question = take_required_text(&mut fields, index, "question")?;
    let correct_answer = take_required_text(&mut fields, index, "correct_answer")?;

    let explanation = take_optional_text(&mut fields, index, "explanation")?
        .unwrap_or_else(|| format!("The correct answer is {correct_answer}."));
    let hint = take_optional_text(&mut fields, index, "hint")?
        .filter(|hint| !hint.is_empty())
        .unwrap_or_else(|| DEFAULT_HINT.to_string());

    Ok(QuizQuestion {
        question,
        options,
        correct_answer,
        hint,
        explanation,
    })
}

fn take_options(
    fields: &mut Map<String, Value>,
    index: usize,
) -> Result<[String; OPTION_COUNT], ParseFailure> {
    let invalid = ParseFailure::InvalidField {
        index,
        field: "options",
    };

    let Some(Value::Array(items)) = fields.remove("options") else {
        return Err(invalid);
    };

    if items.len() != OPTION_COUNT {
        return Err(ParseFailure::WrongOptionCount {
            index,
            count: items.len(),
        });
    }

    let options = items
        .into_iter()
        .map(|item| match item {
            Value::String(text) => Ok(text),
            _ => Err(invalid.clone()),
        })
        .collect::<Result<Vec<_>, _>>()?;

    <[String; OPTION_COUNT]>::try_from(options).map_err(|options| ParseFailure::WrongOptionCount {
        index,
        count: options.len(),
    })
}

fn take_required_text(
    fields: &mut Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<String, ParseFailure> {
    match fields.remove(field) {
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(ParseFailure::InvalidField { index, field }),
        None => Err(ParseFailure::MissingField { index, field }),
    }
}

/// Absent and `null` both count as missing.
fn take_optional_text(
    fields: &mut Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<Option<String>, ParseFailure> {
    match fields.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(_) => Err(ParseFailure::InvalidField { index, field }),
    }
}
