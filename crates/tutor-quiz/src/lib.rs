//! Quiz Model and Rendering
//!
//! This crate provides the validated quiz types shared by the tutoring engine
//! and the HTML documents built from them.
//!
//! # Types
//!
//! - [`QuizQuestion`] - A single multiple-choice question with exactly four options
//! - [`Quiz`] - An ordered sequence of questions
//!
//! # Rendering
//!
//! - [`HtmlGenerator`] - Renders a quiz as a self-contained HTML document
//! - [`RenderMode`] - Interactive (check/hint/reveal) or simple (reveal only)
//! - [`export::export_quiz_to_html`] - Writes the interactive document to disk
//!
//! # Example
//!
//! ```rust
//! use tutor_quiz::{HtmlGenerator, Quiz, QuizQuestion, RenderMode};
//!
//! let quiz = Quiz::new(vec![QuizQuestion::new(
//!     "2+2?",
//!     ["1", "2", "3", "4"],
//!     "4",
//!     "Count on your fingers.",
//!     "Two plus two is four.",
//! )]);
//!
//! let html = HtmlGenerator::new(&quiz, RenderMode::Interactive).generate();
//! assert!(html.contains("Q1: 2+2?"));
//! ```

pub mod export;
mod html;

pub use export::{export_quiz_to_html, write_html, DEFAULT_EXPORT_PATH};
pub use html::{HtmlGenerator, RenderMode};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while rendering or exporting a quiz.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Failed to write the quiz document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for quiz operations.
pub type Result<T> = std::result::Result<T, QuizError>;

// ============================================================================
// Quiz Question
// ============================================================================

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// Labels shown in front of each option, in order.
pub const OPTION_LABELS: [char; OPTION_COUNT] = ['a', 'b', 'c', 'd'];

/// A multiple-choice question.
///
/// The option count is fixed by the type. `correct_answer` is expected to be
/// one of the options; this is not enforced, but answer checking in the
/// rendered document only succeeds when it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// The question text.
    pub question: String,

    /// The four answer options, in display order.
    pub options: [String; OPTION_COUNT],

    /// The option text that answers the question correctly.
    pub correct_answer: String,

    /// A nudge toward the answer that does not give it away.
    pub hint: String,

    /// Why the correct answer is correct.
    pub explanation: String,
}

impl QuizQuestion {
    /// Creates a question from its parts.
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        options: [impl Into<String>; OPTION_COUNT],
        correct_answer: impl Into<String>,
        hint: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options: options.map(Into::into),
            correct_answer: correct_answer.into(),
            hint: hint.into(),
            explanation: explanation.into(),
        }
    }

    /// Iterates over `(label, option)` pairs, e.g. `('a', "Paris")`.
    pub fn labeled_options(&self) -> impl Iterator<Item = (char, &str)> {
        OPTION_LABELS
            .iter()
            .copied()
            .zip(self.options.iter().map(String::as_str))
    }
}

// ============================================================================
// Quiz
// ============================================================================

/// An ordered sequence of questions.
///
/// Serializes as a bare JSON array of [`QuizQuestion`] objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
}

impl Quiz {
    /// Creates a quiz from a list of questions.
    #[must_use]
    pub const fn new(questions: Vec<QuizQuestion>) -> Self {
        Self { questions }
    }

    /// Returns the questions in order.
    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Returns the number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Returns `true` if the quiz has no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Iterates over the questions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, QuizQuestion> {
        self.questions.iter()
    }
}

impl FromIterator<QuizQuestion> for Quiz {
    fn from_iter<I: IntoIterator<Item = QuizQuestion>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Quiz {
    type Item = &'a QuizQuestion;
    type IntoIter = std::slice::Iter<'a, QuizQuestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Quiz {
    type Item = QuizQuestion;
    type IntoIter = std::vec::IntoIter<QuizQuestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.into_iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
