//! Writing rendered quizzes to disk.
//!
//! [`write_html`] is the fallible operation; [`export_quiz_to_html`] wraps it
//! for callers that only need to know whether the export succeeded.
//!
//! # Example
//!
//! ```rust,no_run
//! use tutor_quiz::{export_quiz_to_html, Quiz};
//!
//! let quiz = Quiz::default();
//! if !export_quiz_to_html(&quiz, "quiz.html") {
//!     eprintln!("export failed");
//! }
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::{error, info};

use crate::{HtmlGenerator, Quiz, RenderMode, Result};

/// File name used when no export path is given.
pub const DEFAULT_EXPORT_PATH: &str = "quiz.html";

/// Renders the quiz and writes the document to `path`.
///
/// Creates or overwrites the file. Parent directories must exist. An empty
/// quiz still produces the full document shell with no question blocks.
///
/// # Errors
///
/// Returns [`QuizError::Io`](crate::QuizError::Io) if file creation or writing fails.
pub fn write_html(quiz: &Quiz, mode: RenderMode, path: &Path) -> Result<()> {
    let html = HtmlGenerator::new(quiz, mode).generate();

    let mut file = File::create(path)?;
    file.write_all(html.as_bytes())?;

    Ok(())
}

/// Exports the interactive quiz document to `path`.
///
/// Returns `true` on success. Failures are logged and reported as `false`.
pub fn export_quiz_to_html(quiz: &Quiz, path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();

    match write_html(quiz, RenderMode::Interactive, path) {
        Ok(()) => {
            info!(path = %path.display(), questions = quiz.len(), "Quiz exported");
            true
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to export quiz");
            false
        }
    }
}
