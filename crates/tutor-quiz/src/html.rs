//! HTML rendering for quizzes.
//!
//! This module provides the [`HtmlGenerator`] struct for converting a [`Quiz`]
//! into a single self-contained HTML document with embedded styling and
//! scripting. Two layouts are available through [`RenderMode`]:
//!
//! - [`RenderMode::Interactive`] - radio-button options with Check Answer,
//!   Hint and Reveal Answer controls per question
//! - [`RenderMode::Simple`] - a plain option list with a single Reveal Answer
//!   toggle over the answer and explanation
//!
//! # Example
//!
//! ```rust
//! use tutor_quiz::{HtmlGenerator, Quiz, QuizQuestion, RenderMode};
//!
//! let quiz = Quiz::new(vec![QuizQuestion::new(
//!     "Largest planet?",
//!     ["Mars", "Jupiter", "Venus", "Earth"],
//!     "Jupiter",
//!     "It is a gas giant.",
//!     "Jupiter is more than twice as massive as all other planets combined.",
//! )]);
//!
//! let html = HtmlGenerator::new(&quiz, RenderMode::Simple).generate();
//! assert!(html.starts_with("<!DOCTYPE html>"));
//! assert!(html.contains("<li>Jupiter</li>"));
//! ```

use std::fmt::Write;

use crate::{Quiz, QuizQuestion};

/// Layout of the rendered quiz document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Selectable options with answer checking, hint and reveal toggles.
    #[default]
    Interactive,
    /// Option list with a single reveal toggle, no answer checking.
    Simple,
}

const SHARED_STYLE: &str = r"        body {
            font-family: Arial, sans-serif;
            color: white;
            background-color: #121212;
        }
        .quiz-container {
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
        }
        .question {
            margin-bottom: 30px;
            padding: 20px;
            border: 1px solid #444;
            border-radius: 10px;
            background-color: #1e1e2f;
        }
        .question h3 {
            margin-top: 0;
        }
        .answer {
            display: none;
            margin-top: 10px;
            padding: 10px;
            background-color: #333;
            border-radius: 5px;
            border: 1px solid #555;
        }";

const INTERACTIVE_STYLE: &str = r"        .options label {
            display: block;
            margin-bottom: 8px;
            cursor: pointer;
        }
        .options input[type='radio'] {
            margin-right: 10px;
        }
        .feedback {
            margin-top: 10px;
            font-weight: bold;
        }
        .correct {
            color: #4CAF50;
        }
        .incorrect {
            color: #f44336;
        }
        .hint {
            display: none;
            margin-top: 10px;
            padding: 10px;
            background-color: #333;
            border-radius: 5px;
            border: 1px solid #555;
        }
        .btn {
            background-color: #4CAF50;
            color: white;
            padding: 8px 15px;
            border: none;
            cursor: pointer;
            border-radius: 5px;
            margin-right: 10px;
            font-size: 14px;
        }
        .btn:hover {
            background-color: #45a049;
        }";

const SIMPLE_STYLE: &str = r"        .reveal-btn {
            background-color: #4CAF50;
            color: white;
            padding: 10px;
            border: none;
            cursor: pointer;
            border-radius: 5px;
        }
        .reveal-btn:hover {
            background-color: #45a049;
        }";

const INTERACTIVE_SCRIPT: &str = r"        function checkAnswer(qIdx) {
            const block = document.getElementById('question-' + qIdx);
            const feedback = document.getElementById('feedback-' + qIdx);
            const picked = block.querySelector('input[name=q' + qIdx + ']:checked');
            if (!picked) {
                feedback.innerHTML = '<span class=incorrect>Please select an answer before checking.</span>';
                return;
            }
            if (picked.value === block.dataset.correct) {
                feedback.innerHTML = '<span class=correct>Correct! &#127881;</span>';
            } else {
                feedback.innerHTML = '<span class=incorrect>Incorrect! Try again or reveal the answer.</span>';
            }
        }

        function toggle(id) {
            const el = document.getElementById(id);
            el.style.display = el.style.display === 'block' ? 'none' : 'block';
        }

        function toggleHint(qIdx) {
            toggle('hint-' + qIdx);
        }

        function toggleAnswer(qIdx) {
            toggle('answer-' + qIdx);
        }";

const SIMPLE_SCRIPT: &str = r"        function toggleAnswer(button) {
            const answer = button.nextElementSibling;
            if (answer.style.display === 'block') {
                answer.style.display = 'none';
                button.innerText = 'Reveal Answer';
            } else {
                answer.style.display = 'block';
                button.innerText = 'Hide Answer';
            }
        }";

/// Generates HTML documents from quizzes.
///
/// The generator borrows the quiz and renders it in the requested
/// [`RenderMode`]. Question, option, hint and explanation text is
/// HTML-escaped as it is interpolated.
pub struct HtmlGenerator<'a> {
    quiz: &'a Quiz,
    mode: RenderMode,
}

impl<'a> HtmlGenerator<'a> {
    /// Creates a new generator for the given quiz and layout.
    #[must_use]
    pub const fn new(quiz: &'a Quiz, mode: RenderMode) -> Self {
        Self { quiz, mode }
    }

    /// Generates the complete HTML document.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        self.write_head(&mut output);
        self.write_questions(&mut output);
        self.write_tail(&mut output);

        output
    }

    /// Writes the doctype, metadata and embedded stylesheet, and opens the container.
    fn write_head(&self, output: &mut String) {
        let mode_style = match self.mode {
            RenderMode::Interactive => INTERACTIVE_STYLE,
            RenderMode::Simple => SIMPLE_STYLE,
        };

        let _ = writeln!(output, "<!DOCTYPE html>");
        let _ = writeln!(output, "<html>");
        let _ = writeln!(output, "<head>");
        let _ = writeln!(output, "    <meta charset=\"UTF-8\">");
        let _ = writeln!(
            output,
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        );
        let _ = writeln!(output, "    <style>");
        let _ = writeln!(output, "{SHARED_STYLE}");
        let _ = writeln!(output, "{mode_style}");
        let _ = writeln!(output, "    </style>");
        let _ = writeln!(output, "</head>");
        let _ = writeln!(output, "<body>");
        let _ = writeln!(output, "    <div class=\"quiz-container\">");
    }

    fn write_questions(&self, output: &mut String) {
        for (idx, question) in self.quiz.iter().enumerate() {
            match self.mode {
                RenderMode::Interactive => Self::write_interactive_question(output, idx, question),
                RenderMode::Simple => Self::write_simple_question(output, question),
            }
        }
    }

    /// Writes one question with radio options and its three controls.
    ///
    /// The correct answer lives in a `data-correct` attribute so the
    /// check script compares decoded attribute values on both sides.
    fn write_interactive_question(output: &mut String, idx: usize, question: &QuizQuestion) {
        let number = idx + 1;
        let text = escape_html(&question.question);
        let correct = escape_html(&question.correct_answer);

        let _ = writeln!(
            output,
            "        <div class=\"question\" id=\"question-{idx}\" data-correct=\"{correct}\">"
        );
        let _ = writeln!(output, "            <h3>Q{number}: {text}</h3>");
        let _ = writeln!(output, "            <div class=\"options\">");
        for (label, option) in question.labeled_options() {
            let option = escape_html(option);
            let _ = writeln!(output, "                <label>");
            let _ = writeln!(
                output,
                "                    <input type=\"radio\" name=\"q{idx}\" value=\"{option}\">"
            );
            let _ = writeln!(output, "                    <strong>{label})</strong> {option}");
            let _ = writeln!(output, "                </label>");
        }
        let _ = writeln!(output, "            </div>");
        let _ = writeln!(
            output,
            "            <button class=\"btn\" onclick=\"checkAnswer({idx})\">Check Answer</button>"
        );
        let _ = writeln!(
            output,
            "            <button class=\"btn\" onclick=\"toggleHint({idx})\">Hint</button>"
        );
        let _ = writeln!(
            output,
            "            <button class=\"btn\" onclick=\"toggleAnswer({idx})\">Reveal Answer</button>"
        );
        let _ = writeln!(
            output,
            "            <div class=\"feedback\" id=\"feedback-{idx}\"></div>"
        );
        let _ = writeln!(
            output,
            "            <div class=\"hint\" id=\"hint-{idx}\"><strong>Hint:</strong> {}</div>",
            escape_html(&question.hint)
        );
        Self::write_answer_block(output, Some(idx), question);
        let _ = writeln!(output, "        </div>");
    }

    /// Writes one question as a plain list with a reveal toggle.
    fn write_simple_question(output: &mut String, question: &QuizQuestion) {
        let _ = writeln!(output, "        <div class=\"question\">");
        let _ = writeln!(
            output,
            "            <h3>{}</h3>",
            escape_html(&question.question)
        );
        let _ = writeln!(output, "            <ul>");
        for option in &question.options {
            let _ = writeln!(output, "                <li>{}</li>", escape_html(option));
        }
        let _ = writeln!(output, "            </ul>");
        let _ = writeln!(
            output,
            "            <button class=\"reveal-btn\" onclick=\"toggleAnswer(this)\">Reveal Answer</button>"
        );
        Self::write_answer_block(output, None, question);
        let _ = writeln!(output, "        </div>");
    }

    fn write_answer_block(output: &mut String, idx: Option<usize>, question: &QuizQuestion) {
        match idx {
            Some(idx) => {
                let _ = writeln!(
                    output,
                    "            <div class=\"answer\" id=\"answer-{idx}\">"
                );
            }
            None => {
                let _ = writeln!(output, "            <div class=\"answer\">");
            }
        }
        let _ = writeln!(
            output,
            "                <p><strong>Correct Answer: </strong>{}</p>",
            escape_html(&question.correct_answer)
        );
        let _ = writeln!(
            output,
            "                <p><strong>Explanation: </strong>{}</p>",
            escape_html(&question.explanation)
        );
        let _ = writeln!(output, "            </div>");
    }

    /// Closes the container and writes the embedded script.
    fn write_tail(&self, output: &mut String) {
        let script = match self.mode {
            RenderMode::Interactive => INTERACTIVE_SCRIPT,
            RenderMode::Simple => SIMPLE_SCRIPT,
        };

        let _ = writeln!(output, "    </div>");
        let _ = writeln!(output, "    <script>");
        let _ = writeln!(output, "{script}");
        let _ = writeln!(output, "    </script>");
        let _ = writeln!(output, "</body>");
        let _ = writeln!(output, "</html>");
    }
}

/// Escapes characters with special meaning in HTML text and attribute values.
fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(ch),
        }
    }

    result
}

// ============================================================================
// Tests
// ============================================================================
