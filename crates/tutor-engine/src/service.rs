//! The tutoring workflow: prompt, one model call, then parse or format.
//!
//! [`TutorService`] is what the HTTP layer and the CLI drive. It holds no
//! per-request state, so one instance is shared across all requests.

use std::sync::Arc;

use tracing::{error, info, info_span, Span};
use tutor_quiz::{HtmlGenerator, Quiz, RenderMode};

use crate::error::Result;
use crate::formatter::format_tutoring_response;
use crate::llm::CompletionClient;
use crate::parser::{ParsedQuiz, QuizParser};
use crate::prompt::{quiz_prompt, tutoring_prompt};
use crate::request::{validate_question_count, QuizRequest, TutoringRequest};

/// A generated quiz plus its optional interactive rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    /// The questions, parsed from the model or placeholders.
    pub quiz: Quiz,
    /// Interactive HTML document, present when `reveal_format` was requested.
    pub formatted_quiz: Option<String>,
    /// Whether the model reply was unusable and placeholders were returned.
    pub used_fallback: bool,
}

/// Orchestrates tutoring and quiz requests against a completion client.
#[derive(Clone)]
pub struct TutorService {
    client: Arc<dyn CompletionClient>,
    parser: QuizParser,
    span: Span,
}

impl std::fmt::Debug for TutorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorService")
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

impl TutorService {
    /// Creates a service that logs under a `tutor_service` span.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self::with_span(client, info_span!("tutor_service"))
    }

    /// Creates a service that logs under `span`; the parser logs under a child span.
    #[must_use]
    pub fn with_span(client: Arc<dyn CompletionClient>, span: Span) -> Self {
        let parser = QuizParser::with_span(info_span!(parent: &span, "quiz_parser"));
        Self {
            client,
            parser,
            span,
        }
    }

    /// Generates a personalized explanation for `request`.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::LlmApiError` if the model call fails.
    pub async fn tutor(&self, request: &TutoringRequest) -> Result<String> {
        info!(
            parent: &self.span,
            subject = %request.subject,
            level = %request.level,
            language = %request.language,
            "Generating tutoring response"
        );

        let prompt = tutoring_prompt(request);
        let content = self.complete(&prompt).await?;

        Ok(format_tutoring_response(&content, &request.learning_style))
    }

    /// Generates a quiz for `request`.
    ///
    /// Unusable model output never fails the call; see [`QuizResult::used_fallback`].
    ///
    /// # Errors
    ///
    /// Returns `TutorError::InvalidRequest` if the question count is out of
    /// range, or `TutorError::LlmApiError` if the model call fails.
    pub async fn generate_quiz(&self, request: &QuizRequest) -> Result<QuizResult> {
        request.validate()?;

        let parsed = self
            .request_quiz(&request.subject, &request.level, request.num_questions)
            .await?;
        let used_fallback = parsed.is_fallback();
        let quiz = parsed.into_quiz();

        let formatted_quiz = request
            .reveal_format
            .then(|| HtmlGenerator::new(&quiz, RenderMode::Interactive).generate());

        Ok(QuizResult {
            quiz,
            formatted_quiz,
            used_fallback,
        })
    }

    /// Generates a quiz and returns it as an interactive HTML document.
    ///
    /// # Errors
    ///
    /// Same as [`TutorService::generate_quiz`].
    pub async fn quiz_html(&self, subject: &str, level: &str, num_questions: u32) -> Result<String> {
        validate_question_count(num_questions)?;

        let quiz = self
            .request_quiz(subject, level, num_questions)
            .await?
            .into_quiz();

        Ok(HtmlGenerator::new(&quiz, RenderMode::Interactive).generate())
    }

    async fn request_quiz(&self, subject: &str, level: &str, num_questions: u32) -> Result<ParsedQuiz> {
        info!(
            parent: &self.span,
            subject,
            level,
            questions = num_questions,
            "Generating quiz"
        );

        let prompt = quiz_prompt(subject, level, num_questions);
        let raw = self.complete(&prompt).await?;

        Ok(self.parser.parse(&raw, subject, num_questions))
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.client.complete(prompt).await.map_err(|e| {
            error!(
                parent: &self.span,
                error = %e,
                transient = e.is_transient(),
                "Model call failed"
            );
            e
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{LlmErrorKind, TutorError};
    use crate::llm::stub::StubClient;
    use crate::request::LearningStyle;

    const ONE_QUESTION: &str = r#"```json
[
    {
        "question": "Which planet is closest to the Sun?",
        "options": ["Venus", "Mercury", "Earth", "Mars"],
        "correct_answer": "Mercury",
        "hint": "It is also the smallest.",
        "explanation": "Mercury orbits at about 0.39 AU."
    }
]
```"#;

    fn service_with(stub: &Arc<StubClient>) -> TutorService {
        TutorService::new(Arc::clone(stub) as Arc<dyn CompletionClient>)
    }

    #[tokio::test]
    async fn test_tutor_formats_for_learning_style() {
        let stub = Arc::new(StubClient::replying("Gravity pulls masses together."));
        let service = service_with(&stub);

        let request = TutoringRequest::new("Physics", "Beginner", "What is gravity?")
            .with_learning_style(LearningStyle::Visual);
        let response = service.tutor(&request).await.unwrap();

        assert!(response.starts_with("Gravity pulls masses together."));
        assert!(response.ends_with("for better retention.*"));

        let prompts = stub.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("What is gravity?"));
    }

    #[test]
    fn test_tutor_text_based_is_unchanged() {
        let stub = Arc::new(StubClient::replying("Hue is the color itself."));
        let service = service_with(&stub);

        let request = TutoringRequest::new("Art", "Beginner", "What is hue?");
        let response = tokio_test::block_on(service.tutor(&request)).unwrap();

        assert_eq!(response, "Hue is the color itself.");
    }

    #[tokio::test]
    async fn test_tutor_lowercase_style_passes_through_unchanged() {
        let stub = Arc::new(StubClient::replying("text"));
        let service = service_with(&stub);

        let request: TutoringRequest = serde_json::from_str(
            r#"{"subject": "Art", "level": "Beginner", "question": "What is hue?", "learning_style": "visual"}"#,
        )
        .unwrap();
        let response = service.tutor(&request).await.unwrap();

        assert_eq!(response, "text");
        assert!(stub.prompts()[0].contains("- Learning style preference: visual\n"));
    }

    #[tokio::test]
    async fn test_tutor_propagates_model_errors() {
        let stub = Arc::new(StubClient::failing(LlmErrorKind::Server));
        let service = service_with(&stub);

        let err = service
            .tutor(&TutoringRequest::new("Math", "Beginner", "What is 1+1?"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TutorError::LlmApiError {
                kind: LlmErrorKind::Server,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_generate_quiz_with_html() {
        let stub = Arc::new(StubClient::replying(ONE_QUESTION));
        let service = service_with(&stub);

        let result = service
            .generate_quiz(&QuizRequest::new("Astronomy", "Beginner", 3))
            .await
            .unwrap();

        assert!(!result.used_fallback);
        assert_eq!(result.quiz.len(), 1);
        let html = result.formatted_quiz.unwrap();
        assert!(html.contains("Q1: Which planet is closest to the Sun?"));
        assert!(stub.prompts()[0].contains("exactly 3 multiple-choice questions"));
    }

    #[tokio::test]
    async fn test_generate_quiz_without_html() {
        let stub = Arc::new(StubClient::replying(ONE_QUESTION));
        let service = service_with(&stub);

        let request = QuizRequest::new("Astronomy", "Beginner", 1).with_reveal_format(false);
        let result = service.generate_quiz(&request).await.unwrap();

        assert!(result.formatted_quiz.is_none());
        assert_eq!(result.quiz.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_quiz_falls_back_on_prose() {
        let stub = Arc::new(StubClient::replying("Sorry, I can't help with that."));
        let service = service_with(&stub);

        let result = service
            .generate_quiz(&QuizRequest::new("Art", "Beginner", 2))
            .await
            .unwrap();

        assert!(result.used_fallback);
        assert_eq!(result.quiz.len(), 2);
        assert_eq!(result.quiz.questions()[1].question, "Sample Art Question #2");
    }

    #[tokio::test]
    async fn test_generate_quiz_rejects_count_before_calling_model() {
        let stub = Arc::new(StubClient::replying(ONE_QUESTION));
        let service = service_with(&stub);

        let err = service
            .generate_quiz(&QuizRequest::new("Art", "Beginner", 11))
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert!(stub.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_quiz_html_is_interactive_document() {
        let stub = Arc::new(StubClient::replying(ONE_QUESTION));
        let service = service_with(&stub);

        let html = service.quiz_html("Astronomy", "Beginner", 1).await.unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("checkAnswer(0)"));
    }

    #[tokio::test]
    async fn test_quiz_html_rejects_zero_questions() {
        let stub = Arc::new(StubClient::replying(ONE_QUESTION));
        let service = service_with(&stub);

        assert!(service.quiz_html("Astronomy", "Beginner", 0).await.is_err());
        assert!(stub.prompts().is_empty());
    }
}
