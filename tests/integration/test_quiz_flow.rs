//! Integration tests for the offline quiz pipeline.
//!
//! Covers config loading from a fixture, parsing canned model replies and
//! exporting the result to disk in both render modes.

use std::path::PathBuf;

use tutor_engine::{Config, ParseFailure, QuizParser, TutorError};
use tutor_quiz::{export_quiz_to_html, write_html, HtmlGenerator, Quiz, RenderMode};

/// Path to the fixtures directory.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn reply_fixture(name: &str) -> String {
    let path = fixture_path().join("replies").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {e}", path.display()))
}

/// Returns a unique path in the temp dir for this test.
fn temp_output(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tutor_integration_{}_{name}", std::process::id()))
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_sample_config_loads() {
    let config_path = fixture_path().join("tutor.json");
    assert!(
        config_path.exists(),
        "Config fixture not found at: {config_path:?}"
    );

    let config = Config::load_from_file(&config_path).expect("Failed to load config");

    assert_eq!(config.llm.model, "llama-3.1-8b-instant");
    assert_eq!(config.llm.api_key_env, "TUTOR_TEST_API_KEY");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.quiz.default_questions, 3);
    assert_eq!(config.quiz.export_path, "chemistry-quiz.html");
}

#[test]
fn test_custom_key_variable_has_no_fallback() {
    let config = Config::load_from_file(&fixture_path().join("tutor.json"))
        .expect("Failed to load config");

    let result = config.llm.resolve_api_key(|var| {
        (var == "OPENAI_API_KEY").then(|| "should-not-be-used".to_string())
    });

    assert!(matches!(
        result,
        Err(TutorError::MissingApiKey { ref var }) if var == "TUTOR_TEST_API_KEY"
    ));
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let config = Config::load_from_dir(&fixture_path().join("replies"))
        .expect("Defaults should load");

    assert_eq!(config.server.port, 8000);
    assert_eq!(config.quiz.export_path, "quiz.html");
}

// ============================================================================
// Parse and Export
// ============================================================================

#[test]
fn test_fenced_reply_exports_interactive_page() {
    let parsed = QuizParser::new().parse(&reply_fixture("fenced_quiz.txt"), "Chemistry", 5);
    assert!(!parsed.is_fallback());

    let quiz = parsed.into_quiz();
    assert_eq!(quiz.len(), 3);
    assert_eq!(
        quiz.questions()[2].explanation,
        "The correct answer is 7."
    );

    let out = temp_output("interactive.html");
    assert!(export_quiz_to_html(&quiz, &out));

    let html = std::fs::read_to_string(&out).expect("Export missing");
    assert!(html.contains("Q1: What is the chemical symbol for gold?"));
    assert!(html.contains("data-correct=\"Carbon dioxide\""));
    assert_eq!(html.matches("type=\"radio\"").count(), 12);

    std::fs::remove_file(&out).ok();
}

#[test]
fn test_fenced_reply_exports_simple_page() {
    let quiz = QuizParser::new()
        .parse(&reply_fixture("fenced_quiz.txt"), "Chemistry", 2)
        .into_quiz();

    let out = temp_output("simple.html");
    write_html(&quiz, RenderMode::Simple, &out).expect("Export failed");

    let html = std::fs::read_to_string(&out).expect("Export missing");
    assert!(html.contains("<li>Au</li>"));
    assert!(!html.contains("checkAnswer"));
    assert!(!html.contains("pH of pure water"));

    std::fs::remove_file(&out).ok();
}

#[test]
fn test_wrong_option_count_exports_placeholders() {
    let parsed = QuizParser::new().parse(&reply_fixture("three_options.txt"), "Chemistry", 2);

    assert_eq!(
        parsed.failure(),
        Some(&ParseFailure::WrongOptionCount { index: 0, count: 3 })
    );

    let quiz = parsed.into_quiz();
    let html = HtmlGenerator::new(&quiz, RenderMode::Interactive).generate();
    assert!(html.contains("Q2: Sample Chemistry Question #2"));
    assert!(html.contains("No hint available for this question."));
}

#[test]
fn test_quiz_json_is_a_bare_array() {
    let quiz = QuizParser::new()
        .parse(&reply_fixture("prose_reply.txt"), "History", 1)
        .into_quiz();

    let json = serde_json::to_value(&quiz).expect("Serialize failed");
    let questions = json.as_array().expect("Quiz should serialize as an array");
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0]["hint"], "No hint available for this question.");

    let back: Quiz = serde_json::from_value(json).expect("Deserialize failed");
    assert_eq!(back, quiz);
}
