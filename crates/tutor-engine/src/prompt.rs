//! Prompt construction for tutoring and quiz requests.
//!
//! Both builders are pure string templates. Request fields are interpolated
//! verbatim; nothing is validated or escaped here.

use crate::request::TutoringRequest;

/// Builds the instruction for a personalized explanation.
#[must_use]
pub fn tutoring_prompt(request: &TutoringRequest) -> String {
    let TutoringRequest {
        subject,
        level,
        question,
        learning_style,
        background,
        language,
    } = request;

    format!(
        r"You are an expert tutor specializing in {subject} at a {level} level.

STUDENT PROFILE:
- Background knowledge: {background}
- Learning style preference: {learning_style}
- Preferred language: {language}

QUESTION:
{question}

INSTRUCTIONS:
1. Give a clear, educational explanation that answers the question directly.
2. Pitch the explanation at a {background} student working at {level} level.
3. Write in {language}.
4. Use markdown formatting for readability.

LEARNING STYLE ADAPTATIONS:
- Visual learners: describe diagrams, visual concepts or mental models.
- Text-based learners: give a structured explanation with clearly defined concepts.
- Hands-on learners: include practical examples, exercises or applications.

Be accurate and engaging, and help the student understand the topic in depth."
    )
}

/// Builds the instruction for a multiple-choice quiz of `num_questions` questions.
///
/// The model is asked for a bare JSON array; [`crate::parser::QuizParser`]
/// copes with replies that ignore that request.
#[must_use]
pub fn quiz_prompt(subject: &str, level: &str, num_questions: u32) -> String {
    format!(
        r#"Create a {level} level quiz on {subject} with exactly {num_questions} multiple-choice questions.

INSTRUCTIONS:
1. Every question must suit {level} level students.
2. Every question must have exactly 4 answer options (A, B, C, D).
3. Mark the correct answer for every question; it must match one of the options exactly.
4. Give a short hint for every question that helps without revealing the answer.
5. Cover a range of topics within {subject}.

RESPOND WITH JSON IN THIS SHAPE:
```json
[
    {{
        "question": "Question text",
        "options": ["Option A", "Option B", "Option C", "Option D"],
        "correct_answer": "Option A",
        "hint": "Short hint for this question",
        "explanation": "Short explanation of why this answer is correct"
    }}
]
```

IMPORTANT: Reply with a single valid JSON array and nothing else. Do not add any text before or after the array."#
    )
}
