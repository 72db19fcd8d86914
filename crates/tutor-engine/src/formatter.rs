//! Learning-style adjustments applied to tutoring replies.

use crate::request::LearningStyle;

const VISUAL_NOTE: &str = "\n\n*Note: Visualize these concepts as you read for better retention.*";
const HANDS_ON_NOTE: &str =
    "\n\n*Note: Try working through the examples yourself to reinforce your learning.*";

/// Appends a style-specific study note to `content`.
///
/// Visual and hands-on learners get a closing note; every other style gets
/// the content back unchanged.
#[must_use]
pub fn format_tutoring_response(content: &str, style: &LearningStyle) -> String {
    match style {
        LearningStyle::Visual => format!("{content}{VISUAL_NOTE}"),
        LearningStyle::HandsOn => format!("{content}{HANDS_ON_NOTE}"),
        LearningStyle::TextBased | LearningStyle::Other(_) => content.to_string(),
    }
}
