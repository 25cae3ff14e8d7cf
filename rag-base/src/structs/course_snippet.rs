use serde::Serialize;

/// One retrieved course-material match.
///
/// `metadata` is the stored point payload verbatim; the chat prompt embeds it
/// as JSON without interpreting individual fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSnippet {
    pub id: String,
    pub score: f32,
    pub metadata: serde_json::Value,
}
