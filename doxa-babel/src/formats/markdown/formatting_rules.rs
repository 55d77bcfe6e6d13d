use serde::{Deserialize, Serialize};

/// Configuration for the Markdown serializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownRules {
    /// Line terminator written after every line
    pub line_ending: String,

    /// Prefix added to every line nested inside a list item (usually 4 spaces). Items whose
    /// marker is wider (`1. `, `10. `) are indented by the marker width instead.
    pub list_indent: String,
}

impl Default for MarkdownRules {
    fn default() -> Self {
        Self {
            line_ending: "\n".to_string(),
            list_indent: "    ".to_string(),
        }
    }
}
