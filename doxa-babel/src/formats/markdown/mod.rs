//! Markdown format implementation
//!
//! Bidirectional conversion between the event stream and CommonMark Markdown.
//!
//! # Library Choice
//!
//! Parsing uses the `comrak` crate (CommonMark plus the GFM table and strike-through
//! extensions). Serialization is a streaming [`serializer::MarkdownSink`]: events are rendered
//! as they arrive, so escaping has to be decided from the writer's line position rather than
//! from a finished tree.
//!
//! # Element Mapping Table
//!
//! | Event                   | Markdown                 | Notes                                   |
//! |-------------------------|--------------------------|-----------------------------------------|
//! | head (title/author/date)| `---` front matter       | authors as a YAML list                  |
//! | section + sectionTitle  | `#`..`######` heading    | sections are re-nested on import        |
//! | paragraph               | paragraph                |                                         |
//! | list / numberedList     | `- ` / `1. `             | non-decimal numbering degrades          |
//! | definitionList          | HTML `<dl>` block        | not parsed back                         |
//! | table                   | GFM pipe table           | header row synthesized when missing     |
//! | figureGraphics          | `![alt](src)`            |                                         |
//! | blockquote              | `> `                     |                                         |
//! | verbatim                | fenced code block        | `language` attribute → info string      |
//! | bold / italic           | `**x**` / `_x_`          |                                         |
//! | monospaced, code        | `` `x` ``                |                                         |
//! | inline(delete)          | `~~x~~`                  |                                         |
//! | link / anchor           | `[x](t)` / `<a id>`      | links inside code blocks are dropped    |
//! | comment                 | `<!--x-->`               |                                         |
//! | horizontalRule          | `========`               |                                         |
//!
//! # Lossy Conversions
//!
//! - Numbered list styles other than decimal
//! - Definition lists (exported as HTML, imported as raw text)
//! - Table captions and page breaks
//! - Ordered list start numbers

pub mod context;
pub mod escape;
pub mod formatting_rules;
pub mod parser;
pub mod serializer;
pub mod writer;

use crate::error::FormatError;
use crate::format::Format;
use crate::sink::Event;
use formatting_rules::MarkdownRules;
use std::collections::HashMap;

/// Option key selecting the line terminator (`lf`, `crlf` or `cr`)
pub const LINE_ENDING_OPTION: &str = "line-ending";
/// Option key selecting the list item indent width in spaces
pub const LIST_INDENT_OPTION: &str = "list-indent";

/// Format implementation for Markdown
#[derive(Default)]
pub struct MarkdownFormat {
    rules: MarkdownRules,
}

impl MarkdownFormat {
    pub fn new(rules: MarkdownRules) -> Self {
        Self { rules }
    }

    fn rules_with_options(
        &self,
        options: &HashMap<String, String>,
    ) -> Result<MarkdownRules, FormatError> {
        let mut rules = self.rules.clone();
        for (key, value) in options {
            match key.as_str() {
                LINE_ENDING_OPTION => rules.line_ending = parse_line_ending(value)?,
                LIST_INDENT_OPTION => {
                    let width: usize = value.parse().map_err(|_| {
                        FormatError::SerializationError(format!(
                            "Invalid {LIST_INDENT_OPTION} '{value}': expected a number of spaces"
                        ))
                    })?;
                    rules.list_indent = " ".repeat(width);
                }
                other => {
                    return Err(FormatError::NotSupported(format!(
                        "Format 'markdown' does not support parameter '{other}'"
                    )))
                }
            }
        }
        Ok(rules)
    }
}

/// Maps a line ending name to its literal
pub fn parse_line_ending(value: &str) -> Result<String, FormatError> {
    match value.to_ascii_lowercase().as_str() {
        "lf" | "\n" => Ok("\n".to_string()),
        "crlf" | "\r\n" => Ok("\r\n".to_string()),
        "cr" | "\r" => Ok("\r".to_string()),
        _ => Err(FormatError::SerializationError(format!(
            "Invalid {LINE_ENDING_OPTION} '{value}': expected lf, crlf or cr"
        ))),
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown format"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<Event>, FormatError> {
        parser::parse_from_markdown(source)
    }

    fn serialize(&self, events: &[Event]) -> Result<String, FormatError> {
        serializer::serialize_to_markdown_with_rules(events, &self.rules)
    }

    fn serialize_with_options(
        &self,
        events: &[Event],
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let rules = self.rules_with_options(options)?;
        serializer::serialize_to_markdown_with_rules(events, &rules)
    }
}
