//! Plain text outlines with indentation-based lists
//!
//! Blocks are separated by blank lines. A block whose first line carries a list marker
//! (`*`, `-`, `+`, `1.`, `a.`, `i.` ...) is read as a nested list, where nesting follows the
//! indentation in units of `indent_width` columns; every other block is a paragraph.
//!
//! ```text
//! Groceries for the week
//!
//! * fruit
//!   * apples
//!   * pears
//! * vegetables
//!   1. leeks
//! ```

use crate::common::tree_list::{list_events_from_lines, recognize_list_line};
use crate::error::FormatError;
use crate::format::Format;
use crate::sink::{Attributes, Event};

/// Default columns per nesting level
pub const DEFAULT_INDENT_WIDTH: usize = 2;

pub struct OutlineFormat {
    indent_width: usize,
}

impl OutlineFormat {
    pub fn new(indent_width: usize) -> Self {
        Self { indent_width }
    }
}

impl Default for OutlineFormat {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT_WIDTH)
    }
}

impl Format for OutlineFormat {
    fn name(&self) -> &str {
        "outline"
    }

    fn description(&self) -> &str {
        "Plain text with indentation-based lists"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt", "outline"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<Event>, FormatError> {
        let mut events = vec![
            Event::StartHead(Attributes::new()),
            Event::EndHead,
            Event::StartBody(Attributes::new()),
        ];

        for block in blocks(source) {
            let is_list = block
                .first()
                .is_some_and(|line| recognize_list_line(line, self.indent_width).is_some());
            if is_list {
                let list = list_events_from_lines(block.iter().copied(), self.indent_width)
                    .map_err(|e| FormatError::ParseError(e.to_string()))?;
                events.extend(list);
            } else {
                let text: Vec<&str> = block.iter().map(|line| line.trim()).collect();
                events.push(Event::StartParagraph(Attributes::new()));
                events.push(Event::text(text.join("\n")));
                events.push(Event::EndParagraph);
            }
        }

        events.push(Event::EndBody);
        Ok(events)
    }
}

/// Groups consecutive non-blank lines.
fn blocks(source: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in source.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}
