//! Element contexts of the Markdown serializer
//!
//! Every open element that changes how its content is rendered pushes one [`ElementContext`].
//! The context decides how text is escaped, whether content is captured in a buffer before it
//! is placed, and which prefix every nested line needs (`> ` inside a block quote, one indent
//! unit inside a list item).
//!
//! See <https://spec.commonmark.org/0.31.2/#blocks-and-inlines> for the block model the shapes
//! follow.

use super::escape::{escape_html, escape_markdown, escape_table_cell, LinePosition};

/// Block quote line prefix
pub const BLOCKQUOTE_PREFIX: &str = "> ";

/// Layout category of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Container with no layout of its own (document head and body)
    GenericContainer,
    /// Starts on a new line and prefixes every nested line
    ContainerBlock,
    /// Starts on a new line and holds only inline content
    LeafBlock,
    /// Lives inside a line
    Inline,
}

/// Escaping applied to text written directly inside a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escaping {
    None,
    Markdown,
    TableCell,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementContext {
    Head,
    Body,
    Figure,
    Heading,
    CodeBlock,
    CodeSpan,
    TableCaption,
    TableRow,
    TableCell,
    ListItem,
    Blockquote,
    HtmlBlock,
}

impl ElementContext {
    pub fn name(self) -> &'static str {
        match self {
            ElementContext::Head => "head",
            ElementContext::Body => "body",
            ElementContext::Figure => "figure",
            ElementContext::Heading => "heading",
            ElementContext::CodeBlock => "code block",
            ElementContext::CodeSpan => "code span",
            ElementContext::TableCaption => "table caption",
            ElementContext::TableRow => "table row",
            ElementContext::TableCell => "table cell",
            ElementContext::ListItem => "list item",
            ElementContext::Blockquote => "blockquote",
            ElementContext::HtmlBlock => "html block",
        }
    }

    pub fn shape(self) -> Shape {
        match self {
            ElementContext::Head | ElementContext::Body => Shape::GenericContainer,
            ElementContext::ListItem | ElementContext::Blockquote => Shape::ContainerBlock,
            ElementContext::Heading | ElementContext::CodeBlock | ElementContext::HtmlBlock => {
                Shape::LeafBlock
            }
            ElementContext::Figure
            | ElementContext::CodeSpan
            | ElementContext::TableCaption
            | ElementContext::TableRow
            | ElementContext::TableCell => Shape::Inline,
        }
    }

    pub fn escaping(self) -> Escaping {
        match self {
            ElementContext::Head | ElementContext::CodeBlock | ElementContext::CodeSpan => {
                Escaping::None
            }
            ElementContext::TableRow | ElementContext::TableCell => Escaping::TableCell,
            ElementContext::HtmlBlock => Escaping::Html,
            ElementContext::Body
            | ElementContext::Figure
            | ElementContext::Heading
            | ElementContext::TableCaption
            | ElementContext::ListItem
            | ElementContext::Blockquote => Escaping::Markdown,
        }
    }

    /// Content is captured and placed by the closing event.
    pub fn requires_buffering(self) -> bool {
        matches!(
            self,
            ElementContext::Head
                | ElementContext::Figure
                | ElementContext::CodeBlock
                | ElementContext::CodeSpan
                | ElementContext::TableCaption
                | ElementContext::TableRow
                | ElementContext::TableCell
        )
    }

    pub fn requires_surrounding_blank_lines(self) -> bool {
        matches!(self, ElementContext::HtmlBlock)
    }

    /// Prefix for every line nested in this context; empty unless a container block.
    pub fn prefix(self, list_indent: &str) -> &str {
        match self {
            ElementContext::ListItem => list_indent,
            ElementContext::Blockquote => BLOCKQUOTE_PREFIX,
            _ => "",
        }
    }

    pub fn is_block(self) -> bool {
        matches!(self.shape(), Shape::ContainerBlock | Shape::LeafBlock)
    }

    /// May hold block children.
    pub fn is_container(self) -> bool {
        matches!(self.shape(), Shape::ContainerBlock | Shape::GenericContainer)
    }

    /// Escapes text written directly inside this context.
    pub fn escape(self, text: &str, position: LinePosition) -> String {
        match self.escaping() {
            Escaping::None => text.to_string(),
            Escaping::Markdown => escape_markdown(
                text,
                LinePosition {
                    in_heading: self == ElementContext::Heading,
                    ..position
                },
            ),
            Escaping::TableCell => escape_table_cell(text, position),
            Escaping::Html => escape_html(text),
        }
    }
}
