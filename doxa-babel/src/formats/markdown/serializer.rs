//! Markdown serialization (events → Markdown)
//!
//! [`MarkdownSink`] consumes the event stream one event at a time and writes Markdown through a
//! [`LinePositionWriter`]. Everything it needs to decide how an event renders lives in a few
//! stacks:
//!
//! - contexts: one [`ElementContext`] per open element that changes rendering (list items,
//!   block quotes, code, table cells ...). `Body` is the floor.
//! - buffers: one per open buffering context. Content of a buffering context is captured and
//!   placed by its closing event (table rows, figure captions, code spans, document head).
//! - inline end markup: one entry per inline style opener, holding the closing markup in the
//!   order it has to be written.
//! - links: how each open link is rendered (directly, wrapped around a code span, or dropped).
//!
//! Block layout follows two rules. Entering or leaving a block context puts the cursor at the
//! beginning of a line (or after a blank line, for blocks that need one) and every new line
//! inside container blocks is prefixed with the prefixes of all open containers, outermost
//! first. Nested lists therefore indent naturally.
//!
//! A closer for a context other than the innermost one is a protocol fault and is reported as
//! [`SinkError::ContextMismatch`]. Constructs Markdown cannot express (definition lists, page
//! breaks, links in code blocks, non-decimal numbering) degrade with a `tracing` warning.

use super::context::ElementContext;
use super::escape::{
    code_fence, code_span, encode_html_comment, encode_id, escape_link_destination,
    escape_markdown, is_valid_id, LinePosition,
};
use super::formatting_rules::MarkdownRules;
use super::writer::LinePositionWriter;
use crate::error::{FormatError, SinkError};
use crate::sink::attributes::{Attributes, ALIGN, ALT, LANGUAGE, SEMANTICS, STYLE};
use crate::sink::{drive, Event, Justification, Numbering, SectionLevel, Sink};
use std::io::Write;

const METADATA_DELIMITER: &str = "---";
const HORIZONTAL_RULE: &str = "========";
const UNORDERED_ITEM: &str = "- ";
const NON_BREAKING_SPACE: &str = "&nbsp;";

/// Closing markup of an inline style.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EndMarkup {
    /// Closes the code span context and places its buffer, inside `links` link openers.
    CodeSpan { links: usize },
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LinkState {
    Direct(String),
    /// Markup already queued on the enclosing code span.
    AroundCodeSpan,
    Dropped,
}

#[derive(Debug, Default)]
struct TableState {
    justification: Vec<Justification>,
    cell_count: usize,
    first_row: bool,
    header_row: bool,
}

#[derive(Debug, Default)]
struct Metadata {
    title: Option<String>,
    authors: Vec<String>,
    date: Option<String>,
}

impl Metadata {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.authors.is_empty() && self.date.is_none()
    }
}

/// Renders events as Markdown.
pub struct MarkdownSink<W: Write> {
    writer: LinePositionWriter<W>,
    rules: MarkdownRules,
    contexts: Vec<ElementContext>,
    buffers: Vec<String>,
    inline_stack: Vec<Vec<EndMarkup>>,
    links: Vec<LinkState>,
    list_counters: Vec<usize>,
    table: TableState,
    metadata: Metadata,
    figure_src: Option<String>,
    code_language: String,
    /// One indent per open list item, at least as wide as its marker.
    item_indents: Vec<String>,
    /// The last write was a list item or block quote marker.
    after_marker: bool,
    /// A blank line is owed before the next output.
    blank_line_pending: bool,
}

impl<W: Write> MarkdownSink<W> {
    pub fn new(writer: W) -> Self {
        Self::with_rules(writer, MarkdownRules::default())
    }

    pub fn with_rules(writer: W, rules: MarkdownRules) -> Self {
        let writer = LinePositionWriter::with_line_separator(writer, rules.line_ending.clone());
        Self {
            writer,
            rules,
            contexts: vec![ElementContext::Body],
            buffers: Vec::new(),
            inline_stack: Vec::new(),
            links: Vec::new(),
            list_counters: Vec::new(),
            table: TableState::default(),
            metadata: Metadata::default(),
            figure_src: None,
            code_language: String::new(),
            item_indents: Vec::new(),
            after_marker: false,
            blank_line_pending: false,
        }
    }

    pub fn rules(&self) -> &MarkdownRules {
        &self.rules
    }

    /// Releases the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn reset(&mut self) {
        self.contexts.clear();
        self.contexts.push(ElementContext::Body);
        self.buffers.clear();
        self.inline_stack.clear();
        self.links.clear();
        self.list_counters.clear();
        self.table = TableState::default();
        self.metadata = Metadata::default();
        self.figure_src = None;
        self.code_language.clear();
        self.item_indents.clear();
        self.after_marker = false;
        self.blank_line_pending = false;
    }

    fn current(&self) -> ElementContext {
        self.contexts.last().copied().unwrap_or(ElementContext::Body)
    }

    fn eol(&self) -> String {
        self.rules.line_ending.clone()
    }

    /// Writes to the innermost buffer, or to the writer if nothing is buffering.
    ///
    /// A pending blank line is written first, even for empty text: callers only write once
    /// content follows.
    fn write_unescaped(&mut self, text: &str) -> Result<(), SinkError> {
        if self.buffers.is_empty() {
            self.write_pending_blank_line()?;
        }
        if text.is_empty() {
            return Ok(());
        }
        self.after_marker = false;
        match self.buffers.last_mut() {
            Some(buffer) => buffer.push_str(text),
            None => self.writer.write(text)?,
        }
        Ok(())
    }

    fn write_marker(&mut self, marker: &str) -> Result<(), SinkError> {
        self.write_unescaped(marker)?;
        self.after_marker = true;
        Ok(())
    }

    fn container_prefixes(&self) -> String {
        let mut item_indents = self.item_indents.iter();
        let mut prefixes = String::new();
        for context in &self.contexts {
            let indent = match context {
                ElementContext::ListItem => item_indents
                    .next()
                    .map_or(self.rules.list_indent.as_str(), String::as_str),
                _ => "",
            };
            prefixes.push_str(context.prefix(indent));
        }
        prefixes
    }

    fn write_prefixes(&mut self) -> Result<(), SinkError> {
        let prefixes = self.container_prefixes();
        self.write_unescaped(&prefixes)
    }

    /// Line terminator followed by the container prefixes.
    fn write_line_break(&mut self) -> Result<(), SinkError> {
        let eol = self.eol();
        self.write_unescaped(&eol)?;
        self.write_prefixes()
    }

    fn ensure_beginning_of_line(&mut self) -> Result<(), SinkError> {
        if self.buffers.is_empty() && !self.writer.is_at_start_of_new_line() {
            let eol = self.eol();
            self.write_unescaped(&eol)?;
        }
        Ok(())
    }

    /// Ends the current line and owes one blank line to whatever is written next.
    ///
    /// The blank line carries the container prefixes that are open when it is finally written
    /// (trimmed, so `> ` becomes `>`), which keeps block quotes and list items together.
    /// Calling this again before anything else is written has no effect.
    fn ensure_blank_line(&mut self) -> Result<(), SinkError> {
        if !self.buffers.is_empty()
            || self.blank_line_pending
            || self.writer.is_after_blank_line()
        {
            return Ok(());
        }
        if !self.writer.is_at_start_of_new_line() {
            let eol = self.eol();
            self.write_unescaped(&eol)?;
        }
        self.blank_line_pending = true;
        Ok(())
    }

    fn write_pending_blank_line(&mut self) -> Result<(), SinkError> {
        if !std::mem::take(&mut self.blank_line_pending) {
            return Ok(());
        }
        let line = format!("{}{}", self.container_prefixes().trim_end(), self.eol());
        self.writer.write(&line)?;
        Ok(())
    }

    fn position(&self) -> LinePosition {
        match self.buffers.last() {
            Some(buffer) => LinePosition {
                at_line_start: false,
                after_digit: buffer.ends_with(|c: char| c.is_ascii_digit()),
                in_heading: false,
            },
            None => LinePosition {
                at_line_start: self.writer.is_at_start_of_new_line(),
                after_digit: self.writer.is_after_digit(),
                in_heading: false,
            },
        }
    }

    /// Block quotes and code blocks are set apart from earlier content of a list item. As the
    /// first child of the item they go on the next line instead.
    fn needs_blank_line(&self, context: ElementContext) -> bool {
        context.requires_surrounding_blank_lines()
            || (self.current() == ElementContext::ListItem
                && !self.after_marker
                && matches!(context, ElementContext::Blockquote | ElementContext::CodeBlock))
    }

    fn start_context(&mut self, context: ElementContext) -> Result<(), SinkError> {
        if context.is_block() {
            // `- > quote`, `> > quote` and `> ```` open on the marker line
            let on_marker_line = self.after_marker
                && (context == ElementContext::Blockquote
                    || self.current() == ElementContext::Blockquote);
            if !on_marker_line {
                if self.needs_blank_line(context) {
                    self.ensure_blank_line()?;
                } else {
                    self.ensure_beginning_of_line()?;
                }
                self.write_prefixes()?;
            }
        }
        if context.requires_buffering() {
            self.buffers.push(String::new());
        }
        tracing::trace!(context = context.name(), depth = self.contexts.len(), "enter context");
        self.contexts.push(context);
        Ok(())
    }

    /// Leaves `expected` and hands back its captured buffer, if it buffers.
    fn end_context(&mut self, expected: ElementContext) -> Result<Option<String>, SinkError> {
        let buffer = self.pop_context(expected)?;
        self.leave_block(expected)?;
        Ok(buffer)
    }

    fn pop_context(&mut self, expected: ElementContext) -> Result<Option<String>, SinkError> {
        match self.contexts.pop() {
            Some(found) if found == expected => {}
            found => {
                return Err(SinkError::ContextMismatch {
                    expected: expected.name().to_string(),
                    found: found.map_or("nothing", ElementContext::name).to_string(),
                });
            }
        }
        tracing::trace!(context = expected.name(), depth = self.contexts.len(), "leave context");
        Ok(if expected.requires_buffering() {
            self.buffers.pop()
        } else {
            None
        })
    }

    fn leave_block(&mut self, context: ElementContext) -> Result<(), SinkError> {
        if context.is_block() {
            if self.needs_blank_line(context) {
                self.ensure_blank_line()?;
            } else {
                self.ensure_beginning_of_line()?;
            }
        }
        Ok(())
    }

    fn head(&mut self) -> Result<(), SinkError> {
        self.reset();
        self.contexts.clear();
        self.start_context(ElementContext::Head)
    }

    fn head_(&mut self) -> Result<(), SinkError> {
        self.end_context(ElementContext::Head)?;
        if self.metadata.is_empty() {
            return Ok(());
        }
        let metadata = std::mem::take(&mut self.metadata);
        let eol = self.eol();
        let mut block = format!("{METADATA_DELIMITER}{eol}");
        if let Some(title) = &metadata.title {
            block.push_str(&format!("title: {title}{eol}"));
        }
        if !metadata.authors.is_empty() {
            block.push_str(&format!("author:{eol}"));
            for author in &metadata.authors {
                block.push_str(&format!("  - {author}{eol}"));
            }
        }
        if let Some(date) = &metadata.date {
            block.push_str(&format!("date: {date}{eol}"));
        }
        block.push_str(METADATA_DELIMITER);
        block.push_str(&eol);
        self.write_unescaped(&block)?;
        self.ensure_blank_line()
    }

    /// Takes what was written into the head since the last metadata field closed.
    fn take_head_field(&mut self) -> Option<String> {
        if self.current() != ElementContext::Head {
            return None;
        }
        let value = std::mem::take(self.buffers.last_mut()?);
        let value = value.trim().to_string();
        (!value.is_empty()).then_some(value)
    }

    fn section_title(&mut self, level: SectionLevel) -> Result<(), SinkError> {
        self.start_context(ElementContext::Heading)?;
        let marker = format!("{} ", "#".repeat(level.get()));
        self.write_unescaped(&marker)
    }

    fn section_title_(&mut self) -> Result<(), SinkError> {
        self.end_context(ElementContext::Heading)?;
        self.ensure_blank_line()
    }

    fn paragraph(&mut self) -> Result<(), SinkError> {
        if !self.current().is_container() || self.after_marker {
            return Ok(());
        }
        self.ensure_blank_line()?;
        self.write_prefixes()
    }

    fn paragraph_(&mut self) -> Result<(), SinkError> {
        if self.current().is_container() {
            self.ensure_blank_line()?;
        }
        Ok(())
    }

    fn verbatim(&mut self, attributes: &Attributes) -> Result<(), SinkError> {
        self.code_language = attributes.get(LANGUAGE).unwrap_or_default().to_string();
        self.start_context(ElementContext::CodeBlock)
    }

    /// Places the captured code between fences that no line of the code can close.
    fn verbatim_(&mut self) -> Result<(), SinkError> {
        let code = self.pop_context(ElementContext::CodeBlock)?.unwrap_or_default();
        let eol = self.eol();
        let code = code.strip_suffix(eol.as_str()).unwrap_or(&code);
        let lines: Vec<&str> = if code.is_empty() {
            Vec::new()
        } else {
            code.split(eol.as_str()).collect()
        };
        let fence = code_fence(&lines.join("\n"));
        let prefixes = self.container_prefixes();

        let mut block = format!("{fence}{}", self.code_language);
        for line in lines {
            block.push_str(&eol);
            if line.is_empty() {
                block.push_str(prefixes.trim_end());
            } else {
                block.push_str(&prefixes);
                block.push_str(line);
            }
        }
        block.push_str(&format!("{eol}{prefixes}{fence}"));
        self.write_unescaped(&block)?;
        self.code_language.clear();

        self.leave_block(ElementContext::CodeBlock)?;
        self.ensure_blank_line()
    }

    fn horizontal_rule(&mut self) -> Result<(), SinkError> {
        self.ensure_blank_line()?;
        self.write_prefixes()?;
        self.write_unescaped(HORIZONTAL_RULE)?;
        self.ensure_blank_line()
    }

    fn list(&mut self) -> Result<(), SinkError> {
        if self.after_marker {
            return Ok(());
        }
        self.ensure_blank_line()
    }

    fn numbered_list(&mut self, numbering: Numbering) -> Result<(), SinkError> {
        if numbering != Numbering::Decimal {
            tracing::warn!(
                ?numbering,
                "Markdown only supports decimal numbering, falling back to decimal"
            );
        }
        self.list_counters.push(0);
        self.list()
    }

    fn numbered_list_(&mut self) -> Result<(), SinkError> {
        self.list_counters.pop();
        self.ensure_blank_line()
    }

    fn list_item(&mut self) -> Result<(), SinkError> {
        self.start_item(UNORDERED_ITEM)
    }

    fn numbered_list_item(&mut self) -> Result<(), SinkError> {
        let number = match self.list_counters.last_mut() {
            Some(counter) => {
                *counter += 1;
                *counter
            }
            None => 1,
        };
        self.start_item(&format!("{number}. "))
    }

    /// Item content is indented by the configured width, or by the marker width if wider.
    fn start_item(&mut self, marker: &str) -> Result<(), SinkError> {
        self.start_context(ElementContext::ListItem)?;
        let width = self.rules.list_indent.chars().count().max(marker.len());
        self.item_indents.push(" ".repeat(width));
        self.write_marker(marker)
    }

    fn list_item_(&mut self) -> Result<(), SinkError> {
        self.pop_context(ElementContext::ListItem)?;
        self.item_indents.pop();
        self.leave_block(ElementContext::ListItem)
    }

    fn definition_list(&mut self) -> Result<(), SinkError> {
        tracing::warn!("definition lists are not supported in Markdown, rendering HTML instead");
        self.start_context(ElementContext::HtmlBlock)?;
        self.write_unescaped("<dl>")?;
        self.write_line_break()
    }

    fn definition_list_(&mut self) -> Result<(), SinkError> {
        self.write_unescaped("</dl>")?;
        self.end_context(ElementContext::HtmlBlock)?;
        Ok(())
    }

    fn table_cell(&mut self, attributes: &Attributes, header: bool) -> Result<(), SinkError> {
        if let Some(justification) = attributes.get(ALIGN).and_then(Justification::from_align) {
            let column = self.table.cell_count;
            let declared = &mut self.table.justification;
            if declared.len() <= column {
                declared.resize(column + 1, Justification::Default);
            }
            declared[column] = justification;
        }
        if header {
            self.table.header_row = true;
        }
        self.start_context(ElementContext::TableCell)
    }

    fn table_cell_(&mut self, expected: ElementContext) -> Result<(), SinkError> {
        let content = self.end_context(expected)?.unwrap_or_default();
        self.write_unescaped(&content)?;
        self.write_unescaped("|")?;
        self.table.cell_count += 1;
        Ok(())
    }

    fn table_row_(&mut self) -> Result<(), SinkError> {
        let row = self.end_context(ElementContext::TableRow)?.unwrap_or_default();
        self.ensure_beginning_of_line()?;
        let prefixes = self.container_prefixes();
        let eol = self.eol();

        if self.table.first_row && !self.table.header_row {
            // GFM tables need a header row
            let header = "   |".repeat(self.table.cell_count);
            self.write_unescaped(&format!("{prefixes}|{header}{eol}"))?;
            self.write_delimiter_row(&prefixes)?;
            self.table.first_row = false;
        }

        self.write_unescaped(&format!("{prefixes}|{row}{eol}"))?;

        if self.table.first_row {
            self.write_delimiter_row(&prefixes)?;
            self.table.first_row = false;
        }
        self.table.cell_count = 0;
        Ok(())
    }

    fn write_delimiter_row(&mut self, prefixes: &str) -> Result<(), SinkError> {
        let mut row = format!("{prefixes}|");
        let mut justification = Justification::Default;
        for column in 0..self.table.cell_count {
            // columns without a declaration inherit from the previous one
            if let Some(declared) = self.table.justification.get(column) {
                justification = *declared;
            }
            row.push_str(match justification {
                Justification::Default => "---",
                Justification::Left => ":---",
                Justification::Right => "---:",
                Justification::Center => ":---:",
            });
            row.push('|');
        }
        row.push_str(&self.eol());
        self.write_unescaped(&row)
    }

    fn figure_graphics(&mut self, src: &str, attributes: &Attributes) -> Result<(), SinkError> {
        if self.current() == ElementContext::Figure {
            self.figure_src = Some(src.to_string());
            return Ok(());
        }
        let alt = attributes.get(ALT).unwrap_or_default();
        let alt = escape_markdown(alt, LinePosition::default());
        self.write_image(&alt, src)
    }

    fn figure_(&mut self) -> Result<(), SinkError> {
        let caption = self.end_context(ElementContext::Figure)?.unwrap_or_default();
        let src = self.figure_src.take().unwrap_or_default();
        self.write_image(&caption, &src)
    }

    fn write_image(&mut self, alt: &str, src: &str) -> Result<(), SinkError> {
        let image = format!("![{alt}]({})", escape_link_destination(src));
        self.write_unescaped(&image)
    }

    fn link(&mut self, target: &str) -> Result<(), SinkError> {
        match self.current() {
            ElementContext::CodeBlock => {
                tracing::warn!(link = %target, "links inside code blocks are not supported, dropping");
                self.links.push(LinkState::Dropped);
            }
            ElementContext::CodeSpan => {
                // wrap the whole code span: [`label`](target)
                let close = EndMarkup::Literal(format!("]({})", escape_link_destination(target)));
                let entry = self.inline_stack.iter_mut().rev().find(|entry| {
                    entry
                        .iter()
                        .any(|markup| matches!(markup, EndMarkup::CodeSpan { .. }))
                });
                if let Some(entry) = entry {
                    for markup in entry.iter_mut() {
                        if let EndMarkup::CodeSpan { links } = markup {
                            *links += 1;
                        }
                    }
                    entry.push(close);
                }
                self.links.push(LinkState::AroundCodeSpan);
            }
            _ => {
                self.write_unescaped("[")?;
                self.links.push(LinkState::Direct(target.to_string()));
            }
        }
        Ok(())
    }

    fn link_(&mut self) -> Result<(), SinkError> {
        match self.links.pop() {
            Some(LinkState::Direct(target)) => {
                let close = format!("]({})", escape_link_destination(&target));
                self.write_unescaped(&close)
            }
            Some(_) => Ok(()),
            None => Err(SinkError::ContextMismatch {
                expected: "link".to_string(),
                found: "nothing".to_string(),
            }),
        }
    }

    fn anchor(&mut self, name: &str) -> Result<(), SinkError> {
        if matches!(self.current(), ElementContext::CodeBlock | ElementContext::CodeSpan) {
            tracing::debug!(anchor = %name, "anchor inside code ignored");
            return Ok(());
        }
        let id = if is_valid_id(name) {
            name.to_string()
        } else {
            match encode_id(name) {
                Some(id) => id,
                None => {
                    tracing::warn!("ignoring anchor without a name");
                    return Ok(());
                }
            }
        };
        self.write_unescaped(&format!("<a id=\"{id}\"></a>"))
    }

    fn inline(&mut self, attributes: &Attributes) -> Result<(), SinkError> {
        let mut end_markups = Vec::new();
        let current = self.current();

        if !matches!(current, ElementContext::CodeBlock | ElementContext::CodeSpan) {
            let semantics = |value: &str| {
                attributes.contains(SEMANTICS, value)
                    || attributes.contains(STYLE, value)
            };
            // code excludes other styles
            if semantics("code") || semantics("monospaced") {
                self.start_context(ElementContext::CodeSpan)?;
                end_markups.push(EndMarkup::CodeSpan { links: 0 });
            } else {
                let styles = [
                    (semantics("em") || semantics("italic"), "_"),
                    (semantics("strong") || semantics("bold"), "**"),
                    (
                        semantics("delete") || semantics("strikethrough") || semantics("line-through"),
                        "~~",
                    ),
                ];
                for (enabled, markup) in styles {
                    if enabled {
                        self.write_unescaped(markup)?;
                        end_markups.insert(0, EndMarkup::Literal(markup.to_string()));
                    }
                }
            }
        }
        self.inline_stack.push(end_markups);
        Ok(())
    }

    fn inline_(&mut self) -> Result<(), SinkError> {
        let end_markups = self.inline_stack.pop().ok_or_else(|| SinkError::ContextMismatch {
            expected: "inline".to_string(),
            found: "nothing".to_string(),
        })?;
        for end_markup in end_markups {
            match end_markup {
                EndMarkup::CodeSpan { links } => {
                    let content = self.end_context(ElementContext::CodeSpan)?.unwrap_or_default();
                    let mut span = "[".repeat(links);
                    span.push_str(&code_span(&content));
                    if self.contexts.contains(&ElementContext::TableCell) {
                        span = span.replace('|', "\\|");
                    }
                    self.write_unescaped(&span)?;
                }
                EndMarkup::Literal(markup) => self.write_unescaped(&markup)?,
            }
        }
        Ok(())
    }

    fn text(&mut self, value: &str, attributes: &Attributes) -> Result<(), SinkError> {
        let styled = attributes.get(SEMANTICS).is_some()
            || attributes.get(STYLE).is_some();
        if styled {
            self.inline(attributes)?;
        }

        let context = self.current();
        if context == ElementContext::TableCaption {
            tracing::warn!("table captions are not supported in Markdown, ignoring");
        } else if context == ElementContext::CodeBlock {
            // prefixed line by line when the block closes
            let unified = self.unify_line_endings(value);
            self.write_unescaped(&unified)?;
        } else {
            let unified = self.unify_line_endings(value);
            let escaped = context.escape(&unified, self.position());
            let prefixed = self.prefix_inner_lines(&escaped);
            self.write_unescaped(&prefixed)?;
        }

        if styled {
            self.inline_()?;
        }
        Ok(())
    }

    fn unify_line_endings(&self, text: &str) -> String {
        let unified = text.replace("\r\n", "\n").replace('\r', "\n");
        if self.rules.line_ending == "\n" {
            unified
        } else {
            unified.replace('\n', &self.rules.line_ending)
        }
    }

    /// Re-inserts the container prefixes after every line break of `text`.
    fn prefix_inner_lines(&self, text: &str) -> String {
        let prefixes = self.container_prefixes();
        if prefixes.is_empty() {
            return text.to_string();
        }
        let eol = self.rules.line_ending.as_str();
        text.split(eol).collect::<Vec<_>>().join(&format!("{eol}{prefixes}"))
    }

    fn line_break(&mut self) -> Result<(), SinkError> {
        if self.current() == ElementContext::CodeBlock {
            let eol = self.eol();
            return self.write_unescaped(&eol);
        }
        self.write_unescaped("\\")?;
        self.write_line_break()
    }

    fn comment(&mut self, comment: &str) -> Result<(), SinkError> {
        let (encoded, modified) = encode_html_comment(comment);
        if modified {
            tracing::warn!(original = comment, encoded = %encoded, "modified invalid comment");
        }
        self.write_unescaped(&encoded)
    }
}

impl<W: Write> Sink for MarkdownSink<W> {
    fn emit(&mut self, event: &Event) -> Result<(), SinkError> {
        match event {
            Event::StartHead(_) => self.head(),
            Event::EndHead => self.head_(),
            Event::StartTitle(_) | Event::StartAuthor(_) | Event::StartDate(_) => {
                // drop anything written into the head outside a field
                self.take_head_field();
                Ok(())
            }
            Event::EndTitle => {
                if let Some(title) = self.take_head_field() {
                    self.metadata.title = Some(title);
                }
                Ok(())
            }
            Event::EndAuthor => {
                if let Some(author) = self.take_head_field() {
                    self.metadata.authors.push(author);
                }
                Ok(())
            }
            Event::EndDate => {
                if let Some(date) = self.take_head_field() {
                    self.metadata.date = Some(date);
                }
                Ok(())
            }
            Event::StartBody(_) => {
                self.contexts.push(ElementContext::Body);
                Ok(())
            }
            Event::EndBody => self.end_context(ElementContext::Body).map(drop),
            Event::StartSection { .. } | Event::EndSection(_) => Ok(()),
            Event::StartSectionTitle { level, .. } => self.section_title(*level),
            Event::EndSectionTitle(_) => self.section_title_(),
            Event::StartParagraph(_) => self.paragraph(),
            Event::EndParagraph => self.paragraph_(),
            Event::StartList(_) => self.list(),
            Event::EndList => self.ensure_blank_line(),
            Event::StartListItem(_) => self.list_item(),
            Event::EndListItem | Event::EndNumberedListItem => self.list_item_(),
            Event::StartNumberedList { numbering, .. } => self.numbered_list(*numbering),
            Event::EndNumberedList => self.numbered_list_(),
            Event::StartNumberedListItem(_) => self.numbered_list_item(),
            Event::StartDefinitionList(_) => self.definition_list(),
            Event::EndDefinitionList => self.definition_list_(),
            Event::StartDefinitionListItem(_) | Event::EndDefinitionListItem => Ok(()),
            Event::StartDefinedTerm(_) => self.write_unescaped("<dt>"),
            Event::EndDefinedTerm => {
                self.write_unescaped("</dt>")?;
                self.write_line_break()
            }
            Event::StartDefinition(_) => self.write_unescaped("<dd>"),
            Event::EndDefinition => {
                self.write_unescaped("</dd>")?;
                self.write_line_break()
            }
            Event::StartTable(_) | Event::EndTable => self.ensure_blank_line(),
            Event::StartTableRows { justification, .. } => {
                self.table.justification = justification.clone();
                self.table.first_row = true;
                Ok(())
            }
            Event::EndTableRows => {
                self.table.justification.clear();
                Ok(())
            }
            Event::StartTableRow(_) => {
                self.table.cell_count = 0;
                self.table.header_row = false;
                self.start_context(ElementContext::TableRow)
            }
            Event::EndTableRow => self.table_row_(),
            Event::StartTableCell(attributes) => self.table_cell(attributes, false),
            Event::StartTableHeaderCell(attributes) => self.table_cell(attributes, true),
            Event::EndTableCell | Event::EndTableHeaderCell => {
                self.table_cell_(ElementContext::TableCell)
            }
            Event::StartTableCaption(_) => self.start_context(ElementContext::TableCaption),
            Event::EndTableCaption => self.end_context(ElementContext::TableCaption).map(drop),
            Event::StartFigure(_) => {
                self.figure_src = None;
                self.start_context(ElementContext::Figure)
            }
            Event::EndFigure => self.figure_(),
            Event::FigureGraphics { src, attributes } => self.figure_graphics(src, attributes),
            Event::StartFigureCaption(_) | Event::EndFigureCaption => Ok(()),
            Event::StartBlockquote(_) => {
                self.start_context(ElementContext::Blockquote)?;
                self.write_marker(super::context::BLOCKQUOTE_PREFIX)
            }
            Event::EndBlockquote => self.end_context(ElementContext::Blockquote).map(drop),
            Event::StartVerbatim(attributes) => self.verbatim(attributes),
            Event::EndVerbatim => self.verbatim_(),
            Event::StartBold => self.inline(&Attributes::semantics("strong")),
            Event::StartItalic => self.inline(&Attributes::semantics("em")),
            Event::StartMonospaced => self.inline(&Attributes::semantics("code")),
            Event::StartInline(attributes) => self.inline(attributes),
            Event::EndBold | Event::EndItalic | Event::EndMonospaced | Event::EndInline => {
                self.inline_()
            }
            Event::StartLink { target, .. } => self.link(target),
            Event::EndLink => self.link_(),
            Event::StartAnchor { name, .. } => self.anchor(name),
            Event::EndAnchor => Ok(()),
            Event::Text { value, attributes } => self.text(value, attributes),
            Event::RawText(text) => self.write_unescaped(text),
            Event::Comment(comment) => self.comment(comment),
            Event::LineBreak => self.line_break(),
            Event::NonBreakingSpace => self.write_unescaped(NON_BREAKING_SPACE),
            Event::HorizontalRule => self.horizontal_rule(),
            Event::PageBreak => {
                tracing::warn!("page breaks are not supported in Markdown, ignoring");
                Ok(())
            }
            Event::Unknown { name, .. } => {
                tracing::warn!(event = %name, "unknown event, ignoring");
                Ok(())
            }
        }
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        if self.buffers.is_empty() {
            self.write_pending_blank_line()?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.flush()?;
        self.reset();
        Ok(())
    }
}

/// Serialize an event stream to Markdown using the default rules
pub fn serialize_to_markdown(events: &[Event]) -> Result<String, FormatError> {
    serialize_to_markdown_with_rules(events, &MarkdownRules::default())
}

/// Serialize an event stream to Markdown
pub fn serialize_to_markdown_with_rules(
    events: &[Event],
    rules: &MarkdownRules,
) -> Result<String, FormatError> {
    let mut sink = MarkdownSink::with_rules(Vec::new(), rules.clone());
    drive(&mut sink, events)?;
    sink.close()?;
    String::from_utf8(sink.into_inner())
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}
