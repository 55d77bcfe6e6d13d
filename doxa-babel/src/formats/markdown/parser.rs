//! Markdown parsing (Markdown → events)
//!
//! Converts CommonMark Markdown (with GFM tables, strike-through and `---` front matter) to an
//! event stream. Pipeline: Markdown string → Comrak AST → events.
//!
//! Markdown headings are flat while section events nest, so headings are turned into sections
//! the same way a flat outline is nested: a heading closes every open section at the same or a
//! deeper level before opening its own. Sections never escape the container (list item, block
//! quote) they were opened in.

use crate::error::FormatError;
use crate::sink::attributes::{Attributes, ALT, LANGUAGE};
use crate::sink::{Event, Justification, Numbering, SectionLevel};
use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::{parse_document, Arena, ComrakOptions};

/// Parse a Markdown string to an event stream
///
/// The result is always wrapped in `head`/`body`; front matter `title`, `author` and `date`
/// become head events.
pub fn parse_from_markdown(source: &str) -> Result<Vec<Event>, FormatError> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);

    let mut builder = EventBuilder::default();
    builder.document(root)?;
    Ok(builder.events)
}

pub(crate) fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.front_matter_delimiter = Some("---".to_string());
    options
}

#[derive(Default)]
struct EventBuilder {
    events: Vec<Event>,
    /// Open sections, outermost first
    sections: Vec<SectionLevel>,
    /// Open `<a id>` anchors
    anchors: usize,
    /// Anchors opened outside the inline run being read
    anchor_floor: usize,
}

impl EventBuilder {
    fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    fn document<'a>(&mut self, root: &'a AstNode<'a>) -> Result<(), FormatError> {
        let mut children = root.children().peekable();

        self.push(Event::StartHead(Attributes::new()));
        if let Some(first) = children.peek() {
            if let NodeValue::FrontMatter(front_matter) = &first.data.borrow().value {
                self.front_matter(front_matter);
            }
        }
        self.push(Event::EndHead);

        self.push(Event::StartBody(Attributes::new()));
        let floor = self.sections.len();
        for child in children {
            self.block(child)?;
        }
        self.close_sections(floor);
        self.push(Event::EndBody);
        Ok(())
    }

    fn front_matter(&mut self, raw: &str) {
        let metadata = parse_front_matter(raw);
        let fields = metadata
            .title
            .into_iter()
            .map(|title| (Event::StartTitle(Attributes::new()), title, Event::EndTitle))
            .chain(
                metadata
                    .authors
                    .into_iter()
                    .map(|author| (Event::StartAuthor(Attributes::new()), author, Event::EndAuthor)),
            )
            .chain(
                metadata
                    .date
                    .into_iter()
                    .map(|date| (Event::StartDate(Attributes::new()), date, Event::EndDate)),
            );
        for (open, value, close) in fields {
            self.push(open);
            self.push(Event::text(value));
            self.push(close);
        }
    }

    /// Closes sections until only `floor` remain open.
    fn close_sections(&mut self, floor: usize) {
        while self.sections.len() > floor {
            if let Some(level) = self.sections.pop() {
                self.push(Event::EndSection(level));
            }
        }
    }

    /// Closes open sections at `level` or deeper, never below `floor`.
    fn close_sections_at_or_deeper(&mut self, level: SectionLevel, floor: usize) {
        while self.sections.len() > floor {
            match self.sections.last() {
                Some(open) if *open >= level => {
                    let open = *open;
                    self.sections.pop();
                    self.push(Event::EndSection(open));
                }
                _ => break,
            }
        }
    }

    /// Children of a container; sections opened inside are closed at its end.
    fn container<'a>(&mut self, node: &'a AstNode<'a>) -> Result<(), FormatError> {
        let floor = self.sections.len();
        for child in node.children() {
            self.block_in(child, floor)?;
        }
        self.close_sections(floor);
        Ok(())
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>) -> Result<(), FormatError> {
        self.block_in(node, 0)
    }

    fn block_in<'a>(&mut self, node: &'a AstNode<'a>, floor: usize) -> Result<(), FormatError> {
        let node_data = node.data.borrow();

        match &node_data.value {
            NodeValue::Heading(heading) => {
                let level = SectionLevel::new(heading.level as usize).ok_or_else(|| {
                    FormatError::ParseError(format!("invalid heading level {}", heading.level))
                })?;
                self.close_sections_at_or_deeper(level, floor);
                self.sections.push(level);
                self.push(Event::start_section(level));
                self.push(Event::start_section_title(level));
                self.inlines(node)?;
                self.push(Event::EndSectionTitle(level));
            }

            NodeValue::Paragraph => {
                if is_rule_literal(node) {
                    self.push(Event::HorizontalRule);
                } else {
                    self.push(Event::StartParagraph(Attributes::new()));
                    self.inlines(node)?;
                    self.push(Event::EndParagraph);
                }
            }

            NodeValue::List(list) => {
                let ordered = matches!(list.list_type, ListType::Ordered);
                self.push(if ordered {
                    Event::start_numbered_list(Numbering::Decimal)
                } else {
                    Event::StartList(Attributes::new())
                });
                for item in node.children() {
                    self.list_item(item, ordered)?;
                }
                self.push(if ordered {
                    Event::EndNumberedList
                } else {
                    Event::EndList
                });
            }

            NodeValue::CodeBlock(code_block) => {
                let mut attributes = Attributes::new();
                if let Some(language) = code_block.info.split_whitespace().next() {
                    attributes.set(LANGUAGE, language);
                }
                self.push(Event::StartVerbatim(attributes));
                let literal = code_block
                    .literal
                    .strip_suffix('\n')
                    .unwrap_or(&code_block.literal);
                if !literal.is_empty() {
                    self.push(Event::text(literal));
                }
                self.push(Event::EndVerbatim);
            }

            NodeValue::HtmlBlock(html) => match html_comment(&html.literal) {
                Some(comment) => self.push(Event::Comment(comment.to_string())),
                None => self.push(Event::RawText(html.literal.clone())),
            },

            NodeValue::ThematicBreak => self.push(Event::HorizontalRule),

            NodeValue::BlockQuote => {
                self.push(Event::StartBlockquote(Attributes::new()));
                self.container(node)?;
                self.push(Event::EndBlockquote);
            }

            NodeValue::Table(table) => {
                let justification = table
                    .alignments
                    .iter()
                    .map(|alignment| match alignment {
                        TableAlignment::Left => Justification::Left,
                        TableAlignment::Center => Justification::Center,
                        TableAlignment::Right => Justification::Right,
                        TableAlignment::None => Justification::Default,
                    })
                    .collect();
                self.push(Event::StartTable(Attributes::new()));
                self.push(Event::start_table_rows(justification));
                for row in node.children() {
                    self.table_row(row)?;
                }
                self.push(Event::EndTableRows);
                self.push(Event::EndTable);
            }

            NodeValue::FrontMatter(_) => {
                tracing::debug!("front matter after the first block ignored");
            }

            other => {
                tracing::debug!(node = ?other, "unsupported block skipped");
            }
        }

        Ok(())
    }

    fn list_item<'a>(&mut self, item: &'a AstNode<'a>, ordered: bool) -> Result<(), FormatError> {
        if !matches!(item.data.borrow().value, NodeValue::Item(_)) {
            return Ok(());
        }
        self.push(if ordered {
            Event::StartNumberedListItem(Attributes::new())
        } else {
            Event::StartListItem(Attributes::new())
        });
        self.container(item)?;
        self.push(if ordered {
            Event::EndNumberedListItem
        } else {
            Event::EndListItem
        });
        Ok(())
    }

    fn table_row<'a>(&mut self, row: &'a AstNode<'a>) -> Result<(), FormatError> {
        let header = match row.data.borrow().value {
            NodeValue::TableRow(header) => header,
            _ => return Ok(()),
        };
        self.push(Event::StartTableRow(Attributes::new()));
        for cell in row.children() {
            if header {
                self.push(Event::StartTableHeaderCell(Attributes::new()));
                self.inlines(cell)?;
                self.push(Event::EndTableHeaderCell);
            } else {
                self.push(Event::StartTableCell(Attributes::new()));
                self.inlines(cell)?;
                self.push(Event::EndTableCell);
            }
        }
        self.push(Event::EndTableRow);
        Ok(())
    }

    /// Inline children of `node`; anchors left open inside are closed at its end.
    fn inlines<'a>(&mut self, node: &'a AstNode<'a>) -> Result<(), FormatError> {
        let outer_floor = std::mem::replace(&mut self.anchor_floor, self.anchors);
        for child in node.children() {
            self.inline(child)?;
        }
        while self.anchors > self.anchor_floor {
            self.anchors -= 1;
            self.push(Event::EndAnchor);
        }
        self.anchor_floor = outer_floor;
        Ok(())
    }

    fn inline<'a>(&mut self, node: &'a AstNode<'a>) -> Result<(), FormatError> {
        let node_data = node.data.borrow();

        match &node_data.value {
            NodeValue::Text(text) => self.push(Event::text(text.clone())),

            NodeValue::SoftBreak => self.push(Event::text("\n")),

            NodeValue::LineBreak => self.push(Event::LineBreak),

            NodeValue::Code(code) => {
                self.push(Event::StartInline(Attributes::semantics("code")));
                self.push(Event::text(code.literal.clone()));
                self.push(Event::EndInline);
            }

            NodeValue::Emph => {
                self.push(Event::StartItalic);
                self.inlines(node)?;
                self.push(Event::EndItalic);
            }

            NodeValue::Strong => {
                self.push(Event::StartBold);
                self.inlines(node)?;
                self.push(Event::EndBold);
            }

            NodeValue::Strikethrough => {
                self.push(Event::StartInline(Attributes::semantics("delete")));
                self.inlines(node)?;
                self.push(Event::EndInline);
            }

            NodeValue::Link(link) => {
                self.push(Event::start_link(link.url.clone()));
                self.inlines(node)?;
                self.push(Event::EndLink);
            }

            NodeValue::Image(link) => {
                let alt = collect_text_from_children(node);
                let attributes = Attributes::new().with(ALT, alt);
                self.push(Event::figure_graphics(link.url.clone(), attributes));
            }

            NodeValue::HtmlInline(html) => {
                if let Some(comment) = html_comment(html) {
                    self.push(Event::Comment(comment.to_string()));
                } else if let Some(id) = anchor_id(html) {
                    self.anchors += 1;
                    self.push(Event::start_anchor(id));
                } else if html.trim() == "</a>" && self.anchors > self.anchor_floor {
                    self.anchors -= 1;
                    self.push(Event::EndAnchor);
                } else {
                    self.push(Event::RawText(html.clone()));
                }
            }

            _ => {
                // Unknown inline types contribute their children
                self.inlines(node)?;
            }
        }

        Ok(())
    }
}

/// Collect plain text content from a node (image alt text)
fn collect_text_content<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => output.push_str(text),
        NodeValue::Code(code) => output.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => output.push(' '),
        _ => {
            for child in node.children() {
                collect_text_content(child, output);
            }
        }
    }
}

fn collect_text_from_children<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for child in node.children() {
        collect_text_content(child, &mut text);
    }
    text
}

/// A paragraph holding only a run of `=` reads back the serializer's horizontal rule.
fn is_rule_literal<'a>(node: &'a AstNode<'a>) -> bool {
    let text = collect_text_from_children(node);
    let text = text.trim();
    text.len() >= 3 && text.chars().all(|c| c == '=')
}

fn html_comment(html: &str) -> Option<&str> {
    html.trim()
        .strip_prefix("<!--")
        .and_then(|rest| rest.strip_suffix("-->"))
}

fn anchor_id(html: &str) -> Option<String> {
    let tag = html.trim().strip_prefix("<a ")?.strip_suffix('>')?;
    let tag = tag.trim_end_matches('/').trim();
    ["id=\"", "name=\""].iter().find_map(|key| {
        let start = tag.find(key)? + key.len();
        let end = tag[start..].find('"')?;
        Some(tag[start..start + end].to_string())
    })
}

#[derive(Debug, Default, PartialEq)]
struct FrontMatter {
    title: Option<String>,
    authors: Vec<String>,
    date: Option<String>,
}

/// Reads `title`, `author` (scalar or list) and `date` from a `---` block.
fn parse_front_matter(raw: &str) -> FrontMatter {
    let mut metadata = FrontMatter::default();
    let mut in_authors = false;

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed == "---" {
            continue;
        }
        if let Some(item) = trimmed.strip_prefix("- ") {
            if in_authors {
                metadata.authors.push(unquote(item));
            }
            continue;
        }
        in_authors = false;
        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "title" if !value.is_empty() => metadata.title = Some(unquote(value)),
            "date" if !value.is_empty() => metadata.date = Some(unquote(value)),
            "author" | "authors" => {
                if value.is_empty() {
                    in_authors = true;
                } else {
                    metadata.authors.push(unquote(value));
                }
            }
            other => tracing::debug!(key = other, "front matter key ignored"),
        }
    }
    metadata
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    value.to_string()
}
