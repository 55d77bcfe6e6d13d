//! Builds nested lists from indentation-tagged lines.
//!
//! # The Algorithm
//!
//! Wiki-style markup writes lists as flat lines whose nesting is given by indentation:
//!
//! ```text
//! * one
//!   * one.a
//!     1. deep
//! * two
//! ```
//!
//! Each line becomes a node. A cursor points at the most recently added node; its depth in the
//! tree is the line's level plus one (the root sits at depth zero).
//!
//! 1. A line at the cursor's level or shallower moves the cursor up until it reaches the
//!    parent depth for that level, then attaches a sibling there.
//! 2. A line exactly one level deeper attaches as the cursor's first child.
//! 3. A line more than one level deeper fabricates empty intermediate items until the parent
//!    depth is reached, so a jump from level 0 to level 2 yields an empty level 1 list.
//!
//! Every node records the list style of its children from the first child it receives.
//! Traversing the finished tree depth first yields the `list`/`listItem` or
//! `numberedList`/`numberedListItem` events of the nested list.

use crate::sink::{Attributes, Event, Numbering};
use thiserror::Error;

/// List marker family of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    Unordered,
    Ordered(Numbering),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeListError {
    #[error("list line at level {level} is above the root level {base}")]
    AboveRoot { level: usize, base: usize },
}

/// One list item and the list nested under it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeListItem {
    pub text: String,
    /// Style of `children`; `None` while there are none.
    pub style: Option<ListStyle>,
    pub children: Vec<TreeListItem>,
}

#[derive(Debug)]
struct Node {
    parent: Option<usize>,
    depth: usize,
    text: String,
    style: Option<ListStyle>,
    children: Vec<usize>,
}

/// Incremental builder for one nested list
#[derive(Debug)]
pub struct TreeListBuilder {
    nodes: Vec<Node>,
    cursor: usize,
    base: usize,
}

impl Default for TreeListBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeListBuilder {
    pub fn new() -> Self {
        Self::with_base_level(0)
    }

    /// A builder whose top-level items sit at `base`; shallower lines are rejected.
    pub fn with_base_level(base: usize) -> Self {
        let root = Node {
            parent: None,
            depth: 0,
            text: String::new(),
            style: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            cursor: 0,
            base,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Adds one line.
    pub fn feed(
        &mut self,
        level: usize,
        style: ListStyle,
        text: impl Into<String>,
    ) -> Result<(), TreeListError> {
        let relative = level.checked_sub(self.base).ok_or(TreeListError::AboveRoot {
            level,
            base: self.base,
        })?;
        let parent_depth = relative;

        // Climb to the parent depth
        while self.nodes[self.cursor].depth > parent_depth {
            match self.nodes[self.cursor].parent {
                Some(parent) => self.cursor = parent,
                None => break,
            }
        }

        // Fabricate missing levels
        while self.nodes[self.cursor].depth < parent_depth {
            tracing::debug!(
                depth = self.nodes[self.cursor].depth + 1,
                "fabricating intermediate list level"
            );
            self.cursor = self.attach(self.cursor, style, String::new());
        }

        self.cursor = self.attach(self.cursor, style, text.into());
        Ok(())
    }

    fn attach(&mut self, parent: usize, style: ListStyle, text: String) -> usize {
        let index = self.nodes.len();
        let depth = self.nodes[parent].depth + 1;
        self.nodes.push(Node {
            parent: Some(parent),
            depth,
            text,
            style: None,
            children: Vec::new(),
        });
        let parent_node = &mut self.nodes[parent];
        match parent_node.style {
            None => parent_node.style = Some(style),
            Some(existing) if existing != style => {
                tracing::debug!(?existing, ?style, "list style change ignored inside one list");
            }
            Some(_) => {}
        }
        parent_node.children.push(index);
        index
    }

    /// Finishes the tree; the returned root carries no text.
    pub fn build(self) -> TreeListItem {
        self.materialize(0)
    }

    fn materialize(&self, index: usize) -> TreeListItem {
        let node = &self.nodes[index];
        TreeListItem {
            text: node.text.clone(),
            style: node.style,
            children: node
                .children
                .iter()
                .map(|child| self.materialize(*child))
                .collect(),
        }
    }
}

impl TreeListItem {
    /// Events of the list nested under this item (empty without children).
    pub fn to_events(&self) -> Vec<Event> {
        let mut events = Vec::new();
        self.push_list_events(&mut events);
        events
    }

    fn push_list_events(&self, events: &mut Vec<Event>) {
        let Some(style) = self.style else {
            return;
        };
        events.push(match style {
            ListStyle::Unordered => Event::StartList(Attributes::new()),
            ListStyle::Ordered(numbering) => Event::start_numbered_list(numbering),
        });
        for child in &self.children {
            events.push(match style {
                ListStyle::Unordered => Event::StartListItem(Attributes::new()),
                ListStyle::Ordered(_) => Event::StartNumberedListItem(Attributes::new()),
            });
            if !child.text.is_empty() {
                events.push(Event::text(child.text.clone()));
            }
            child.push_list_events(events);
            events.push(match style {
                ListStyle::Unordered => Event::EndListItem,
                ListStyle::Ordered(_) => Event::EndNumberedListItem,
            });
        }
        events.push(match style {
            ListStyle::Unordered => Event::EndList,
            ListStyle::Ordered(_) => Event::EndNumberedList,
        });
    }
}

/// A recognized list line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine {
    pub level: usize,
    pub style: ListStyle,
    pub text: String,
}

/// Recognizes a list line such as `"  * item"`, `"1. item"`, `"b. item"` or `"IV. item"`.
///
/// The level is the leading indentation divided by `indent_width` (a tab counts as one full
/// unit). Markers are `-`, `*`, `+`, or a number, a single letter or a roman numeral followed by
/// `.`; the marker must be followed by whitespace or the end of the line. `i`, `v` and `x` read
/// as roman numerals, other single letters as alphabetic.
pub fn recognize_list_line(line: &str, indent_width: usize) -> Option<ListLine> {
    let indent_width = indent_width.max(1);
    let mut indent = 0;
    let mut rest = line;
    for ch in line.chars() {
        match ch {
            ' ' => indent += 1,
            '\t' => indent += indent_width,
            _ => break,
        }
        rest = &rest[ch.len_utf8()..];
    }

    let (style, after_marker) = split_marker(rest)?;
    let text = match after_marker.chars().next() {
        None => "",
        Some(c) if c.is_whitespace() => after_marker.trim(),
        Some(_) => return None,
    };

    Some(ListLine {
        level: indent / indent_width,
        style,
        text: text.to_string(),
    })
}

fn split_marker(rest: &str) -> Option<(ListStyle, &str)> {
    if let Some(after) = rest
        .strip_prefix('-')
        .or_else(|| rest.strip_prefix('*'))
        .or_else(|| rest.strip_prefix('+'))
    {
        return Some((ListStyle::Unordered, after));
    }

    let (label, after) = rest.split_once('.')?;
    if label.is_empty() {
        return None;
    }
    let numbering = if label.chars().all(|c| c.is_ascii_digit()) {
        Numbering::Decimal
    } else if is_roman(label, false) && (label.len() > 1 || matches!(label, "i" | "v" | "x")) {
        Numbering::LowerRoman
    } else if is_roman(label, true) && (label.len() > 1 || matches!(label, "I" | "V" | "X")) {
        Numbering::UpperRoman
    } else if label.len() == 1 && label.chars().all(|c| c.is_ascii_lowercase()) {
        Numbering::LowerAlpha
    } else if label.len() == 1 && label.chars().all(|c| c.is_ascii_uppercase()) {
        Numbering::UpperAlpha
    } else {
        return None;
    };
    Some((ListStyle::Ordered(numbering), after))
}

fn is_roman(label: &str, upper: bool) -> bool {
    let digits = if upper { "IVXLCDM" } else { "ivxlcdm" };
    label.chars().all(|c| digits.contains(c))
}

/// Builds the nested list events for a block of list lines.
///
/// Lines that are not list lines are appended to the previous item's text.
pub fn list_events_from_lines<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    indent_width: usize,
) -> Result<Vec<Event>, TreeListError> {
    let mut pending: Option<ListLine> = None;
    let mut builder: Option<TreeListBuilder> = None;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match recognize_list_line(line, indent_width) {
            Some(next) => {
                if let Some(done) = pending.take() {
                    let builder =
                        builder.get_or_insert_with(|| TreeListBuilder::with_base_level(done.level));
                    builder.feed(done.level, done.style, done.text)?;
                }
                pending = Some(next);
            }
            None => {
                if let Some(item) = pending.as_mut() {
                    if !item.text.is_empty() {
                        item.text.push(' ');
                    }
                    item.text.push_str(line.trim());
                }
            }
        }
    }
    if let Some(done) = pending {
        let builder = builder.get_or_insert_with(|| TreeListBuilder::with_base_level(done.level));
        builder.feed(done.level, done.style, done.text)?;
    }

    Ok(builder
        .map(|builder| builder.build().to_events())
        .unwrap_or_default())
}
