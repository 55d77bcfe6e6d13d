//! Event stream debug formats
//!
//! `events` renders a stream as an indented listing, one event per line, nested by the
//! opener/closer structure:
//!
//! ```text
//! body
//!   paragraph
//!     text "Hello"
//!   paragraph_
//! body_
//! ```
//!
//! `events-json` is the serde representation of the stream (an array of externally tagged
//! events) and is the only format that reproduces every event and attribute exactly.

use crate::error::FormatError;
use crate::format::Format;
use crate::sink::{Attributes, Event, EventKind};
use std::fmt::Write as _;

/// Indented listing of an event stream
#[derive(Default)]
pub struct EventsFormat;

/// JSON array of events
#[derive(Default)]
pub struct EventsJsonFormat;

impl Format for EventsFormat {
    fn name(&self) -> &str {
        "events"
    }

    fn description(&self) -> &str {
        "Indented event listing (debug)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["events"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, events: &[Event]) -> Result<String, FormatError> {
        Ok(to_listing(events))
    }
}

impl Format for EventsJsonFormat {
    fn name(&self) -> &str {
        "events-json"
    }

    fn description(&self) -> &str {
        "Event stream as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<Event>, FormatError> {
        serde_json::from_str(source)
            .map_err(|e| FormatError::ParseError(format!("Invalid event JSON: {e}")))
    }

    fn serialize(&self, events: &[Event]) -> Result<String, FormatError> {
        let mut json = serde_json::to_string_pretty(events)
            .map_err(|e| FormatError::SerializationError(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }
}

/// Renders events one per line, indenting the content of every element.
///
/// Unbalanced closers never underflow the indentation.
pub fn to_listing(events: &[Event]) -> String {
    let mut output = String::new();
    let mut depth = 0usize;

    for event in events {
        if let EventKind::Close(_) = event.kind() {
            depth = depth.saturating_sub(1);
        }
        let _ = writeln!(
            output,
            "{}{}{}",
            "  ".repeat(depth),
            event.name(),
            detail(event)
        );
        if let EventKind::Open(_) = event.kind() {
            depth += 1;
        }
    }
    output
}

fn detail(event: &Event) -> String {
    let mut detail = match event {
        Event::Text { value, .. } | Event::RawText(value) | Event::Comment(value) => {
            format!(" {value:?}")
        }
        Event::StartLink { target, .. } => format!(" -> {target}"),
        Event::StartAnchor { name, .. } => format!(" #{name}"),
        Event::FigureGraphics { src, .. } => format!(" {src}"),
        Event::StartNumberedList { numbering, .. } => format!(" ({numbering:?})"),
        Event::StartTableRows {
            justification,
            grid,
        } => {
            let columns: Vec<String> = justification.iter().map(|j| format!("{j:?}")).collect();
            format!(" [{}]{}", columns.join(", "), if *grid { " grid" } else { "" })
        }
        Event::Unknown { name, params, .. } => format!(" {name} {params:?}"),
        _ => String::new(),
    };
    if let Some(attributes) = attributes_of(event) {
        if !attributes.is_empty() {
            let pairs: Vec<String> = attributes
                .iter()
                .map(|(key, value)| format!("{key}={value:?}"))
                .collect();
            let _ = write!(detail, " {{{}}}", pairs.join(" "));
        }
    }
    detail
}

fn attributes_of(event: &Event) -> Option<&Attributes> {
    match event {
        Event::StartHead(a)
        | Event::StartTitle(a)
        | Event::StartAuthor(a)
        | Event::StartDate(a)
        | Event::StartBody(a)
        | Event::StartParagraph(a)
        | Event::StartList(a)
        | Event::StartListItem(a)
        | Event::StartNumberedListItem(a)
        | Event::StartDefinitionList(a)
        | Event::StartDefinitionListItem(a)
        | Event::StartDefinedTerm(a)
        | Event::StartDefinition(a)
        | Event::StartTable(a)
        | Event::StartTableRow(a)
        | Event::StartTableCell(a)
        | Event::StartTableHeaderCell(a)
        | Event::StartTableCaption(a)
        | Event::StartFigure(a)
        | Event::StartFigureCaption(a)
        | Event::StartBlockquote(a)
        | Event::StartVerbatim(a)
        | Event::StartInline(a) => Some(a),
        Event::StartSection { attributes, .. }
        | Event::StartSectionTitle { attributes, .. }
        | Event::StartNumberedList { attributes, .. }
        | Event::StartLink { attributes, .. }
        | Event::StartAnchor { attributes, .. }
        | Event::FigureGraphics { attributes, .. }
        | Event::Text { attributes, .. }
        | Event::Unknown { attributes, .. } => Some(attributes),
        _ => None,
    }
}
