//! Markdown format tests
//!
//! Export goes through the streaming serializer, import through comrak. The round trip tests
//! compare normalized event streams.

mod escaping;
mod export;
mod frontmatter;
mod import;
mod roundtrip;
mod table;

use doxa_babel::sink::{Attributes, Event};

/// Wraps block events in a body.
pub fn body(mut events: Vec<Event>) -> Vec<Event> {
    events.insert(0, Event::StartBody(Attributes::new()));
    events.push(Event::EndBody);
    events
}

pub fn paragraph(text: &str) -> Vec<Event> {
    vec![
        Event::StartParagraph(Attributes::new()),
        Event::text(text),
        Event::EndParagraph,
    ]
}
