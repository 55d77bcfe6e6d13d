//! Event stream normalization for structural comparison.
//!
//! Two producers may split the same text differently (a Markdown parser breaks text at every
//! special character) or emit formatting whitespace between blocks. `normalize` removes both
//! differences so streams can be compared with `==`.

use crate::sink::Event;

/// Merges adjacent text events and drops whitespace-only text between block events.
pub fn normalize(events: &[Event]) -> Vec<Event> {
    let mut merged: Vec<Event> = Vec::with_capacity(events.len());

    for event in events {
        if let (
            Some(Event::Text {
                value: previous,
                attributes: previous_attributes,
            }),
            Event::Text { value, attributes },
        ) = (merged.last_mut(), event)
        {
            if previous_attributes == attributes {
                previous.push_str(value);
                continue;
            }
        }
        merged.push(event.clone());
    }

    let mut normalized = Vec::with_capacity(merged.len());
    for (index, event) in merged.iter().enumerate() {
        if is_blank_text(event) {
            let before_is_block = index == 0 || merged[index - 1].is_block();
            let after_is_block = merged.get(index + 1).map_or(true, Event::is_block);
            if before_is_block && after_is_block {
                continue;
            }
        }
        normalized.push(event.clone());
    }
    normalized
}

fn is_blank_text(event: &Event) -> bool {
    matches!(event, Event::Text { value, .. } if value.trim().is_empty())
}
