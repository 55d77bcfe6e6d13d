//! The document event protocol.
//!
//! Producers (parsers, builders) describe a document as a flat sequence of
//! [`Event`]s and push them into a [`Sink`]. Consumers (serializers, checkers,
//! recorders) implement [`Sink`] and act on each event as it arrives.
//!
//! Openers and closers must nest: every opener is eventually followed by the
//! closer of the same tag, and closers arrive in reverse order of their
//! openers. [`wellformed::WellformednessChecker`] verifies this for any
//! stream; consumers may assume it and report violations as
//! [`SinkError::ContextMismatch`].

pub mod attributes;
pub mod event;
pub mod wellformed;

pub use attributes::Attributes;
pub use event::{Event, EventKind, Justification, Numbering, SectionLevel};

use crate::error::SinkError;

/// A consumer of document events.
pub trait Sink {
    /// Consumes a single event.
    fn emit(&mut self, event: &Event) -> Result<(), SinkError>;

    /// Pushes any pending output to the destination.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Ends the document: flushes and resets internal state.
    fn close(&mut self) -> Result<(), SinkError> {
        self.flush()
    }
}

/// Records every event it receives.
impl Sink for Vec<Event> {
    fn emit(&mut self, event: &Event) -> Result<(), SinkError> {
        self.push(event.clone());
        Ok(())
    }
}

/// Feeds `events` into `sink` in order, stopping at the first error.
///
/// The sink is flushed but not closed.
pub fn drive<S: Sink + ?Sized>(sink: &mut S, events: &[Event]) -> Result<(), SinkError> {
    for event in events {
        sink.emit(event)?;
    }
    sink.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_order() {
        let events = vec![
            Event::StartParagraph(Attributes::new()),
            Event::text("a"),
            Event::EndParagraph,
        ];
        let mut recorded: Vec<Event> = Vec::new();
        drive(&mut recorded, &events).unwrap();
        assert_eq!(recorded, events);
    }
}
