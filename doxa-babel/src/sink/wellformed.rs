//! Well-formedness checking for event streams
//!
//!     The checker is the reference consumer of the event protocol. It keeps a stack of the
//!     element names opened so far and, for every closer, pops the stack and compares the popped
//!     name with the closer's name. It renders nothing and escapes nothing.
//!
//! Algorithm
//!
//!     - open(name): push name.
//!     - close(name): pop. If the stack was empty, or the popped name differs, record a
//!       violation. The popped element is consumed either way, so a single misplaced closer does
//!       not cascade into a violation for every following closer.
//!     - At end of document, any names still on the stack are unclosed openers
//!       ([`WellformednessChecker::unclosed`]).
//!
//!     Producers (parsers, builders) are validated by driving a checker to a terminal state and
//!     asserting [`WellformednessChecker::is_complete`].

use super::event::{Event, EventKind};
use super::Sink;
use crate::error::SinkError;
use std::fmt;

/// A single stack discipline violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the element the closer claimed to close
    pub closing: String,
    /// Name that was actually innermost, `None` if nothing was open
    pub innermost: Option<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.innermost {
            Some(open) => write!(f, "expected to close '{open}' but got '{}'", self.closing),
            None => write!(f, "'{}' closes nothing, no element is open", self.closing),
        }
    }
}

/// Verifies that every closer matches the most recently opened element.
#[derive(Debug, Default, Clone)]
pub struct WellformednessChecker {
    stack: Vec<String>,
    violations: Vec<Violation>,
}

impl WellformednessChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, name: impl Into<String>) {
        self.stack.push(name.into());
    }

    pub fn close(&mut self, name: &str) {
        match self.stack.pop() {
            Some(open) if open == name => {}
            innermost => {
                let violation = Violation {
                    closing: name.to_string(),
                    innermost,
                };
                tracing::debug!(%violation, "ill-formed event stream");
                self.violations.push(violation);
            }
        }
    }

    /// True iff no violation was recorded since the last reset.
    pub fn is_wellformed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Well-formed and nothing left open.
    pub fn is_complete(&self) -> bool {
        self.is_wellformed() && self.stack.is_empty()
    }

    /// The most recent violation.
    pub fn offender(&self) -> Option<&Violation> {
        self.violations.last()
    }

    pub fn errors(&self) -> &[Violation] {
        &self.violations
    }

    /// Openers still waiting for their closer, outermost first.
    pub fn unclosed(&self) -> &[String] {
        &self.stack
    }

    pub fn reset(&mut self) {
        self.stack.clear();
        self.violations.clear();
    }
}

impl Sink for WellformednessChecker {
    fn emit(&mut self, event: &Event) -> Result<(), SinkError> {
        match event.kind() {
            EventKind::Open(tag) => self.open(tag),
            EventKind::Close(tag) => self.close(tag),
            EventKind::Leaf => {}
        }
        Ok(())
    }
}

/// Runs `events` through a fresh checker.
pub fn check(events: &[Event]) -> WellformednessChecker {
    let mut checker = WellformednessChecker::new();
    for event in events {
        // Recording never fails.
        let _ = checker.emit(event);
    }
    checker
}
