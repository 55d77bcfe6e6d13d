//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! Every format converts between its own text and the shared event stream, so any parser can
//! be paired with any serializer.

use crate::error::FormatError;
use crate::sink::Event;
use std::collections::HashMap;

/// Trait for document formats
///
/// Implementors provide conversion between a string representation and an event stream.
/// Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, events: &[Event]) -> Result<String, FormatError> {
///         Ok(events.iter().map(|e| e.to_string()).collect())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "events")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format (e.g., ["md", "markdown"])
    ///
    /// Returns a slice of file extensions without the leading dot.
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → events)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (events → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into an event stream
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str) -> Result<Vec<Event>, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize an event stream into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _events: &[Event]) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    /// Serialize an event stream, optionally using extra parameters.
    ///
    /// Formats without options can rely on the default implementation, which delegates to
    /// [`Format::serialize`] and rejects any parameter.
    fn serialize_with_options(
        &self,
        events: &[Event],
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        if options.is_empty() {
            self.serialize(events)
        } else {
            Err(FormatError::NotSupported(format!(
                "Format '{}' does not support extra parameters",
                self.name()
            )))
        }
    }
}
