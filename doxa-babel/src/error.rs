//! Error types for sink and format operations

use thiserror::Error;

/// Errors raised while a sink consumes events
#[derive(Debug, Error)]
pub enum SinkError {
    /// A closer arrived for a context other than the innermost open one.
    ///
    /// This is a protocol fault of the producer; the sink state is undefined
    /// afterwards and the caller must abort the document.
    #[error("context mismatch: expected to close {expected}, innermost open context is {found}")]
    ContextMismatch { expected: String, found: String },

    /// The underlying writer failed
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during format operations
#[derive(Debug, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// A sink rejected the event stream
    #[error(transparent)]
    Sink(#[from] SinkError),
}
