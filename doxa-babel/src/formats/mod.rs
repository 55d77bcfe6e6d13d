//! Format implementations
//!
//! Every format converts between its own text representation and the event stream.

pub mod events;
pub mod markdown;
pub mod outline;

pub use events::{EventsFormat, EventsJsonFormat};
pub use markdown::MarkdownFormat;
pub use outline::OutlineFormat;
