//! Event-stream document interchange
//!
//!     Every format in this crate talks to every other one through a single, flat stream of
//!     document events (./sink/event.rs). Producers (parsers) emit events in document order into
//!     a Sink; consumers (serializers) are Sinks and render as events arrive.
//!
//!     TLDR: For format authors:
//!         - Parsers return Vec<Event>; serializers implement Sink and render incrementally.
//!         - Every Start event is matched by its End event in strict LIFO order. Check producers
//!           with sink::wellformed.
//!         - Unsupported events are logged and skipped, never fatal. Only a broken nesting is.
//!
//! Architecture
//!
//!     This is a pure lib: it powers the doxa cli but makes no assumption about a shell
//!     environment (no printing, no env vars).
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── sink                    # Event vocabulary, Sink trait, well-formedness checker
//!     ├── common                  # Normalization and the indentation tree list builder
//!     ├── formats
//!     │   ├── markdown
//!     │   │   ├── parser.rs       # comrak → events
//!     │   │   ├── serializer.rs   # events → Markdown (context stack, buffers)
//!     │   │   ├── context.rs      # element contexts
//!     │   │   ├── escape.rs       # pure escaping functions
//!     │   │   ├── writer.rs       # line position tracking writer
//!     │   │   └── mod.rs
//!     │   ├── events              # debug listing and JSON
//!     │   └── outline             # plain text with indentation-based lists
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     └── <format>
//!         └── <testname>.rs
//!
//!     Rust does not discover tests in subdirectories by default, so tests/lib.rs includes them.
//!
//! Core Algorithms
//!
//!     The Markdown serializer is the hard part. Markdown escaping depends on where the cursor is
//!     (line start, after a digit) and on the enclosing block, so the serializer keeps a stack of
//!     element contexts, a parallel stack of capture buffers for content that can only be placed
//!     once complete (table cells, code spans, image alt text), and a writer that tracks the
//!     current line. See ./formats/markdown/serializer.rs.
//!
//!     The reverse direction for indentation-based lists lives in ./common/tree_list.rs.

pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;
pub mod sink;

pub use error::{FormatError, SinkError};
pub use format::Format;
pub use registry::FormatRegistry;
pub use sink::{Event, Sink};
