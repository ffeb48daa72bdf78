//! Paired-delimiter capture engine
//!
//! Teaches a token-stream parser to recognize matched open/close delimiter
//! pairs (braces, brackets, parens, or any regex-defined pair) as a
//! single nested construct: a container node holding an open marker, the
//! captured content, and a close marker.
//!
//! ```text
//! parser.capture_set("brace", Pattern::regex(r"^\{")?, Pattern::regex(r"^(\\)?\}")?, None)?;
//! parser.parse("a{b,{c,d},e}f")?;
//! ```
//!
//! Nesting is tracked per delimiter kind on an explicit stack, so families
//! interleave without interfering. Unbalanced closes are fatal under the
//! strict policy and tolerated (recorded as escaped standalone markers)
//! under the default lenient policy. A close preceded by the escape marker
//! is recorded as literal text and leaves its pair open.
//!
//! ## Modules
//!
//! - `node` - Arena-backed node tree
//! - `matcher` - Anchored patterns and structured match results
//! - `registry` - Per-kind stacks of open containers
//! - `parser` - Host surface: dispatch table, scan loop, session state
//! - `capture` - The open/close handlers and pair registrar
//! - `builtins` - Stock brace/bracket/paren registrations
//! - `snapshot` - Serializable tree snapshots
//! - `testing` - Fluent tree assertions for tests

pub mod builtins;
pub mod capture;
pub mod error;
pub mod matcher;
pub mod node;
pub mod parser;
pub mod registry;
pub mod snapshot;
pub mod testing;

// Re-export commonly used types at module root
pub use capture::{CloseHandler, NodeCallback, OpenHandler};
pub use error::CaptureError;
pub use matcher::{MatchInfo, Pattern};
pub use node::{Node, NodeId, NodeTree};
pub use parser::{Capture, Parser, ParserOptions, ParserState, TokenHandler};
pub use registry::CaptureSets;
pub use snapshot::{render_text, snapshot, NodeSnapshot};
