//! Tree Splice: atomic batch edits over a source buffer and its syntax tree.
//!
//! A [`Document`] owns a source buffer and the tree-sitter tree parsed from
//! it. [`Document::apply_edits`] takes a batch of single-line [`Edit`]s,
//! applies them to both, reparses incrementally, and reports where every
//! edit ended up and which regions of the tree actually changed.
//!
//! # Architecture
//!
//! A batch flows through a fixed pipeline:
//!
//! 1. validation ([`edit::validate_batch`]) rejects zero-sized, multi-line,
//!    overlapping and out-of-bounds edits before anything is touched;
//! 2. ordering ([`edit::sort_edits`]) puts edits in ascending start byte;
//! 3. each edit is shifted by the drift of the edits before it
//!    ([`edit::Adjustment`]), spliced into the buffer ([`edit::splice`]) and
//!    reported to the engine so the old tree can shift its nodes;
//! 4. one incremental reparse, then a structural diff of old and new trees.
//!
//! The parser sits behind [`ParseEngine`]; [`TreeSitterEngine`] is the
//! tree-sitter implementation, loading grammars through [`Grammar`].
//!
//! # Example
//!
//! ```no_run
//! use tree_splice::{Document, Edit};
//!
//! let source = "local a = 1\nlocal b = 2";
//! let mut doc = Document::parse("lua", source)?;
//!
//! let result = doc.apply_edits(vec![
//!     Edit::from_byte_span(source, 22, 23, "7").unwrap(),
//!     Edit::from_byte_span(source, 10, 11, "15").unwrap(),
//! ])?;
//!
//! assert_eq!(doc.source(), "local a = 15\nlocal b = 7");
//! assert_eq!(result.applied_edits[1].after.start.byte, 23);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod document;
pub mod edit;
pub mod engine;
pub mod grammar;
pub mod node;
pub mod position;

// Re-exports
pub use config::{
    load_from_path, load_from_str, resolve_edits, BatchConfig, ConfigError, ResolveError,
};
pub use document::Document;
pub use edit::{AppliedEdit, Edit, EditError, EditResult, EditVerification};
pub use engine::{EditNotification, EngineError, ParseEngine, TreeSitterEngine};
pub use grammar::{Grammar, TypeKind};
pub use node::{NodeError, NodeHandle};
pub use position::{LineIndex, Location, Point, Range};
