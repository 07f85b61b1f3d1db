//! Batch edit primitives.
//!
//! A batch is a list of single-line [`Edit`]s. It is validated as a whole,
//! ordered by start byte, and then applied one edit at a time with each
//! edit's coordinates shifted by the drift of the edits applied before it.

pub mod adjust;
pub mod errors;
pub mod patch;
pub mod validate;
pub mod verify;

pub use adjust::Adjustment;
pub use errors::EditError;
pub use patch::splice;
pub use validate::{sort_edits, validate_batch};
pub use verify::EditVerification;

use crate::position::{LineIndex, Range};
use serde::Serialize;

/// Replace `range` in the current buffer with `replacement`.
///
/// The replacement does not need to have the same length as the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use = "Edit does nothing until applied to a Document"]
pub struct Edit {
    pub range: Range,
    pub replacement: String,
}

impl Edit {
    pub fn new(range: Range, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    /// Build an edit from a byte span of `source`, deriving rows and columns.
    ///
    /// Returns `None` if either offset lies past the end of `source`.
    pub fn from_byte_span(
        source: &str,
        byte_start: usize,
        byte_end: usize,
        replacement: impl Into<String>,
    ) -> Option<Self> {
        let index = LineIndex::new(source);
        let start = index.location_at_byte(byte_start)?;
        let end = index.location_at_byte(byte_end)?;
        Some(Self::new(Range::new(start, end), replacement))
    }

    /// Replace exactly the source span covered by a tree-sitter node.
    pub fn for_node(node: tree_sitter::Node<'_>, replacement: impl Into<String>) -> Self {
        Self::new(node.range().into(), replacement)
    }
}

/// What happened to one edit of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedEdit {
    /// The range as supplied by the caller, in pre-batch coordinates.
    pub before: Range,
    /// The replacement's range in the fully edited buffer.
    pub after: Range,
    /// The text that was removed.
    pub old_text: String,
    pub replacement: String,
}

impl AppliedEdit {
    /// Byte length change introduced by this edit.
    pub fn byte_delta(&self) -> isize {
        self.replacement.len() as isize - self.old_text.len() as isize
    }
}

/// Outcome of a successful batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[must_use]
pub struct EditResult {
    /// Regions whose syntax changed, as reported by the parsing engine.
    ///
    /// These are independent of the edited spans: an edit inside a comment
    /// may change nothing, an edit that merges tokens may change more.
    pub changed_ranges: Vec<Range>,
    /// Applied edits in processing (ascending start byte) order.
    pub applied_edits: Vec<AppliedEdit>,
}
