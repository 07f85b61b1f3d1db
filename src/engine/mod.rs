//! The incremental parsing engine seam.
//!
//! The batch coordinator only needs three things from a parser: being told
//! about each edit so existing node positions can shift, one reparse at the
//! end of the batch, and a structural diff between the old and new trees.
//! [`ParseEngine`] captures exactly that, and [`TreeSitterEngine`] provides
//! it with tree-sitter.

pub mod errors;
pub mod sitter;

pub use errors::EngineError;
pub use sitter::TreeSitterEngine;

use crate::edit::AppliedEdit;
use crate::position::{Point, Range};

/// An edit as reported to the engine, in the coordinates of the buffer at
/// the moment it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditNotification {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_end_byte: usize,
    pub start_point: Point,
    pub old_end_point: Point,
    pub new_end_point: Point,
}

impl EditNotification {
    /// Describe an applied edit whose `before` still holds the adjusted range.
    pub fn from_applied(applied: &AppliedEdit) -> Self {
        Self {
            start_byte: applied.before.start.byte,
            old_end_byte: applied.before.end.byte,
            new_end_byte: applied.after.end.byte,
            start_point: applied.before.start.point,
            old_end_point: applied.before.end.point,
            new_end_point: applied.after.end.point,
        }
    }
}

impl From<&EditNotification> for tree_sitter::InputEdit {
    fn from(edit: &EditNotification) -> Self {
        tree_sitter::InputEdit {
            start_byte: edit.start_byte,
            old_end_byte: edit.old_end_byte,
            new_end_byte: edit.new_end_byte,
            start_position: edit.start_point.into(),
            old_end_position: edit.old_end_point.into(),
            new_end_position: edit.new_end_point.into(),
        }
    }
}

/// Capabilities the batch coordinator needs from an incremental parser.
pub trait ParseEngine {
    /// A syntax tree. Cloning must be cheap enough to do once per batch.
    type Tree: Clone;

    /// Parse `source`, reusing `previous` when it has been told about every
    /// edit that turned its text into `source`.
    fn reparse(
        &mut self,
        source: &str,
        previous: Option<&Self::Tree>,
    ) -> Result<Self::Tree, EngineError>;

    /// Shift the tree's bookkeeping for one applied edit.
    fn notify_edit(&self, tree: &mut Self::Tree, edit: &EditNotification);

    /// Ranges whose syntactic structure differs between an edited old tree
    /// and the tree reparsed from it.
    fn changed_ranges(&self, old: &Self::Tree, new: &Self::Tree) -> Vec<Range>;
}
