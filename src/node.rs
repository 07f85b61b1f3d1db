//! Generation-scoped node handles for tree-sitter backed documents.
//!
//! A [`NodeHandle`] is a plain value: the node's kind, its range and the
//! document generation it was taken from. It holds no borrow of the tree, so
//! it can outlive an edit, but resolving it after the document has moved on
//! fails with [`NodeError::StaleHandle`] instead of pointing at whatever now
//! sits at the old offsets.

use crate::document::Document;
use crate::engine::sitter::error_ranges;
use crate::engine::{EngineError, TreeSitterEngine};
use crate::grammar::{Grammar, KindId};
use crate::position::Range;
use thiserror::Error;
use tree_sitter::Node;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("cannot create a handle for an absent node")]
    NullHandle,

    #[error("node handle from generation {handle} used on generation {current}")]
    StaleHandle { handle: u64, current: u64 },

    #[error("node text is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    kind_id: KindId,
    range: Range,
    generation: u64,
}

impl NodeHandle {
    pub fn kind_id(&self) -> KindId {
        self.kind_id
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Document<TreeSitterEngine> {
    /// Parse `source` with the named grammar.
    pub fn parse(language: &str, source: impl Into<String>) -> Result<Self, EngineError> {
        Document::new(TreeSitterEngine::for_language(language)?, source)
    }

    pub fn grammar(&self) -> &Grammar {
        self.engine().grammar()
    }

    /// The root node of the current tree.
    ///
    /// Like every borrowed node it cannot outlive the next edit; take a
    /// [`NodeHandle`] to keep a reference across edits.
    pub fn root_node(&self) -> Node<'_> {
        self.tree().root_node()
    }

    pub fn root(&self) -> NodeHandle {
        self.handle_unchecked(self.root_node())
    }

    /// Take a handle for a node of this document, e.g. the result of
    /// `node.child_by_field_name(..)`.
    pub fn handle(&self, node: Option<Node<'_>>) -> Result<NodeHandle, NodeError> {
        node.map(|node| self.handle_unchecked(node))
            .ok_or(NodeError::NullHandle)
    }

    fn handle_unchecked(&self, node: Node<'_>) -> NodeHandle {
        NodeHandle {
            kind_id: node.kind_id(),
            range: node.range().into(),
            generation: self.generation(),
        }
    }

    /// Find the node a handle was taken from.
    pub fn resolve(&self, handle: &NodeHandle) -> Result<Node<'_>, NodeError> {
        if handle.generation != self.generation() {
            return Err(NodeError::StaleHandle {
                handle: handle.generation,
                current: self.generation(),
            });
        }

        let byte_range = handle.range.byte_range();
        let mut candidate = self
            .root_node()
            .descendant_for_byte_range(byte_range.start, byte_range.end);

        // Wrapper nodes can share a range with their only child; walk up
        // until the kind matches.
        while let Some(node) = candidate {
            if node.byte_range() != byte_range {
                break;
            }
            if node.kind_id() == handle.kind_id {
                return Ok(node);
            }
            candidate = node.parent();
        }

        Err(NodeError::NullHandle)
    }

    pub fn node_text(&self, handle: &NodeHandle) -> Result<&str, NodeError> {
        let node = self.resolve(handle)?;
        Ok(node.utf8_text(self.source().as_bytes())?)
    }

    pub fn node_kind(&self, handle: &NodeHandle) -> Option<&'static str> {
        self.grammar().kind_name(handle.kind_id)
    }

    /// S-expression of the whole tree.
    pub fn to_sexp(&self) -> String {
        self.root_node().to_sexp()
    }

    /// Ranges of ERROR and MISSING nodes in the current tree.
    pub fn error_ranges(&self) -> Vec<Range> {
        error_ranges(self.root_node())
    }

    pub fn has_errors(&self) -> bool {
        self.root_node().has_error()
    }
}
