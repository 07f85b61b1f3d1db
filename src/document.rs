//! A source buffer and its syntax tree, edited together.

use crate::edit::{
    sort_edits, splice, validate_batch, Adjustment, AppliedEdit, Edit, EditError, EditResult,
};
use crate::engine::{EditNotification, EngineError, ParseEngine, TreeSitterEngine};

/// Owns a buffer, the tree parsed from it, and the engine that keeps them in
/// step.
///
/// Every successful [`apply_edits`](Document::apply_edits) replaces buffer
/// and tree together and bumps the generation. Anything derived from an
/// earlier generation (node handles, ranges) no longer describes the
/// document.
pub struct Document<E: ParseEngine = TreeSitterEngine> {
    source: String,
    tree: E::Tree,
    engine: E,
    generation: u64,
}

impl<E: ParseEngine> Document<E> {
    /// Parse `source` from scratch.
    pub fn new(mut engine: E, source: impl Into<String>) -> Result<Self, EngineError> {
        let source = source.into();
        let tree = engine.reparse(&source, None)?;
        Ok(Self {
            source,
            tree,
            engine,
            generation: 0,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &E::Tree {
        &self.tree
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Number of batches applied so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply a batch of single-line edits to buffer and tree atomically.
    ///
    /// Edit ranges are given in the coordinates of the current buffer; the
    /// order they are passed in does not matter. They are applied by
    /// ascending start byte, each one shifted by the edits before it, and
    /// the returned [`AppliedEdit`]s follow that order.
    ///
    /// On error nothing changes: validation happens before any mutation, and
    /// the batch runs against a copy of the buffer and a clone of the tree
    /// that only replace the originals once the reparse has succeeded.
    pub fn apply_edits(&mut self, edits: Vec<Edit>) -> Result<EditResult, EditError> {
        validate_batch(&self.source, &edits)?;

        if edits.is_empty() {
            return Ok(EditResult::default());
        }

        log::debug!(
            "applying batch of {} edits to generation {}",
            edits.len(),
            self.generation
        );

        let mut source = self.source.clone();
        let mut tree = self.tree.clone();
        let applied_edits = self.apply_sorted(sort_edits(edits), &mut source, &mut tree);

        let new_tree = self.engine.reparse(&source, Some(&tree))?;
        let changed_ranges = self.engine.changed_ranges(&tree, &new_tree);

        log::debug!(
            "reparsed generation {}: {} changed ranges",
            self.generation + 1,
            changed_ranges.len()
        );

        self.source = source;
        self.tree = new_tree;
        self.generation += 1;

        Ok(EditResult {
            changed_ranges,
            applied_edits,
        })
    }

    fn apply_sorted(
        &self,
        edits: Vec<Edit>,
        source: &mut String,
        tree: &mut E::Tree,
    ) -> Vec<AppliedEdit> {
        let mut adjustment = Adjustment::default();
        let mut applied_edits = Vec::with_capacity(edits.len());

        for edit in edits {
            let original = edit.range;
            let adjusted = adjustment.adjust(edit);

            let mut applied = splice(source, &adjusted);
            self.engine
                .notify_edit(tree, &EditNotification::from_applied(&applied));
            adjustment.record(&applied);

            log::trace!(
                "applied {:?} -> {:?} at {} (now {})",
                applied.old_text,
                applied.replacement,
                original,
                applied.after
            );

            applied.before = original;
            applied_edits.push(applied);
        }

        applied_edits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Location, Range};
    use std::cell::RefCell;

    /// Engine double whose "tree" is the list of notifications it received.
    #[derive(Default)]
    struct RecordingEngine {
        fail_reparse: bool,
        reparses: RefCell<usize>,
    }

    impl ParseEngine for RecordingEngine {
        type Tree = Vec<EditNotification>;

        fn reparse(
            &mut self,
            _source: &str,
            previous: Option<&Self::Tree>,
        ) -> Result<Self::Tree, EngineError> {
            *self.reparses.borrow_mut() += 1;
            if self.fail_reparse {
                return Err(EngineError::ParseFailed);
            }
            Ok(previous.cloned().unwrap_or_default())
        }

        fn notify_edit(&self, tree: &mut Self::Tree, edit: &EditNotification) {
            tree.push(*edit);
        }

        fn changed_ranges(&self, _old: &Self::Tree, _new: &Self::Tree) -> Vec<Range> {
            Vec::new()
        }
    }

    fn document(source: &str) -> Document<RecordingEngine> {
        Document::new(RecordingEngine::default(), source).unwrap()
    }

    fn byte_edit(source: &str, start: usize, end: usize, text: &str) -> Edit {
        Edit::from_byte_span(source, start, end, text).unwrap()
    }

    #[test]
    fn notifies_adjusted_coordinates_in_order() {
        let source = "1 + 2";
        let mut doc = document(source);
        let edits = vec![byte_edit(source, 4, 5, "7"), byte_edit(source, 0, 1, "15")];

        doc.apply_edits(edits).unwrap();

        let notifications = doc.tree();
        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].start_byte, 0);
        assert_eq!(notifications[0].old_end_byte, 1);
        assert_eq!(notifications[0].new_end_byte, 2);
        // second edit is notified against the already grown buffer
        assert_eq!(notifications[1].start_byte, 5);
        assert_eq!(notifications[1].old_end_byte, 6);
        assert_eq!(notifications[1].new_end_point.column, 6);
    }

    #[test]
    fn reparses_once_per_batch() {
        let source = "a b c d";
        let mut doc = document(source);
        let edits = (0..4)
            .map(|i| byte_edit(source, i * 2, i * 2 + 1, "xy"))
            .collect();

        doc.apply_edits(edits).unwrap();

        // one for the initial parse, one for the batch
        assert_eq!(*doc.engine().reparses.borrow(), 2);
        assert_eq!(doc.source(), "xy xy xy xy");
        assert_eq!(doc.generation(), 1);
    }

    #[test]
    fn validation_failure_leaves_document_untouched() {
        let source = "1 + 2";
        let mut doc = document(source);
        let edit = byte_edit(source, 0, 1, "15");

        let err = doc.apply_edits(vec![edit.clone(), edit]).unwrap_err();

        assert!(matches!(err, EditError::OverlappingEdit { .. }));
        assert!(err.is_validation());
        assert_eq!(doc.source(), source);
        assert!(doc.tree().is_empty());
        assert_eq!(doc.generation(), 0);
        assert_eq!(*doc.engine().reparses.borrow(), 1);
    }

    #[test]
    fn engine_failure_leaves_document_untouched() {
        let source = "1 + 2";
        let mut doc = document(source);
        doc.engine.fail_reparse = true;

        let err = doc
            .apply_edits(vec![byte_edit(source, 0, 1, "15")])
            .unwrap_err();

        assert!(matches!(err, EditError::Engine(EngineError::ParseFailed)));
        assert!(!err.is_validation());
        assert_eq!(doc.source(), source);
        assert!(doc.tree().is_empty());
        assert_eq!(doc.generation(), 0);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut doc = document("1 + 2");
        let result = doc.apply_edits(Vec::new()).unwrap();
        assert_eq!(result, EditResult::default());
        assert_eq!(doc.generation(), 0);
    }

    #[test]
    fn before_keeps_caller_coordinates() {
        let source = "aa bb cc";
        let mut doc = document(source);
        let edits = vec![byte_edit(source, 6, 8, "C"), byte_edit(source, 0, 2, "A")];

        let result = doc.apply_edits(edits).unwrap();

        assert_eq!(doc.source(), "A bb C");
        let second = &result.applied_edits[1];
        assert_eq!(second.before.start, Location::new(0, 6, 6));
        assert_eq!(second.after.start, Location::new(0, 5, 5));
        assert_eq!(second.after.end, Location::new(0, 6, 6));
        assert_eq!(second.old_text, "cc");
    }
}
