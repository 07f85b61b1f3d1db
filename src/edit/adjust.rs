use crate::edit::{AppliedEdit, Edit};
use crate::position::Location;

/// Drift accumulated while applying a sorted batch.
///
/// Each edit's range is given in pre-batch coordinates. Edits applied
/// earlier in the batch move everything after them by their byte delta, and
/// move later edits on the same row by their column delta. Edits are
/// single-line, so an edit never moves the row of anything after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Adjustment {
    last_row: Option<usize>,
    row_column_change: isize,
    cumulative_byte_change: isize,
}

impl Adjustment {
    /// Rewrite `edit` into coordinates valid for the partially edited buffer.
    pub fn adjust(&self, mut edit: Edit) -> Edit {
        let row = edit.range.start.point.row;
        if self.row_column_change != 0 && self.last_row == Some(row) {
            shift_column(&mut edit.range.start, self.row_column_change);
            shift_column(&mut edit.range.end, self.row_column_change);
        }

        edit.range.start.byte = shift(edit.range.start.byte, self.cumulative_byte_change);
        edit.range.end.byte = shift(edit.range.end.byte, self.cumulative_byte_change);
        edit
    }

    /// Account for an edit that has just been applied.
    ///
    /// `applied.before` must still hold the adjusted range at this point.
    pub fn record(&mut self, applied: &AppliedEdit) {
        let row = applied.before.start.point.row;
        let delta = applied.byte_delta();

        self.row_column_change = if self.last_row == Some(row) {
            self.row_column_change + delta
        } else {
            delta
        };
        self.cumulative_byte_change += delta;
        self.last_row = Some(row);
    }
}

fn shift_column(location: &mut Location, delta: isize) {
    location.point.column = shift(location.point.column, delta);
}

// Sorted, non-overlapping edits never shift a later coordinate below zero.
fn shift(value: usize, delta: isize) -> usize {
    value.saturating_add_signed(delta)
}
