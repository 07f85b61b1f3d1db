use crate::edit::{AppliedEdit, Edit};
use crate::position::{Location, Range};

/// Splice an adjusted edit into `source` and describe the result.
///
/// `edit.range` must already be expressed in coordinates of `source` (see
/// [`Adjustment`](crate::edit::Adjustment)) and lie on character boundaries.
/// The returned `before` is that adjusted range; callers that report
/// pre-batch coordinates overwrite it.
pub fn splice(source: &mut String, edit: &Edit) -> AppliedEdit {
    let before = edit.range;
    let old_text = source[before.byte_range()].to_string();
    source.replace_range(before.byte_range(), &edit.replacement);

    // Single-line edits keep the row, so only column and byte move.
    let delta = edit.replacement.len() as isize - old_text.len() as isize;
    let after = Range::new(
        before.start,
        Location::new(
            before.end.point.row,
            before.end.point.column.saturating_add_signed(delta),
            before.end.byte.saturating_add_signed(delta),
        ),
    );

    AppliedEdit {
        before,
        after,
        old_text,
        replacement: edit.replacement.clone(),
    }
}
