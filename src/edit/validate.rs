use crate::edit::{Edit, EditError};
use crate::position::{LineIndex, Location};

/// Check a caller-supplied batch against the buffer it will be applied to.
///
/// Per-edit checks run in caller order so the first offending edit is the
/// one reported. Overlap is checked on the byte-sorted order: once ranges are
/// sorted by start, any overlapping pair implies an overlapping neighbour
/// pair, so comparing neighbours covers every pair.
pub fn validate_batch(source: &str, edits: &[Edit]) -> Result<(), EditError> {
    let lines = LineIndex::new(source);
    for (index, edit) in edits.iter().enumerate() {
        check_edit(source, index, edit)?;
        check_location(&lines, source, index, edit.range.start)?;
        check_location(&lines, source, index, edit.range.end)?;
    }

    let mut order: Vec<usize> = (0..edits.len()).collect();
    order.sort_by_key(|&i| edits[i].range.start.byte);

    for pair in order.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if edits[a].range.overlaps(&edits[b].range) {
            return Err(EditError::OverlappingEdit {
                first: a.min(b),
                second: a.max(b),
            });
        }
    }

    Ok(())
}

fn check_edit(source: &str, index: usize, edit: &Edit) -> Result<(), EditError> {
    let range = edit.range;

    if range.start.byte > range.end.byte || range.start.point > range.end.point {
        return Err(EditError::InvalidRange { index, range });
    }

    if range.is_empty() {
        return Err(EditError::ZeroSizedEdit {
            index,
            location: range.start,
        });
    }

    if !range.is_single_line() || edit.replacement.contains(['\n', '\r']) {
        return Err(EditError::MultilineEdit { index, range });
    }

    if range.end.byte > source.len()
        || !source.is_char_boundary(range.start.byte)
        || !source.is_char_boundary(range.end.byte)
    {
        return Err(EditError::OutOfBounds {
            index,
            byte_start: range.start.byte,
            byte_end: range.end.byte,
            buffer_len: source.len(),
        });
    }

    Ok(())
}

// The point must be where the byte offset actually sits in `source`.
fn check_location(
    lines: &LineIndex,
    source: &str,
    index: usize,
    location: Location,
) -> Result<(), EditError> {
    match lines.location_at_byte(location.byte) {
        Some(actual) if actual == location => Ok(()),
        Some(actual) => Err(EditError::InconsistentRange {
            index,
            location,
            actual,
        }),
        // bounds were checked first
        None => Err(EditError::OutOfBounds {
            index,
            byte_start: location.byte,
            byte_end: location.byte,
            buffer_len: source.len(),
        }),
    }
}

/// Order a validated batch by ascending start byte.
///
/// This is the order edits are applied in and reported in. Validation rules
/// out ties, so the order is total.
pub fn sort_edits(mut edits: Vec<Edit>) -> Vec<Edit> {
    edits.sort_by_key(|edit| edit.range.start.byte);
    edits
}
