use crate::config::schema::{BatchConfig, EditDefinition, Span};
use crate::edit::{Edit, EditVerification};
use crate::position::{LineIndex, Point, Range};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("edit {edit}: {span} is outside the source")]
    OutOfRange { edit: String, span: Span },

    #[error("edit {edit}: expected {expected} at {span}, found {found:?}")]
    BeforeTextMismatch {
        edit: String,
        span: Span,
        expected: String,
        found: String,
    },
}

/// Turn the spans of a batch file into [`Edit`]s against `source`.
///
/// Only addressing and the optional `expected` text are checked here; the
/// batch rules (single-line, non-empty, non-overlapping) are enforced when
/// the edits are applied.
pub fn resolve_edits(config: &BatchConfig, source: &str) -> Result<Vec<Edit>, ResolveError> {
    let index = LineIndex::new(source);
    config
        .edits
        .iter()
        .enumerate()
        .map(|(i, definition)| resolve_edit(&index, source, i, definition))
        .collect()
}

fn resolve_edit(
    index: &LineIndex,
    source: &str,
    position: usize,
    definition: &EditDefinition,
) -> Result<Edit, ResolveError> {
    let span = definition.span;
    let out_of_range = || ResolveError::OutOfRange {
        edit: definition.label(position),
        span,
    };

    let (start, end) = match span {
        Span::Bytes { start, end } => (index.location_at_byte(start), index.location_at_byte(end)),
        Span::Columns { row, start, end } => (
            index.location_at_point(Point::new(row, start)),
            index.location_at_point(Point::new(row, end)),
        ),
    };
    let range = Range::new(start.ok_or_else(out_of_range)?, end.ok_or_else(out_of_range)?);

    let checks = definition
        .expected
        .clone()
        .map(EditVerification::ExactMatch)
        .into_iter()
        .chain(definition.expected_xxh3.map(EditVerification::Hash));

    for check in checks {
        let found = source.get(range.byte_range()).ok_or_else(out_of_range)?;
        if !check.matches(found) {
            return Err(ResolveError::BeforeTextMismatch {
                edit: definition.label(position),
                span,
                expected: check.describe(),
                found: found.to_string(),
            });
        }
    }

    Ok(Edit::new(range, definition.replacement.clone()))
}
