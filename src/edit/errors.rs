use crate::engine::EngineError;
use crate::position::{Location, Range};
use thiserror::Error;

/// Why a batch was rejected.
///
/// Every variant except [`EditError::Engine`] is raised before the buffer or
/// tree is touched. Engine failures are also non-destructive because the
/// batch is applied to working copies that are only committed on success.
#[derive(Error, Debug)]
pub enum EditError {
    #[error("edit #{index} is zero-sized at {location}")]
    ZeroSizedEdit { index: usize, location: Location },

    #[error("edit #{index} spans more than one line ({range})")]
    MultilineEdit { index: usize, range: Range },

    #[error("edits #{first} and #{second} overlap")]
    OverlappingEdit { first: usize, second: usize },

    #[error("edit #{index} has an inverted range {range}")]
    InvalidRange { index: usize, range: Range },

    #[error("edit #{index} byte range {byte_start}..{byte_end} is invalid for a buffer of length {buffer_len}")]
    OutOfBounds {
        index: usize,
        byte_start: usize,
        byte_end: usize,
        buffer_len: usize,
    },

    #[error("edit #{index} says {location} but that byte is at {actual}")]
    InconsistentRange {
        index: usize,
        location: Location,
        actual: Location,
    },

    #[error("reparse failed: {0}")]
    Engine(#[from] EngineError),
}

impl EditError {
    /// Whether this error came from checking the batch itself, as opposed to
    /// the parsing engine.
    pub fn is_validation(&self) -> bool {
        !matches!(self, EditError::Engine(_))
    }
}
