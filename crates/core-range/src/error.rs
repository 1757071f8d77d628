use core_buffer::BufferError;
use core_coords::Endpoint;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RangeError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("degenerate range requires equal endpoints (start {start}, end {end})")]
    DegenerateMismatch { start: Endpoint, end: Endpoint },

    #[error("unknown text unit id {0}")]
    UnknownUnit(i32),

    #[error("unknown range endpoint id {0}")]
    UnknownEndpoint(i32),

    #[error("max length must be -1 or non-negative, got {0}")]
    InvalidMaxLength(i32),

    #[error("search text is empty")]
    EmptySearchText,

    #[error("buffer rejected request: {0}")]
    Buffer(#[from] BufferError),
}

impl RangeError {
    /// Whether the caller passed an argument outside the accepted domain.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, RangeError::Buffer(_))
    }
}
