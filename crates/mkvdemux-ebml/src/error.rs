//! Error types for mkvdemux-ebml.

use std::io;
use thiserror::Error;

use crate::ElementId;

/// Result type for mkvdemux-ebml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for EBML decoding.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the underlying byte source.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    /// A variable-length integer had no length marker (first byte `0x00`)
    /// or was longer than allowed for its position.
    #[error("Malformed VINT at offset {offset}")]
    MalformedVInt { offset: u64 },

    /// The input ended before a declared length was satisfied.
    #[error("Truncated input at offset {offset}")]
    TruncatedInput { offset: u64 },

    /// An element declared the "unknown size" sentinel where a bounded size is required.
    #[error("Unknown-size element {id} at offset {offset} is not supported here")]
    UnsupportedUnknownSize { id: ElementId, offset: u64 },

    /// A specific element was required but another one was found.
    #[error("Expected element {expected}, found {found}")]
    UnexpectedElement { expected: ElementId, found: ElementId },

    /// An element payload exceeds the configured allocation ceiling.
    #[error("Element {id} payload of {size} bytes exceeds maximum {max}")]
    ElementTooLarge { id: ElementId, size: u64, max: u64 },
}

impl Error {
    /// Create an unexpected element error.
    pub fn unexpected(expected: ElementId, found: ElementId) -> Self {
        Self::UnexpectedElement { expected, found }
    }

    /// Map an I/O error raised while reading data that started at `offset`.
    ///
    /// Running out of bytes is reported as truncation, everything else is passed through.
    pub fn from_io(err: io::Error, offset: u64) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::TruncatedInput { offset }
        } else {
            Self::Io(err)
        }
    }

    /// Whether this error means the input ended early.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::TruncatedInput { .. })
    }
}
