//! Error types for mkvdemux-matroska.

use std::io;
use thiserror::Error;

/// Result type for mkvdemux-matroska operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Matroska demuxing.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure in the underlying EBML layer.
    #[error(transparent)]
    Ebml(#[from] mkvdemux_ebml::Error),

    /// The EBML document is not Matroska or WebM.
    #[error("Unsupported document type: {0:?}")]
    UnsupportedDocType(String),

    /// A (Simple)Block or BlockGroup is too short for its own headers.
    #[error("Truncated block at offset {offset}: {reason}")]
    TruncatedBlock { offset: u64, reason: &'static str },

    /// The track number of a block could not be decoded.
    #[error("Invalid track number in block at offset {offset}")]
    InvalidTrackNumber { offset: u64 },

    /// I/O error outside of element decoding (e.g. opening a file).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a truncated block error.
    pub fn truncated_block(offset: u64, reason: &'static str) -> Self {
        Self::TruncatedBlock { offset, reason }
    }

    /// Whether the input ended before a declared length was satisfied.
    pub fn is_truncated(&self) -> bool {
        match self {
            Self::Ebml(e) => e.is_truncated(),
            Self::TruncatedBlock { .. } => true,
            _ => false,
        }
    }
}
