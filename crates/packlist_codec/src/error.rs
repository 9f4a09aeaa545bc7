//! Error types for the packed array codec.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors produced while validating or adopting packed array buffers.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Buffer is too short to contain a valid packed array.
    #[error("buffer truncated: {message}")]
    Truncated {
        /// Description of what was missing.
        message: String,
    },

    /// Header fields disagree with the buffer contents.
    #[error("header mismatch: {message}")]
    HeaderMismatch {
        /// Description of the disagreement.
        message: String,
    },

    /// An entry's encoding is malformed.
    #[error("invalid entry at byte offset {offset}: {message}")]
    InvalidEntry {
        /// Byte offset of the offending entry.
        offset: usize,
        /// Description of the problem.
        message: String,
    },

    /// Entry count exceeds the 16-bit capacity of a packed array.
    #[error("entry count overflow: a packed array holds at most {max} entries", max = u16::MAX)]
    CountOverflow,
}

impl CodecError {
    /// Creates a truncated-buffer error.
    pub fn truncated(message: impl Into<String>) -> Self {
        Self::Truncated {
            message: message.into(),
        }
    }

    /// Creates a header mismatch error.
    pub fn header_mismatch(message: impl Into<String>) -> Self {
        Self::HeaderMismatch {
            message: message.into(),
        }
    }

    /// Creates an invalid entry error.
    pub fn invalid_entry(offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            offset,
            message: message.into(),
        }
    }
}
