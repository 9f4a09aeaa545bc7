//! Error types for segment buffer compression.

use thiserror::Error;

/// Result type for compression operations.
pub type CompressResult<T> = Result<T, CompressError>;

/// Errors produced while decompressing a segment buffer.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The compressed blob could not be decoded.
    #[error("corrupt compressed blob: {message}")]
    Corrupt {
        /// Description of the failure.
        message: String,
    },

    /// Decompression produced a different size than recorded.
    #[error("decompressed size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Size the caller recorded for the original buffer.
        expected: usize,
        /// Size the codec actually produced.
        actual: usize,
    },
}

impl CompressError {
    /// Creates a corrupt-blob error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}
