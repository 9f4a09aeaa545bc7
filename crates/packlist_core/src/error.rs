//! Error types for the PackList core.

use thiserror::Error;

/// Result type for list operations.
pub type ListResult<T> = Result<T, ListError>;

/// Errors that can occur in PackList operations.
///
/// Most list operations signal recoverable conditions (out-of-bounds
/// indexes, empty lists, a full bookmark table) through `Option` or `bool`
/// returns instead; only buffer adoption can fail with an error value.
#[derive(Debug, Error)]
pub enum ListError {
    /// An external packed buffer failed validation during adoption.
    #[error("packed buffer rejected: {0}")]
    Adoption(#[from] packlist_codec::CodecError),
}
