//! # PackList Compress
//!
//! Byte-oriented compression for PackList segment buffers.
//!
//! The contract is deliberately narrow: [`compress`] either shrinks a
//! buffer by a worthwhile margin or reports that it is not worth keeping,
//! and [`decompress`] restores the exact original bytes given the original
//! size the caller recorded. The segment chain decides *when* to compress;
//! this crate only decides *how*.
//!
//! Backed by the LZ4 block codec: fast, byte-oriented, and requiring the
//! caller to retain the uncompressed size — the same shape as the chain's
//! per-segment bookkeeping.
//!
//! ## Usage
//!
//! ```
//! let raw = vec![7u8; 1024];
//! let blob = packlist_compress::compress(&raw).expect("repetitive input shrinks");
//! let restored = packlist_compress::decompress(&blob, raw.len()).unwrap();
//! assert_eq!(restored, raw);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;

pub use error::{CompressError, CompressResult};

use lz4::block::{compress_to_buffer, decompress_to_buffer, CompressionMode};

/// Minimum number of bytes compression must save for the compressed form
/// to be kept.
pub const MIN_SAVINGS: usize = 8;

/// Compresses `raw`, returning `None` when the compressed form would not
/// save at least [`MIN_SAVINGS`] bytes.
#[must_use]
pub fn compress(raw: &[u8]) -> Option<Vec<u8>> {
    let bound = lz4::block::compress_bound(raw.len()).ok()?;
    let mut out = vec![0u8; bound];
    let written =
        compress_to_buffer(raw, Some(CompressionMode::DEFAULT), false, &mut out).ok()?;
    if written + MIN_SAVINGS >= raw.len() {
        return None;
    }
    out.truncate(written);
    Some(out)
}

/// Decompresses a blob produced by [`compress`] back to its original
/// bytes. `original_size` must be the uncompressed size the caller
/// recorded at compression time.
pub fn decompress(compressed: &[u8], original_size: usize) -> CompressResult<Vec<u8>> {
    let size = i32::try_from(original_size)
        .map_err(|_| CompressError::corrupt("original size exceeds codec limits"))?;
    let mut out = vec![0u8; original_size];
    let written = decompress_to_buffer(compressed, Some(size), &mut out)
        .map_err(|e| CompressError::corrupt(e.to_string()))?;
    if written != original_size {
        return Err(CompressError::SizeMismatch {
            expected: original_size,
            actual: written,
        });
    }
    Ok(out)
}
