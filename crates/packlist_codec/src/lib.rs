//! # PackList Codec
//!
//! The packed array encoding used by PackList segments.
//!
//! A [`PackedArray`] stores a sequence of values in one contiguous owned
//! buffer: each entry is typed, length-prefixed, and followed by a
//! reverse-readable back-length, so the array supports O(1) stepping in
//! both directions without per-element allocations. Byte spans that are
//! the canonical decimal form of an `i64` are transparently stored through
//! an integer fast path.
//!
//! This crate knows nothing about segment chains or compression; it only
//! mutates and reads raw buffers.
//!
//! ## Usage
//!
//! ```
//! use packlist_codec::{PackedArray, PackedValue};
//!
//! let mut array = PackedArray::new();
//! array.push_tail(b"hello");
//! array.push_tail(b"42");
//!
//! assert_eq!(array.get(0), Some(PackedValue::Bytes(b"hello")));
//! assert_eq!(array.get(1), Some(PackedValue::Int(42)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod array;
mod encode;
mod error;
mod value;

pub use array::{Entries, PackedArray, MAX_ENTRIES};
pub use error::{CodecError, CodecResult};
pub use value::{parse_int, PackedValue};
