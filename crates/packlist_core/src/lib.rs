//! # PackList Core
//!
//! An in-memory list engine for key-value stores: ordered collections of
//! byte-string and integer values held as a doubly linked chain of packed
//! segments.
//!
//! The design reconciles two conflicting goals — near-zero per-element
//! memory overhead and fast random-position access — by packing many
//! elements contiguously into fixed-capacity segments
//! ([`packlist_codec::PackedArray`] buffers) and LZ-compressing segments
//! away from the chain ends, where real workloads rarely touch.
//!
//! This crate provides:
//! - Push, pop, insert, replace, rotate and range-delete operations
//! - Segment sizing, splitting and merging under a configurable fill policy
//! - A compression hot window sized by the configurable depth
//! - Forward/backward cursors that restore compression state on release
//! - Named bookmarks for resuming iteration over very large lists
//!
//! ## Example
//!
//! ```
//! use packlist_core::{Direction, End, PackList, Value};
//!
//! let mut list = PackList::with_options(128, 0);
//! list.push_tail(b"alpha");
//! list.push_tail(b"42");
//! list.push_head(b"omega");
//!
//! assert_eq!(list.count(), 3);
//! assert_eq!(list.get(1), Some(Value::Bytes(b"alpha".to_vec())));
//! assert_eq!(list.pop(End::Tail), Some(Value::Int(42)));
//!
//! let order: Vec<_> = list.iter(Direction::HeadToTail).collect();
//! assert_eq!(order.len(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod arena;
mod bookmark;
mod config;
mod error;
mod iter;
mod list;
mod segment;
mod value;

pub use arena::SegmentId;
pub use config::{CompressDepth, Fill, BOOKMARK_CAPACITY};
pub use error::{ListError, ListResult};
pub use iter::{Direction, Entry, Iter};
pub use list::PackList;
pub use value::{End, Popped, Value};
