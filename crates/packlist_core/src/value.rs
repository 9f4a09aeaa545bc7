//! Values and value-bearing result types.

use packlist_codec::{parse_int, PackedValue};

/// An element value materialized out of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Raw byte string.
    Bytes(Vec<u8>),
    /// Integer stored through the numeric fast path.
    Int(i64),
}

impl Value {
    /// Returns the byte payload, or `None` for integers.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::Int(_) => None,
        }
    }

    /// Returns the integer value, or `None` for byte strings.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Bytes(_) => None,
            Self::Int(i) => Some(*i),
        }
    }

    /// Compares this value against an external byte span using the packed
    /// array's equality semantics: integers compare by numeric value
    /// against the canonical decimal form, byte strings by length and
    /// content.
    #[must_use]
    pub fn matches(&self, other: &[u8]) -> bool {
        match self {
            Self::Bytes(b) => b == other,
            Self::Int(i) => parse_int(other) == Some(*i),
        }
    }

    /// Converts into owned bytes, rendering integers in their canonical
    /// decimal form.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Bytes(b) => b,
            Self::Int(i) => i.to_string().into_bytes(),
        }
    }

    pub(crate) fn from_packed(value: PackedValue<'_>) -> Self {
        match value {
            PackedValue::Bytes(b) => Self::Bytes(b.to_vec()),
            PackedValue::Int(i) => Self::Int(i),
        }
    }
}

/// A popped element after caller-controlled materialization.
///
/// Byte strings pass through the saver callback supplied to
/// [`PackList::pop_custom`](crate::PackList::pop_custom); integers bypass
/// it and come back decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popped<T> {
    /// The saver's rendition of a byte string element.
    Bytes(T),
    /// A decoded integer element.
    Int(i64),
}

/// Which end of the list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    /// The head (first element).
    Head,
    /// The tail (last element).
    Tail,
}
