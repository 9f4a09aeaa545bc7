//! The packed array: many values in one contiguous buffer.

use crate::encode::{
    backlen_size, decode_tp, encode_entry, read_backlen_before, TERMINATOR,
};
use crate::error::{CodecError, CodecResult};
use crate::value::PackedValue;

/// Maximum number of entries a single packed array may hold.
pub const MAX_ENTRIES: usize = u16::MAX as usize;

/// Byte size of the buffer header: total length (u32) + entry count (u16).
const HEADER_SIZE: usize = 6;

/// A sequence of typed, length-prefixed values packed into one owned
/// buffer.
///
/// Buffer layout (little-endian):
///
/// ```text
/// | total u32 | count u16 | entry* | 0xFF |
/// ```
///
/// Entries carry a reverse-readable back-length, so the array supports
/// O(1) stepping in both directions from any entry boundary obtained
/// through the position methods ([`first_pos`](Self::first_pos),
/// [`next_pos`](Self::next_pos), ...). Indexed access walks from the
/// nearer end.
#[derive(Clone, PartialEq, Eq)]
pub struct PackedArray {
    buf: Vec<u8>,
}

impl PackedArray {
    /// Creates an empty packed array.
    #[must_use]
    pub fn new() -> Self {
        let mut array = Self {
            buf: vec![0; HEADER_SIZE],
        };
        array.buf.push(TERMINATOR);
        array.write_total();
        array
    }

    /// Adopts an externally produced buffer, validating the header, the
    /// terminator, and every entry before accepting it.
    pub fn from_bytes(buf: Vec<u8>) -> CodecResult<Self> {
        validate(&buf)?;
        Ok(Self { buf })
    }

    /// Adopts a buffer previously produced by [`as_bytes`](Self::as_bytes)
    /// or [`into_bytes`](Self::into_bytes), skipping validation.
    ///
    /// The caller attests to the buffer's provenance; debug builds still
    /// verify it.
    #[must_use]
    pub fn from_raw_bytes(buf: Vec<u8>) -> Self {
        debug_assert!(validate(&buf).is_ok());
        Self { buf }
    }

    /// Returns the raw buffer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the array, returning the raw buffer.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(u16::from_le_bytes([self.buf[4], self.buf[5]]))
    }

    /// Whether the array holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total buffer size in bytes, header and terminator included.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        self.buf.len()
    }

    /// Returns the value at `index`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<PackedValue<'_>> {
        if index < self.len() {
            Some(self.value_at(self.entry_pos(index)))
        } else {
            None
        }
    }

    /// Inserts `value` before the entry at `index` (`index == len`
    /// appends). Digit strings in canonical decimal form are stored
    /// through the integer fast path.
    ///
    /// # Panics
    ///
    /// Panics when `index` is beyond the end or the array already holds
    /// [`MAX_ENTRIES`] entries.
    pub fn insert(&mut self, index: usize, value: &[u8]) {
        let count = self.len();
        assert!(index <= count, "insert index {index} out of bounds");
        assert!(count < MAX_ENTRIES, "packed array is full");

        let pos = if index == count {
            self.terminator_pos()
        } else {
            self.entry_pos(index)
        };
        let entry = encode_entry(value);
        self.buf.splice(pos..pos, entry);
        self.write_count(count + 1);
        self.write_total();
    }

    /// Inserts `value` as the new first entry.
    pub fn push_head(&mut self, value: &[u8]) {
        self.insert(0, value);
    }

    /// Appends `value` as the new last entry.
    pub fn push_tail(&mut self, value: &[u8]) {
        self.insert(self.len(), value);
    }

    /// Removes the entry at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds.
    pub fn remove(&mut self, index: usize) {
        let count = self.len();
        assert!(index < count, "remove index {index} out of bounds");
        let pos = self.entry_pos(index);
        let total = self.entry_total_len(pos);
        self.buf.drain(pos..pos + total);
        self.write_count(count - 1);
        self.write_total();
    }

    /// Removes up to `n` entries starting at `start`, returning how many
    /// were removed. Out-of-range starts remove nothing.
    pub fn remove_range(&mut self, start: usize, n: usize) -> usize {
        let count = self.len();
        if n == 0 || start >= count {
            return 0;
        }
        let n = n.min(count - start);
        let pos = self.entry_pos(start);
        let mut end = pos;
        for _ in 0..n {
            end += self.entry_total_len(end);
        }
        self.buf.drain(pos..end);
        self.write_count(count - n);
        self.write_total();
        n
    }

    /// Splits the array in two, keeping entries `[0, at)` and returning a
    /// new array holding `[at, len)`.
    ///
    /// # Panics
    ///
    /// Panics when `at` is beyond the end.
    pub fn split_off(&mut self, at: usize) -> Self {
        let count = self.len();
        assert!(at <= count, "split index {at} out of bounds");

        let pos = if at == count {
            self.terminator_pos()
        } else {
            self.entry_pos(at)
        };
        let mut other = Self {
            buf: Vec::with_capacity(HEADER_SIZE + self.buf.len() - pos),
        };
        other.buf.extend_from_slice(&[0; HEADER_SIZE]);
        other.buf.extend_from_slice(&self.buf[pos..]);
        other.write_count(count - at);
        other.write_total();

        self.buf.truncate(pos);
        self.buf.push(TERMINATOR);
        self.write_count(at);
        self.write_total();
        other
    }

    /// Appends every entry of `other` after this array's entries, without
    /// re-encoding.
    ///
    /// # Panics
    ///
    /// Panics when the combined entry count would exceed [`MAX_ENTRIES`].
    pub fn extend_from(&mut self, other: &Self) {
        let combined = self.len() + other.len();
        assert!(
            combined <= MAX_ENTRIES,
            "merged packed array would exceed entry capacity"
        );
        let pos = self.terminator_pos();
        let entries = &other.buf[HEADER_SIZE..other.terminator_pos()];
        self.buf.splice(pos..pos, entries.iter().copied());
        self.write_count(combined);
        self.write_total();
    }

    /// Iterates the entries head to tail.
    pub fn iter(&self) -> Entries<'_> {
        Entries {
            array: self,
            pos: self.first_pos(),
        }
    }

    /// Byte position of the first entry, or `None` when empty.
    #[must_use]
    pub fn first_pos(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(HEADER_SIZE)
        }
    }

    /// Byte position of the last entry, or `None` when empty.
    #[must_use]
    pub fn last_pos(&self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        Some(self.last_entry_pos())
    }

    /// Byte position of the entry following the one at `pos`, or `None`
    /// at the tail.
    #[must_use]
    pub fn next_pos(&self, pos: usize) -> Option<usize> {
        let next = pos + self.entry_total_len(pos);
        if next < self.terminator_pos() {
            Some(next)
        } else {
            None
        }
    }

    /// Byte position of the entry preceding the one at `pos`, or `None`
    /// at the head.
    #[must_use]
    pub fn prev_pos(&self, pos: usize) -> Option<usize> {
        if pos <= HEADER_SIZE {
            return None;
        }
        match read_backlen_before(&self.buf, pos) {
            Some((tp_len, n)) => Some(pos - n - tp_len),
            None => panic!("position {pos} does not follow an entry"),
        }
    }

    /// Byte position of the entry at `index`, or `None` when out of
    /// bounds. Walks from the nearer end.
    #[must_use]
    pub fn pos_of(&self, index: usize) -> Option<usize> {
        if index < self.len() {
            Some(self.entry_pos(index))
        } else {
            None
        }
    }

    /// Decodes the value of the entry at byte position `pos`.
    ///
    /// # Panics
    ///
    /// Panics when `pos` was not obtained from this array's position
    /// methods.
    #[must_use]
    pub fn value_at(&self, pos: usize) -> PackedValue<'_> {
        match decode_tp(&self.buf[..self.terminator_pos()], pos) {
            Some((value, _)) => value,
            None => panic!("position {pos} does not reference an entry"),
        }
    }

    fn terminator_pos(&self) -> usize {
        self.buf.len() - 1
    }

    fn entry_total_len(&self, pos: usize) -> usize {
        match decode_tp(&self.buf[..self.terminator_pos()], pos) {
            Some((_, tp_len)) => tp_len + backlen_size(tp_len),
            None => panic!("position {pos} does not reference an entry"),
        }
    }

    fn last_entry_pos(&self) -> usize {
        let term = self.terminator_pos();
        match read_backlen_before(&self.buf, term) {
            Some((tp_len, n)) => term - n - tp_len,
            None => panic!("corrupt tail back-length"),
        }
    }

    fn entry_pos(&self, index: usize) -> usize {
        let count = self.len();
        debug_assert!(index < count);
        if index <= count / 2 {
            let mut pos = HEADER_SIZE;
            for _ in 0..index {
                pos += self.entry_total_len(pos);
            }
            pos
        } else {
            let mut pos = self.last_entry_pos();
            for _ in 0..(count - 1 - index) {
                pos = match self.prev_pos(pos) {
                    Some(p) => p,
                    None => panic!("entry chain shorter than recorded count"),
                };
            }
            pos
        }
    }

    fn write_total(&mut self) {
        assert!(self.buf.len() <= u32::MAX as usize);
        let total = (self.buf.len() as u32).to_le_bytes();
        self.buf[0..4].copy_from_slice(&total);
    }

    fn write_count(&mut self, count: usize) {
        debug_assert!(count <= MAX_ENTRIES);
        let count = (count as u16).to_le_bytes();
        self.buf[4..6].copy_from_slice(&count);
    }
}

impl Default for PackedArray {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PackedArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackedArray")
            .field("len", &self.len())
            .field("byte_size", &self.byte_size())
            .finish_non_exhaustive()
    }
}

/// Head-to-tail iterator over a packed array's values.
pub struct Entries<'a> {
    array: &'a PackedArray,
    pos: Option<usize>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = PackedValue<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos?;
        let value = self.array.value_at(pos);
        self.pos = self.array.next_pos(pos);
        Some(value)
    }
}

fn validate(buf: &[u8]) -> CodecResult<()> {
    if buf.len() < HEADER_SIZE + 1 {
        return Err(CodecError::truncated("shorter than header + terminator"));
    }
    let total = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    if total != buf.len() {
        return Err(CodecError::header_mismatch(format!(
            "recorded total {total} but buffer is {} bytes",
            buf.len()
        )));
    }
    let term = buf.len() - 1;
    if buf[term] != TERMINATOR {
        return Err(CodecError::header_mismatch("missing terminator"));
    }

    let count = usize::from(u16::from_le_bytes([buf[4], buf[5]]));
    let mut pos = HEADER_SIZE;
    let mut seen = 0usize;
    while pos < term {
        let Some((_, tp_len)) = decode_tp(&buf[..term], pos) else {
            return Err(CodecError::invalid_entry(pos, "malformed entry"));
        };
        let entry_end = pos + tp_len + backlen_size(tp_len);
        if entry_end > term {
            return Err(CodecError::invalid_entry(pos, "entry overruns terminator"));
        }
        match read_backlen_before(buf, entry_end) {
            Some((len, n)) if len == tp_len && n == backlen_size(tp_len) => {}
            _ => {
                return Err(CodecError::invalid_entry(
                    pos,
                    "back-length disagrees with entry size",
                ));
            }
        }
        pos = entry_end;
        seen += 1;
        if seen > MAX_ENTRIES {
            return Err(CodecError::CountOverflow);
        }
    }
    if seen != count {
        return Err(CodecError::header_mismatch(format!(
            "recorded count {count} but buffer holds {seen} entries"
        )));
    }
    Ok(())
}
