//! Cursors over the chain and the entries they yield.
//!
//! An [`Iter`] exclusively borrows its list for as long as it lives, so
//! no other path can restructure segments underneath it — and its `Drop`
//! implementation restores the compression state of any segment it left
//! temporarily decompressed, on every exit path. Releasing an iterator is
//! therefore just dropping it.

use crate::arena::SegmentId;
use crate::list::PackList;
use crate::value::Value;

/// Traversal direction of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From the first element towards the last.
    HeadToTail,
    /// From the last element towards the first.
    TailToHead,
}

/// One located element: which segment holds it, its offset inside that
/// segment, and its materialized value.
///
/// An entry stays valid until the next structural mutation of its
/// segment other than through the iterator that yielded it; operations
/// handed a stale entry panic rather than touch the wrong element.
#[derive(Debug, Clone)]
pub struct Entry {
    segment: SegmentId,
    offset: usize,
    value: Value,
}

impl Entry {
    /// The materialized value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consumes the entry, returning its value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// The segment holding the element.
    #[must_use]
    pub fn segment(&self) -> SegmentId {
        self.segment
    }

    /// The element's offset within its segment.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Compares the element against an external byte span using the
    /// packed array's equality semantics (integers compare numerically
    /// against the canonical decimal form).
    #[must_use]
    pub fn matches(&self, other: &[u8]) -> bool {
        self.value.matches(other)
    }
}

/// A cursor traversing the list in one direction.
pub struct Iter<'a> {
    list: &'a mut PackList,
    current: Option<SegmentId>,
    /// Logical offset of the next element to yield within `current`.
    offset: usize,
    /// Cached byte position of that element inside the segment's raw
    /// buffer; recomputed whenever `None`.
    byte_pos: Option<usize>,
    direction: Direction,
}

impl PackList {
    /// Starts a cursor at the head (forward) or tail (backward) end.
    pub fn iter(&mut self, direction: Direction) -> Iter<'_> {
        let current = match direction {
            Direction::HeadToTail => self.head,
            Direction::TailToHead => self.tail,
        };
        let offset = match (direction, current) {
            (Direction::TailToHead, Some(id)) => self.arena.seg(id).entries() - 1,
            _ => 0,
        };
        Iter {
            list: self,
            current,
            offset,
            byte_pos: None,
            direction,
        }
    }

    /// Starts a cursor at a logical index (negative counts from the
    /// tail), or `None` when the index is out of bounds. Locating the
    /// segment walks segment boundaries, not elements.
    pub fn iter_at(&mut self, direction: Direction, index: i64) -> Option<Iter<'_>> {
        let resolved = self.resolve_index(index)?;
        let (segment, offset) = self.locate(resolved)?;
        Some(Iter {
            list: self,
            current: Some(segment),
            offset,
            byte_pos: None,
            direction,
        })
    }

    /// Resolves a logical index into a located [`Entry`] without keeping
    /// a cursor. Negative indexes count from the tail; out-of-bounds
    /// indexes return `None`. A compressed segment is decompressed for
    /// the read and restored before returning.
    #[must_use]
    pub fn index(&mut self, index: i64) -> Option<Entry> {
        let resolved = self.resolve_index(index)?;
        let (segment, offset) = self.locate(resolved)?;
        self.decompress_for_use(segment);
        let value = match self.arena.seg(segment).packed().get(offset) {
            Some(found) => Value::from_packed(found),
            None => unreachable!("located offset within segment bounds"),
        };
        if self.arena.seg(segment).recompress {
            self.try_compress_segment(segment);
        }
        Some(Entry {
            segment,
            offset,
            value,
        })
    }
}

impl Iter<'_> {
    /// Yields the element under the cursor and advances, crossing into
    /// the neighboring segment when the current one is exhausted — and
    /// recompressing the segment being left if it was only decompressed
    /// for this traversal. Returns `None` past the end; never wraps.
    pub fn next_entry(&mut self) -> Option<Entry> {
        let id = self.current?;
        self.list.decompress_for_use(id);

        let (value, step) = {
            let array = self.list.arena.seg(id).packed();
            let pos = match self.byte_pos {
                Some(pos) => pos,
                None => match array.pos_of(self.offset) {
                    Some(pos) => pos,
                    None => unreachable!("cursor offset within segment bounds"),
                },
            };
            let value = Value::from_packed(array.value_at(pos));
            let step = match self.direction {
                Direction::HeadToTail => array.next_pos(pos),
                Direction::TailToHead => array.prev_pos(pos),
            };
            (value, step)
        };
        let entry = Entry {
            segment: id,
            offset: self.offset,
            value,
        };

        match (self.direction, step) {
            (Direction::HeadToTail, Some(pos)) => {
                self.offset += 1;
                self.byte_pos = Some(pos);
            }
            (Direction::TailToHead, Some(pos)) => {
                self.offset -= 1;
                self.byte_pos = Some(pos);
            }
            (Direction::HeadToTail, None) => {
                self.leave(id);
                self.current = self.list.arena.seg(id).next;
                self.offset = 0;
                self.byte_pos = None;
            }
            (Direction::TailToHead, None) => {
                self.leave(id);
                let prev = self.list.arena.seg(id).prev;
                self.current = prev;
                self.offset = match prev {
                    Some(prev) => self.list.arena.seg(prev).entries() - 1,
                    None => 0,
                };
                self.byte_pos = None;
            }
        }
        Some(entry)
    }

    /// Deletes the element the iterator just yielded, keeping the cursor
    /// valid: forward iteration continues with the element that followed
    /// the deleted one, backward iteration with the element that preceded
    /// it. The shrunken segment is merged with a neighbor when the
    /// combined size still fits the fill policy.
    ///
    /// # Panics
    ///
    /// Panics when `entry` did not come from this iterator's most recent
    /// [`next_entry`](Self::next_entry) call.
    pub fn del_entry(&mut self, entry: &Entry) {
        assert!(
            self.list.arena.contains(entry.segment),
            "entry references a segment no longer in this list"
        );
        let id = entry.segment;
        let segment_deleted = self.list.del_at(id, entry.offset);

        if segment_deleted {
            // The cursor always crosses a segment boundary before its
            // last yielded element could empty the segment, so it cannot
            // still be parked on the deleted one.
            debug_assert_ne!(self.current, Some(id));
            return;
        }

        if self.current == Some(id) {
            match self.direction {
                Direction::HeadToTail => {
                    // The follower slid into the deleted slot.
                    self.offset = entry.offset;
                    self.byte_pos = None;
                }
                Direction::TailToHead => {
                    // Elements before the deleted one kept their offsets;
                    // only the cached byte position is suspect.
                    self.byte_pos = None;
                }
            }
        }
        self.merge_with_cursor(id);
    }

    /// Resets the cursor to the head, traversing forward.
    pub fn rewind(&mut self) {
        if let Some(id) = self.current {
            self.leave(id);
        }
        self.direction = Direction::HeadToTail;
        self.current = self.list.head;
        self.offset = 0;
        self.byte_pos = None;
    }

    /// Resets the cursor to the tail, traversing backward.
    pub fn rewind_tail(&mut self) {
        if let Some(id) = self.current {
            self.leave(id);
        }
        self.direction = Direction::TailToHead;
        self.current = self.list.tail;
        self.offset = match self.current {
            Some(id) => self.list.arena.seg(id).entries() - 1,
            None => 0,
        };
        self.byte_pos = None;
    }

    /// The segment under the cursor, if the traversal is not exhausted.
    #[must_use]
    pub fn segment(&self) -> Option<SegmentId> {
        self.current
    }

    /// Recompresses `id` if this traversal left it temporarily
    /// decompressed.
    fn leave(&mut self, id: SegmentId) {
        if self.list.arena.contains(id) && self.list.arena.seg(id).recompress {
            self.list.try_compress_segment(id);
        }
    }

    /// Merges the shrunken segment with its neighbors where the fill
    /// policy allows, translating the cursor into the surviving segment.
    fn merge_with_cursor(&mut self, id: SegmentId) {
        let mut kept = id;
        if let Some(prev) = self.list.arena.seg(id).prev {
            if self.list.allow_merge(prev, id) {
                let prev_entries = self.list.arena.seg(prev).entries();
                self.list.merge_segments(prev, id);
                if self.current == Some(id) {
                    self.current = Some(prev);
                    self.offset += prev_entries;
                    self.byte_pos = None;
                }
                kept = prev;
            }
        }
        if let Some(next) = self.list.arena.seg(kept).next {
            if self.list.allow_merge(kept, next) {
                let kept_entries = self.list.arena.seg(kept).entries();
                self.list.merge_segments(kept, next);
                if self.current == Some(next) {
                    self.current = Some(kept);
                    self.offset += kept_entries;
                    self.byte_pos = None;
                }
            }
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry()
    }
}

impl Drop for Iter<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.current {
            self.leave(id);
        }
    }
}

impl std::fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter")
            .field("current", &self.current)
            .field("offset", &self.offset)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}
