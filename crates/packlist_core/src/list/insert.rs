//! Push and insert paths, segment splitting, and packed-buffer adoption.

use crate::arena::SegmentId;
use crate::config::ENTRY_OVERHEAD;
use crate::error::ListResult;
use crate::iter::Entry;
use crate::list::PackList;
use crate::segment::Segment;
use crate::value::End;
use packlist_codec::{PackedArray, PackedValue};
use tracing::debug;

impl PackList {
    /// Adds one element at the head. Returns whether a new segment was
    /// created for it.
    pub fn push_head(&mut self, value: &[u8]) -> bool {
        self.push(End::Head, value)
    }

    /// Adds one element at the tail. Returns whether a new segment was
    /// created for it.
    pub fn push_tail(&mut self, value: &[u8]) -> bool {
        self.push(End::Tail, value)
    }

    /// Adds one element at the given end. Returns whether a new segment
    /// was created for it.
    pub fn push(&mut self, end: End, value: &[u8]) -> bool {
        let terminal = match end {
            End::Head => self.head,
            End::Tail => self.tail,
        };
        match terminal {
            Some(id) if self.allow_insert(id, value.len()) => {
                let seg = self.arena.seg_mut(id);
                match end {
                    End::Head => seg.packed_mut().push_head(value),
                    End::Tail => seg.packed_mut().push_tail(value),
                }
                seg.sync_stats();
                self.count += 1;
                false
            }
            anchor => {
                let mut array = PackedArray::new();
                array.push_tail(value);
                self.link_segment(anchor, Segment::from_packed(array), end == End::Tail);
                self.count += 1;
                true
            }
        }
    }

    /// Inserts `value` immediately before the element `entry` refers to.
    ///
    /// # Panics
    ///
    /// Panics when `entry` is stale: its segment left this list, or the
    /// segment shrank past its offset, since the lookup that produced it.
    pub fn insert_before(&mut self, entry: &Entry, value: &[u8]) {
        self.insert_at(entry.segment(), entry.offset(), false, value);
    }

    /// Inserts `value` immediately after the element `entry` refers to.
    ///
    /// # Panics
    ///
    /// Panics when `entry` is stale; see [`insert_before`](Self::insert_before).
    pub fn insert_after(&mut self, entry: &Entry, value: &[u8]) {
        self.insert_at(entry.segment(), entry.offset(), true, value);
    }

    /// Adopts an externally built packed buffer wholesale as the new tail
    /// segment, without per-element copying. An empty buffer adds
    /// nothing.
    pub fn append_packed_buffer(&mut self, buf: Vec<u8>) -> ListResult<()> {
        let array = PackedArray::from_bytes(buf)?;
        if !array.is_empty() {
            self.adopt_packed(array);
        }
        Ok(())
    }

    /// Walks an externally built packed buffer, pushing each of its values
    /// through the normal tail path so the content is re-chunked under the
    /// current fill policy.
    pub fn append_values_from_packed_buffer(&mut self, buf: Vec<u8>) -> ListResult<()> {
        let array = PackedArray::from_bytes(buf)?;
        self.rechunk_packed(&array);
        Ok(())
    }

    /// Builds a list from an existing packed buffer: adopted in one move
    /// when it satisfies the fill policy as a single segment, re-chunked
    /// element by element otherwise.
    pub fn from_packed_buffer(fill: i16, compress_depth: u16, buf: Vec<u8>) -> ListResult<Self> {
        let mut list = Self::with_options(fill, compress_depth);
        let array = PackedArray::from_bytes(buf)?;
        if array.is_empty() {
            return Ok(list);
        }
        if list.fill.exceeds(array.byte_size(), array.len()) {
            list.rechunk_packed(&array);
        } else {
            list.adopt_packed(array);
        }
        Ok(list)
    }

    fn adopt_packed(&mut self, array: PackedArray) {
        debug!(
            entries = array.len(),
            bytes = array.byte_size(),
            "adopting packed buffer as tail segment"
        );
        let added = array.len() as u64;
        let anchor = self.tail;
        self.link_segment(anchor, Segment::from_packed(array), true);
        self.count += added;
    }

    fn rechunk_packed(&mut self, array: &PackedArray) {
        for value in array.iter() {
            match value {
                PackedValue::Bytes(bytes) => self.push_tail(bytes),
                PackedValue::Int(int) => self.push_tail(int.to_string().as_bytes()),
            };
        }
    }

    /// Whether one more entry of `value_len` bytes fits segment `id`
    /// under the fill policy. The first entry of an empty segment is
    /// always admitted.
    pub(crate) fn allow_insert(&self, id: SegmentId, value_len: usize) -> bool {
        let seg = self.arena.seg(id);
        if seg.entries() == 0 {
            return true;
        }
        !self
            .fill
            .exceeds(seg.byte_size() + value_len + ENTRY_OVERHEAD, seg.entries() + 1)
    }

    /// Positional insert next to `(id, offset)`.
    ///
    /// When the target segment has room the element goes in directly.
    /// A full segment first tries to spill a boundary insert into the
    /// neighboring segment, then falls back to a fresh segment at the
    /// boundary, and finally splits around an interior offset.
    pub(crate) fn insert_at(&mut self, id: SegmentId, offset: usize, after: bool, value: &[u8]) {
        assert!(
            self.arena.contains(id),
            "entry references a segment no longer in this list"
        );
        let entries = self.arena.seg(id).entries();
        assert!(offset < entries, "entry offset {offset} is out of date");

        let at_head = offset == 0;
        let at_tail = offset + 1 == entries;

        if self.allow_insert(id, value.len()) {
            self.decompress_for_use(id);
            let seg = self.arena.seg_mut(id);
            seg.packed_mut()
                .insert(if after { offset + 1 } else { offset }, value);
            seg.sync_stats();
            self.count += 1;
            self.restore(id);
            return;
        }

        if after && at_tail {
            // Full segment, appending past its end: prefer the head of
            // the next segment over a split.
            let next = self.arena.seg(id).next;
            if let Some(next) = next {
                if self.allow_insert(next, value.len()) {
                    self.decompress_for_use(next);
                    let seg = self.arena.seg_mut(next);
                    seg.packed_mut().push_head(value);
                    seg.sync_stats();
                    self.count += 1;
                    self.restore(next);
                    return;
                }
            }
            let mut array = PackedArray::new();
            array.push_tail(value);
            self.link_segment(Some(id), Segment::from_packed(array), true);
            self.count += 1;
            return;
        }

        if !after && at_head {
            // Mirror case at the front.
            let prev = self.arena.seg(id).prev;
            if let Some(prev) = prev {
                if self.allow_insert(prev, value.len()) {
                    self.decompress_for_use(prev);
                    let seg = self.arena.seg_mut(prev);
                    seg.packed_mut().push_tail(value);
                    seg.sync_stats();
                    self.count += 1;
                    self.restore(prev);
                    return;
                }
            }
            let mut array = PackedArray::new();
            array.push_tail(value);
            self.link_segment(Some(id), Segment::from_packed(array), false);
            self.count += 1;
            return;
        }

        // Interior of a full segment: split at the target offset, then
        // place the element on whichever half can take it under the fill
        // policy, or alone between the halves when neither can. Every
        // segment still obeys the policy afterwards.
        self.decompress_for_use(id);
        debug!(segment = ?id, offset, "splitting full segment for interior insert");
        let split_at = if after { offset + 1 } else { offset };
        let seg = self.arena.seg_mut(id);
        let mut tail_half = seg.packed_mut().split_off(split_at);
        seg.sync_stats();

        // The logical position sits exactly between the halves, so either
        // side preserves ordering; prefer the side the caller addressed.
        let left_fits = self.allow_insert(id, value.len());
        let right_fits = !self
            .fill
            .exceeds(tail_half.byte_size() + value.len() + ENTRY_OVERHEAD, tail_half.len() + 1);
        let placed_right = (after && right_fits) || (!left_fits && right_fits);
        let placed_left = !placed_right && left_fits;
        if placed_right {
            tail_half.push_head(value);
        } else if placed_left {
            let seg = self.arena.seg_mut(id);
            seg.packed_mut().push_tail(value);
            seg.sync_stats();
        }

        self.link_segment(Some(id), Segment::from_packed(tail_half), true);
        if !placed_right && !placed_left {
            let mut array = PackedArray::new();
            array.push_tail(value);
            self.link_segment(Some(id), Segment::from_packed(array), true);
        }
        self.count += 1;
        self.merge_neighborhood(id);
    }

    /// Whether segments `a` and `b` may be merged without violating the
    /// fill policy. The estimate collapses one buffer header.
    pub(crate) fn allow_merge(&self, a: SegmentId, b: SegmentId) -> bool {
        let first = self.arena.seg(a);
        let second = self.arena.seg(b);
        let merged_bytes = first.byte_size() + second.byte_size() - 7;
        !self
            .fill
            .exceeds(merged_bytes, first.entries() + second.entries())
    }

    /// Merges `b` into `a` (`b` must be `a`'s successor), returning the
    /// surviving segment. Bookmarks on `b` move to its successor.
    pub(crate) fn merge_segments(&mut self, a: SegmentId, b: SegmentId) -> SegmentId {
        debug_assert_eq!(self.arena.seg(a).next, Some(b));
        debug!(kept = ?a, absorbed = ?b, "merging adjacent segments");
        self.decompress_for_use(a);
        self.decompress_for_use(b);
        {
            // Combine the buffers before unlinking: the unlink re-applies
            // the hot window and may recompress the survivor.
            let (kept, absorbed) = self.arena.seg_pair_mut(a, b);
            kept.packed_mut().extend_from(absorbed.packed());
            kept.sync_stats();
        }
        drop(self.unlink_segment(b));
        self.restore(a);
        a
    }

    /// Tries the four merges around a freshly split segment: its two
    /// earlier neighbors, its two later neighbors, and finally itself
    /// with whichever neighbors remain.
    pub(crate) fn merge_neighborhood(&mut self, center: SegmentId) {
        let prev = self.arena.seg(center).prev;
        let prev_prev = prev.and_then(|p| self.arena.seg(p).prev);
        let next = self.arena.seg(center).next;
        let next_next = next.and_then(|n| self.arena.seg(n).next);

        if let (Some(a), Some(b)) = (prev_prev, prev) {
            if self.allow_merge(a, b) {
                self.merge_segments(a, b);
            }
        }
        if let (Some(a), Some(b)) = (next, next_next) {
            if self.allow_merge(a, b) {
                self.merge_segments(a, b);
            }
        }
        let center = match self.arena.seg(center).prev {
            Some(prev) if self.allow_merge(prev, center) => self.merge_segments(prev, center),
            _ => center,
        };
        if let Some(next) = self.arena.seg(center).next {
            if self.allow_merge(center, next) {
                self.merge_segments(center, next);
            }
        }
    }
}
