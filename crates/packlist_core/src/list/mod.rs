//! The segment chain and its operations.
//!
//! Submodules split the mutation surface: `insert` covers the push and
//! insert paths (including splits and buffer adoption), `delete` covers
//! removal, replacement, pops and rotation, and `compress` owns the
//! hot-window lifecycle.

mod compress;
mod delete;
mod insert;

use crate::arena::{SegmentArena, SegmentId};
use crate::bookmark::Bookmark;
use crate::config::{CompressDepth, Fill};
use crate::segment::Segment;
use crate::value::Value;

/// An ordered collection of byte-string and integer values stored as a
/// doubly linked chain of packed segments.
///
/// Segments near the ends of the chain stay uncompressed (the "hot
/// window", sized by the compression depth); segments beyond it are held
/// LZ-compressed and transparently decompressed for access.
///
/// The structure is single-threaded by design: no operation blocks, and a
/// caller embedding it under concurrent commands serializes access at a
/// coarser level.
#[derive(Debug)]
pub struct PackList {
    pub(crate) arena: SegmentArena,
    pub(crate) head: Option<SegmentId>,
    pub(crate) tail: Option<SegmentId>,
    /// Total entries across all segments.
    pub(crate) count: u64,
    /// Number of segments in the chain.
    pub(crate) len: u32,
    pub(crate) fill: Fill,
    pub(crate) compress: CompressDepth,
    pub(crate) bookmarks: Vec<Bookmark>,
}

impl PackList {
    /// Creates an empty list with the default fill policy and compression
    /// disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: SegmentArena::new(),
            head: None,
            tail: None,
            count: 0,
            len: 0,
            fill: Fill::default(),
            compress: CompressDepth::default(),
            bookmarks: Vec::new(),
        }
    }

    /// Creates an empty list with the given fill policy and compression
    /// depth. Out-of-range fills are clamped.
    #[must_use]
    pub fn with_options(fill: i16, compress_depth: u16) -> Self {
        let mut list = Self::new();
        list.fill = Fill::new(fill);
        list.compress = CompressDepth::new(compress_depth);
        list
    }

    /// Changes the fill policy. Existing segments are not resized; the new
    /// policy applies to subsequent mutations.
    pub fn set_fill(&mut self, fill: i16) {
        self.fill = Fill::new(fill);
    }

    /// Changes the compression depth and re-applies the hot window.
    ///
    /// Raising the depth decompresses segments that are now hot; lowering
    /// it compresses segments that fell out of the window. Setting zero,
    /// or a window wider than the chain, decompresses everything.
    pub fn set_compress_depth(&mut self, depth: u16) {
        self.compress = CompressDepth::new(depth);
        if self.compress.is_off() || (self.len as usize) < usize::from(depth) * 2 {
            self.decompress_all();
        } else {
            self.apply_window(None);
        }
    }

    /// Changes both tunables at once.
    pub fn set_options(&mut self, fill: i16, depth: u16) {
        self.set_fill(fill);
        self.set_compress_depth(depth);
    }

    /// Total number of entries.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether the list holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of segments in the chain.
    #[must_use]
    pub fn segment_count(&self) -> u32 {
        self.len
    }

    /// The configured fill policy value.
    #[must_use]
    pub fn fill(&self) -> i16 {
        self.fill.get()
    }

    /// The configured compression depth.
    #[must_use]
    pub fn compress_depth(&self) -> u16 {
        self.compress.get()
    }

    /// First segment of the chain.
    #[must_use]
    pub fn head_segment(&self) -> Option<SegmentId> {
        self.head
    }

    /// Last segment of the chain.
    #[must_use]
    pub fn tail_segment(&self) -> Option<SegmentId> {
        self.tail
    }

    /// Segment following `id`, or `None` at the tail or for a stale id.
    #[must_use]
    pub fn next_segment(&self, id: SegmentId) -> Option<SegmentId> {
        self.arena.contains(id).then(|| self.arena.seg(id).next)?
    }

    /// Segment preceding `id`, or `None` at the head or for a stale id.
    #[must_use]
    pub fn prev_segment(&self, id: SegmentId) -> Option<SegmentId> {
        self.arena.contains(id).then(|| self.arena.seg(id).prev)?
    }

    /// The raw compressed blob of a segment currently held compressed,
    /// or `None` while it is raw or for a stale id.
    #[must_use]
    pub fn compressed_bytes(&self, id: SegmentId) -> Option<&[u8]> {
        if !self.arena.contains(id) {
            return None;
        }
        self.arena.seg(id).compressed_bytes()
    }

    /// Resolves a logical index to its value without constructing a
    /// persistent cursor. Negative indexes count from the tail (−1 is the
    /// last element); out-of-bounds indexes return `None`.
    #[must_use]
    pub fn get(&mut self, index: i64) -> Option<Value> {
        self.index(index).map(crate::Entry::into_value)
    }

    /// Deep-copies the list: fresh segments with copied buffers
    /// (compressed segments are copied compressed, without a decompress
    /// cycle) and the same configuration.
    ///
    /// Bookmarks are not carried over: they reference segment identity,
    /// which a copy cannot preserve.
    #[must_use]
    pub fn dup(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            head: self.head,
            tail: self.tail,
            count: self.count,
            len: self.len,
            fill: self.fill,
            compress: self.compress,
            bookmarks: Vec::new(),
        }
    }

    /// Checks every structural invariant of the chain, panicking on the
    /// first violation. Intended for tests and debugging; cost is linear
    /// in the number of segments.
    pub fn assert_invariants(&self) {
        if self.head.is_none() {
            assert!(self.tail.is_none(), "tail set on an empty chain");
            assert_eq!(self.count, 0, "entry count on an empty chain");
            assert_eq!(self.len, 0, "segment count on an empty chain");
            return;
        }

        let mut ids = Vec::new();
        let mut entries_sum: u64 = 0;
        let mut prev: Option<SegmentId> = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let seg = self.arena.seg(id);
            assert_eq!(seg.prev, prev, "broken back link at {id:?}");
            assert!(seg.entries() > 0, "empty segment left in chain at {id:?}");
            assert!(seg.is_packed_container(), "non-packed segment at {id:?}");
            assert!(
                !seg.recompress,
                "idle segment pending recompression at {id:?}"
            );
            assert!(
                seg.entries() <= self.fill.max_entries(),
                "segment over entry limit at {id:?}"
            );
            assert!(
                seg.entries() == 1 || !self.fill.exceeds(seg.byte_size(), seg.entries()),
                "segment over fill policy at {id:?}"
            );
            if !seg.is_compressed() {
                assert_eq!(seg.byte_size(), seg.packed().byte_size());
                assert_eq!(seg.entries(), seg.packed().len());
            }
            entries_sum += seg.entries() as u64;
            ids.push(id);
            prev = cursor;
            cursor = seg.next;
        }
        assert_eq!(self.tail, prev, "tail does not close the chain");
        assert_eq!(entries_sum, self.count, "entry counter out of sync");
        assert_eq!(ids.len() as u32, self.len, "segment counter out of sync");

        let depth = usize::from(self.compress.get());
        for (i, id) in ids.iter().enumerate() {
            let from_tail = ids.len() - 1 - i;
            let hot = self.compress.is_off() || i < depth || from_tail < depth;
            if hot {
                assert!(
                    !self.arena.seg(*id).is_compressed(),
                    "hot segment is compressed at {id:?}"
                );
            }
        }
    }

    /// Maps a global entry index to its segment and in-segment offset,
    /// walking segment boundaries from the nearer end.
    pub(crate) fn locate(&self, index: u64) -> Option<(SegmentId, usize)> {
        if index >= self.count {
            return None;
        }
        if index < self.count / 2 {
            let mut skipped: u64 = 0;
            let mut cursor = self.head;
            while let Some(id) = cursor {
                let seg = self.arena.seg(id);
                let entries = seg.entries() as u64;
                if index < skipped + entries {
                    return Some((id, (index - skipped) as usize));
                }
                skipped += entries;
                cursor = seg.next;
            }
        } else {
            let mut remaining = self.count - index;
            let mut cursor = self.tail;
            while let Some(id) = cursor {
                let seg = self.arena.seg(id);
                let entries = seg.entries() as u64;
                if remaining <= entries {
                    return Some((id, (entries - remaining) as usize));
                }
                remaining -= entries;
                cursor = seg.prev;
            }
        }
        None
    }

    /// Resolves a possibly negative public index into `[0, count)`.
    pub(crate) fn resolve_index(&self, index: i64) -> Option<u64> {
        let resolved = if index < 0 {
            let back = index.unsigned_abs();
            if back > self.count {
                return None;
            }
            self.count - back
        } else {
            index as u64
        };
        (resolved < self.count).then_some(resolved)
    }

    /// Links `segment` into the chain next to `anchor` (before it or
    /// after it), or as the only segment when `anchor` is `None`. The
    /// anchor's compression state is re-applied, since the new neighbor
    /// may have pushed it out of the hot window.
    pub(crate) fn link_segment(
        &mut self,
        anchor: Option<SegmentId>,
        segment: Segment,
        after: bool,
    ) -> SegmentId {
        let id = match anchor {
            None => {
                debug_assert!(self.head.is_none() && self.tail.is_none());
                let id = self.arena.insert(segment);
                self.head = Some(id);
                self.tail = Some(id);
                id
            }
            Some(anchor) if after => {
                let next = self.arena.seg(anchor).next;
                let mut segment = segment;
                segment.prev = Some(anchor);
                segment.next = next;
                let id = self.arena.insert(segment);
                self.arena.seg_mut(anchor).next = Some(id);
                match next {
                    Some(next) => self.arena.seg_mut(next).prev = Some(id),
                    None => self.tail = Some(id),
                }
                id
            }
            Some(anchor) => {
                let prev = self.arena.seg(anchor).prev;
                let mut segment = segment;
                segment.next = Some(anchor);
                segment.prev = prev;
                let id = self.arena.insert(segment);
                self.arena.seg_mut(anchor).prev = Some(id);
                match prev {
                    Some(prev) => self.arena.seg_mut(prev).next = Some(id),
                    None => self.head = Some(id),
                }
                id
            }
        };
        self.len += 1;
        if let Some(anchor) = anchor {
            self.restore(anchor);
        }
        id
    }

    /// Unlinks `id` from the chain and returns the owned segment.
    /// Bookmarks pointing at it move to its successor (or are evicted at
    /// the tail), and the hot window is re-applied, since removing a
    /// segment within the window exposes a compressed neighbor. The
    /// caller adjusts the entry counter.
    pub(crate) fn unlink_segment(&mut self, id: SegmentId) -> Segment {
        let (prev, next) = {
            let seg = self.arena.seg(id);
            (seg.prev, seg.next)
        };
        self.reconcile_bookmarks(id, next);
        if let Some(prev) = prev {
            self.arena.seg_mut(prev).next = next;
        }
        if let Some(next) = next {
            self.arena.seg_mut(next).prev = prev;
        }
        if self.head == Some(id) {
            self.head = next;
        }
        if self.tail == Some(id) {
            self.tail = prev;
        }
        self.len -= 1;
        let segment = self.arena.remove(id);
        self.apply_window(None);
        segment
    }
}

impl Default for PackList {
    fn default() -> Self {
        Self::new()
    }
}
