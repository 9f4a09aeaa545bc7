//! Hot-window compression lifecycle.
//!
//! A segment within `compress` segments of either end is hot and must
//! stay raw; everything beyond that is compressed opportunistically.
//! Re-applying the window costs O(depth), not O(segments): the walk runs
//! from both ends simultaneously and stops at the window boundary.

use crate::arena::SegmentId;
use crate::list::PackList;
use tracing::trace;

impl PackList {
    /// Decompresses `id` for a temporary access, marking it for
    /// recompression when the access scope ends.
    pub(crate) fn decompress_for_use(&mut self, id: SegmentId) {
        let seg = self.arena.seg_mut(id);
        if seg.is_compressed() {
            trace!(segment = ?id, "decompressing segment for access");
        }
        seg.ensure_raw_for_use();
    }

    /// Attempts to compress `id`, returning whether it ended compressed.
    pub(crate) fn try_compress_segment(&mut self, id: SegmentId) -> bool {
        let seg = self.arena.seg_mut(id);
        let was_compressed = seg.is_compressed();
        let compressed = seg.try_compress();
        if compressed && !was_compressed {
            trace!(segment = ?id, "compressed segment");
        }
        compressed
    }

    /// Restores the prescribed encoding state of `id` after an access or
    /// mutation: a segment that was temporarily decompressed is simply
    /// recompressed, anything else gets the full window re-applied around
    /// it.
    pub(crate) fn restore(&mut self, id: SegmentId) {
        if self.arena.seg(id).recompress {
            self.try_compress_segment(id);
        } else {
            self.apply_window(Some(id));
        }
    }

    /// Re-establishes the hot window: the first `compress` segments from
    /// each end are decompressed, the first segment past the window on
    /// each side is compressed, and so is `touched` when it sits outside
    /// the window.
    pub(crate) fn apply_window(&mut self, touched: Option<SegmentId>) {
        let depth = usize::from(self.compress.get());
        if self.compress.is_off() || (self.len as usize) < depth * 2 {
            return;
        }

        let mut forward = self.head;
        let mut reverse = self.tail;
        let mut in_window = false;
        for _ in 0..depth {
            let (Some(front), Some(back)) = (forward, reverse) else {
                return;
            };
            self.arena.seg_mut(front).decompress();
            self.arena.seg_mut(back).decompress();
            if touched == Some(front) || touched == Some(back) {
                in_window = true;
            }
            let front_next = self.arena.seg(front).next;
            if front == back || front_next == Some(back) {
                // The two walks met: every segment is hot.
                return;
            }
            forward = front_next;
            reverse = self.arena.seg(back).prev;
        }

        if !in_window {
            if let Some(touched) = touched {
                self.try_compress_segment(touched);
            }
        }
        if let Some(front) = forward {
            self.try_compress_segment(front);
        }
        if let Some(back) = reverse {
            self.try_compress_segment(back);
        }
    }

    /// Decompresses every segment; used when compression is switched off.
    pub(crate) fn decompress_all(&mut self) {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let seg = self.arena.seg_mut(id);
            seg.decompress();
            cursor = seg.next;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::PackList;

    fn compressible(i: usize) -> Vec<u8> {
        format!("payload {i} xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx").into_bytes()
    }

    fn nth_segment(list: &PackList, n: usize) -> crate::SegmentId {
        let mut id = list.head_segment().unwrap();
        for _ in 0..n {
            id = list.next_segment(id).unwrap();
        }
        id
    }

    #[test]
    fn window_keeps_ends_raw() {
        let mut list = PackList::with_options(4, 1);
        for i in 0..16 {
            list.push_tail(&compressible(i));
        }
        assert_eq!(list.segment_count(), 4);
        assert!(list.compressed_bytes(nth_segment(&list, 0)).is_none());
        assert!(list.compressed_bytes(nth_segment(&list, 1)).is_some());
        assert!(list.compressed_bytes(nth_segment(&list, 2)).is_some());
        assert!(list.compressed_bytes(nth_segment(&list, 3)).is_none());
        list.assert_invariants();
    }

    #[test]
    fn deeper_window_leaves_more_raw() {
        let mut list = PackList::with_options(4, 2);
        for i in 0..24 {
            list.push_tail(&compressible(i));
        }
        assert_eq!(list.segment_count(), 6);
        for n in [0, 1, 4, 5] {
            assert!(list.compressed_bytes(nth_segment(&list, n)).is_none());
        }
        for n in [2, 3] {
            assert!(list.compressed_bytes(nth_segment(&list, n)).is_some());
        }
        list.assert_invariants();
    }

    #[test]
    fn short_chain_stays_raw() {
        let mut list = PackList::with_options(4, 2);
        for i in 0..12 {
            list.push_tail(&compressible(i));
        }
        // Three segments, depth two: the walks meet before anything
        // leaves the window.
        assert_eq!(list.segment_count(), 3);
        for n in 0..3 {
            assert!(list.compressed_bytes(nth_segment(&list, n)).is_none());
        }
        list.assert_invariants();
    }

    #[test]
    fn depth_zero_never_compresses() {
        let mut list = PackList::with_options(4, 0);
        for i in 0..32 {
            list.push_tail(&compressible(i));
        }
        let mut id = Some(list.head_segment().unwrap());
        while let Some(seg) = id {
            assert!(list.compressed_bytes(seg).is_none());
            id = list.next_segment(seg);
        }
    }

    #[test]
    fn pushes_at_head_shift_the_window() {
        let mut list = PackList::with_options(4, 1);
        for i in 0..16 {
            list.push_tail(&compressible(i));
        }
        let old_head = list.head_segment().unwrap();
        // Push enough at the head to create a new head segment.
        for i in 0..4 {
            list.push_head(&compressible(100 + i));
        }
        assert_ne!(list.head_segment().unwrap(), old_head);
        // The former head is now interior and compressed.
        assert!(list.compressed_bytes(old_head).is_some());
        list.assert_invariants();
    }
}
