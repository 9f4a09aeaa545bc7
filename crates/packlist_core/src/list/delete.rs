//! Removal paths: single entries, ranges, replacement, pops, rotation.

use crate::arena::SegmentId;
use crate::list::PackList;
use crate::value::{End, Popped, Value};
use tracing::trace;

impl PackList {
    /// Removes the element at `offset` in segment `id`, freeing the
    /// segment if it empties. Returns whether the segment was removed.
    /// No merging happens here; merge decisions stay with the callers
    /// that know the surrounding access pattern.
    pub(crate) fn del_at(&mut self, id: SegmentId, offset: usize) -> bool {
        self.decompress_for_use(id);
        let seg = self.arena.seg_mut(id);
        seg.packed_mut().remove(offset);
        seg.sync_stats();
        self.count -= 1;
        if self.arena.seg(id).entries() == 0 {
            drop(self.unlink_segment(id));
            true
        } else {
            self.restore(id);
            false
        }
    }

    /// Removes the inclusive logical range `[start, stop]`. Negative
    /// bounds count from the tail; a `stop` past the end is clamped to
    /// the last element.
    ///
    /// Returns `false` without removing anything when the list is empty,
    /// the resolved range is inverted, or `start` lies beyond the end.
    pub fn del_range(&mut self, start: i64, stop: i64) -> bool {
        if self.count == 0 {
            return false;
        }
        let count = self.count as i64;
        let mut start = if start < 0 { start + count } else { start };
        let mut stop = if stop < 0 { stop + count } else { stop };
        if start < 0 {
            start = 0;
        }
        if stop >= count {
            stop = count - 1;
        }
        if start > stop || start >= count {
            return false;
        }

        let mut extent = (stop - start + 1) as u64;
        let located = self.locate(start as u64);
        let (mut cursor, mut offset) = match located {
            Some(found) => (Some(found.0), found.1),
            None => return false,
        };

        while extent > 0 {
            let Some(id) = cursor else { break };
            let next = self.arena.seg(id).next;
            let entries = self.arena.seg(id).entries();
            let available = entries - offset;
            let del = (extent.min(available as u64)) as usize;

            if offset == 0 && del == entries {
                // The range swallows the whole segment: unlink it without
                // touching individual entries.
                trace!(segment = ?id, entries, "range delete drops whole segment");
                drop(self.unlink_segment(id));
            } else {
                self.decompress_for_use(id);
                let seg = self.arena.seg_mut(id);
                seg.packed_mut().remove_range(offset, del);
                seg.sync_stats();
                self.restore(id);
            }
            self.count -= del as u64;
            extent -= del as u64;
            cursor = next;
            offset = 0;
        }
        true
    }

    /// Replaces the element at `index` in place, keeping the element
    /// count unchanged. Returns `false` when `index` is out of bounds.
    ///
    /// A replacement too large for its segment is routed through the
    /// regular insert machinery, so every segment still obeys the fill
    /// policy on return.
    pub fn replace_at_index(&mut self, index: i64, value: &[u8]) -> bool {
        let Some(resolved) = self.resolve_index(index) else {
            return false;
        };
        let Some((id, offset)) = self.locate(resolved) else {
            return false;
        };

        self.decompress_for_use(id);
        let seg = self.arena.seg_mut(id);
        seg.packed_mut().remove(offset);
        seg.sync_stats();
        self.count -= 1;

        if self.allow_insert(id, value.len()) {
            let seg = self.arena.seg_mut(id);
            seg.packed_mut().insert(offset, value);
            seg.sync_stats();
            self.count += 1;
            self.restore(id);
        } else if offset < self.arena.seg(id).entries() {
            self.insert_at(id, offset, false, value);
        } else {
            self.insert_at(id, offset - 1, true, value);
        }
        true
    }

    /// Removes and returns the element at the given end, or `None` when
    /// the list is empty.
    pub fn pop(&mut self, end: End) -> Option<Value> {
        self.pop_custom(end, <[u8]>::to_vec).map(|p| match p {
            Popped::Bytes(bytes) => Value::Bytes(bytes),
            Popped::Int(int) => Value::Int(int),
        })
    }

    /// Removes the element at the given end, materializing byte strings
    /// through `saver` before the underlying buffer is edited. Integer
    /// elements bypass the saver and come back decoded.
    ///
    /// Returns `None` when the list is empty.
    pub fn pop_custom<T>(
        &mut self,
        end: End,
        saver: impl FnOnce(&[u8]) -> T,
    ) -> Option<Popped<T>> {
        if self.count == 0 {
            return None;
        }
        let id = match end {
            End::Head => self.head?,
            End::Tail => self.tail?,
        };
        let seg = self.arena.seg(id);
        let offset = match end {
            End::Head => 0,
            End::Tail => seg.entries() - 1,
        };
        let popped = match seg.packed().get(offset) {
            Some(packlist_codec::PackedValue::Bytes(bytes)) => Popped::Bytes(saver(bytes)),
            Some(packlist_codec::PackedValue::Int(int)) => Popped::Int(int),
            None => unreachable!("terminal segment is never empty"),
        };
        self.del_at(id, offset);
        Some(popped)
    }

    /// Moves the tail element to the head. No-ops on lists with fewer
    /// than two elements.
    pub fn rotate(&mut self) {
        if self.count <= 1 {
            return;
        }
        let Some(tail) = self.tail else { return };
        let offset = self.arena.seg(tail).entries() - 1;
        let value = match self.arena.seg(tail).packed().get(offset) {
            Some(found) => Value::from_packed(found),
            None => unreachable!("terminal segment is never empty"),
        };
        self.del_at(tail, offset);
        let bytes = value.into_bytes();
        self.push_head(&bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(list: &mut PackList) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        for i in 0..list.count() as i64 {
            out.push(list.get(i).unwrap().into_bytes());
        }
        out
    }

    fn list_of(fill: i16, values: &[&[u8]]) -> PackList {
        let mut list = PackList::with_options(fill, 0);
        for v in values {
            list.push_tail(v);
        }
        list
    }

    #[test]
    fn del_range_middle_element() {
        let mut list = list_of(2, &[&b"1"[..], b"2", b"3"]);
        assert!(list.del_range(1, 1));
        assert_eq!(list.count(), 2);
        assert_eq!(contents(&mut list), vec![b"1".to_vec(), b"3".to_vec()]);
        list.assert_invariants();
    }

    #[test]
    fn del_range_spans_segments() {
        let mut list = list_of(2, &[&b"a"[..], b"b", b"c", b"d", b"e", b"f", b"g"]);
        assert_eq!(list.segment_count(), 4);
        // Covers the back half of segment one, all of segments two and
        // three, and the head of segment four.
        assert!(list.del_range(1, 5));
        assert_eq!(list.count(), 2);
        assert_eq!(contents(&mut list), vec![b"a".to_vec(), b"g".to_vec()]);
        list.assert_invariants();
    }

    #[test]
    fn del_range_negative_and_clamped() {
        let mut list = list_of(3, &[&b"a"[..], b"b", b"c", b"d"]);
        // stop beyond the end clamps to the last element.
        assert!(list.del_range(-2, 99));
        assert_eq!(contents(&mut list), vec![b"a".to_vec(), b"b".to_vec()]);
        list.assert_invariants();
    }

    #[test]
    fn del_range_rejects_bad_ranges() {
        let mut list = list_of(3, &[&b"a"[..], b"b"]);
        assert!(!list.del_range(1, 0));
        assert!(!list.del_range(2, 5));
        assert!(!list.del_range(-9, -8));
        assert_eq!(list.count(), 2);

        let mut empty = PackList::new();
        assert!(!empty.del_range(0, 0));
    }

    #[test]
    fn del_range_everything() {
        let mut list = list_of(2, &[&b"a"[..], b"b", b"c", b"d", b"e"]);
        assert!(list.del_range(0, -1));
        assert!(list.is_empty());
        assert_eq!(list.segment_count(), 0);
        list.assert_invariants();
    }

    #[test]
    fn replace_in_place() {
        let mut list = list_of(3, &[&b"a"[..], b"b", b"c"]);
        assert!(list.replace_at_index(1, b"B"));
        assert_eq!(
            contents(&mut list),
            vec![b"a".to_vec(), b"B".to_vec(), b"c".to_vec()]
        );
        assert_eq!(list.count(), 3);
        list.assert_invariants();
    }

    #[test]
    fn replace_negative_index() {
        let mut list = list_of(3, &[&b"a"[..], b"b", b"c"]);
        assert!(list.replace_at_index(-1, b"Z"));
        assert_eq!(
            contents(&mut list),
            vec![b"a".to_vec(), b"b".to_vec(), b"Z".to_vec()]
        );
    }

    #[test]
    fn replace_out_of_bounds() {
        let mut list = list_of(3, &[&b"a"[..]]);
        assert!(!list.replace_at_index(1, b"x"));
        assert!(!list.replace_at_index(-2, b"x"));
        assert_eq!(list.count(), 1);
    }

    #[test]
    fn replace_with_oversized_value_respects_policy() {
        // Size-class fill: 4KB segments.
        let mut list = PackList::with_options(-1, 0);
        for i in 0..8 {
            list.push_tail(vec![b'a' + i; 900].as_slice());
        }
        let before = list.count();
        // A 3KB replacement cannot stay in a segment already near 4KB.
        assert!(list.replace_at_index(2, &[b'z'; 3000]));
        assert_eq!(list.count(), before);
        assert!(list.get(2).unwrap().matches(&[b'z'; 3000]));
        list.assert_invariants();
    }

    #[test]
    fn pop_both_ends() {
        let mut list = list_of(2, &[&b"a"[..], b"b", b"c"]);
        assert_eq!(list.pop(End::Head), Some(Value::Bytes(b"a".to_vec())));
        assert_eq!(list.pop(End::Tail), Some(Value::Bytes(b"c".to_vec())));
        assert_eq!(list.pop(End::Tail), Some(Value::Bytes(b"b".to_vec())));
        assert_eq!(list.pop(End::Head), None);
        list.assert_invariants();
    }

    #[test]
    fn pop_decodes_integers() {
        let mut list = list_of(2, &[&b"10"[..], b"x"]);
        assert_eq!(list.pop(End::Head), Some(Value::Int(10)));
    }

    #[test]
    fn pop_custom_saver_sees_bytes() {
        let mut list = list_of(2, &[&b"hello"[..], b"7"]);
        let popped = list.pop_custom(End::Head, |b| b.len());
        assert_eq!(popped, Some(Popped::Bytes(5)));
        // Integers bypass the saver.
        let popped: Option<Popped<usize>> =
            list.pop_custom(End::Head, |_| unreachable!("saver called for integer"));
        assert_eq!(popped, Some(Popped::Int(7)));
    }

    #[test]
    fn rotate_moves_tail_to_head() {
        let mut list = list_of(2, &[&b"1"[..], b"2", b"3"]);
        list.rotate();
        assert_eq!(
            contents(&mut list),
            vec![b"3".to_vec(), b"1".to_vec(), b"2".to_vec()]
        );
        list.assert_invariants();
    }

    #[test]
    fn rotate_single_segment_and_single_element() {
        let mut list = list_of(10, &[&b"a"[..], b"b"]);
        list.rotate();
        assert_eq!(contents(&mut list), vec![b"b".to_vec(), b"a".to_vec()]);

        let mut single = list_of(10, &[&b"only"[..]]);
        single.rotate();
        assert_eq!(contents(&mut single), vec![b"only".to_vec()]);

        let mut empty = PackList::new();
        empty.rotate();
        assert!(empty.is_empty());
    }
}
