//! Chain segments: one packed buffer plus its metadata.

use crate::arena::SegmentId;
use crate::config::MIN_COMPRESS_BYTES;
use packlist_codec::PackedArray;

/// The segment's buffer in either of its two encodings.
#[derive(Debug, Clone)]
pub(crate) enum SegmentBuffer {
    /// Uncompressed packed array.
    Raw(PackedArray),
    /// LZ-compressed rendition of the packed array's buffer. The
    /// uncompressed size lives in the segment's `byte_size`.
    Compressed(Vec<u8>),
}

/// Physical representation of a segment's contents.
///
/// `None` is reserved for a future single-value representation and is
/// never produced by any current operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Container {
    #[allow(dead_code)]
    None,
    Packed,
}

/// One node of the segment chain.
#[derive(Debug, Clone)]
pub(crate) struct Segment {
    pub(crate) prev: Option<SegmentId>,
    pub(crate) next: Option<SegmentId>,
    buffer: SegmentBuffer,
    /// Uncompressed buffer size, maintained in both encodings.
    byte_size: usize,
    entry_count: u16,
    container: Container,
    /// Set while a cursor holds this segment temporarily decompressed.
    pub(crate) recompress: bool,
    /// Set when a compression attempt failed to shrink the buffer;
    /// cleared whenever the content changes.
    attempted_compress: bool,
}

impl Segment {
    /// Creates an empty segment.
    pub(crate) fn new() -> Self {
        Self::from_packed(PackedArray::new())
    }

    /// Creates a segment owning `array`.
    pub(crate) fn from_packed(array: PackedArray) -> Self {
        let byte_size = array.byte_size();
        let entry_count = array.len() as u16;
        Self {
            prev: None,
            next: None,
            buffer: SegmentBuffer::Raw(array),
            byte_size,
            entry_count,
            container: Container::Packed,
            recompress: false,
            attempted_compress: false,
        }
    }

    pub(crate) fn is_compressed(&self) -> bool {
        matches!(self.buffer, SegmentBuffer::Compressed(_))
    }

    pub(crate) fn is_packed_container(&self) -> bool {
        self.container == Container::Packed
    }

    /// Uncompressed buffer size in bytes.
    pub(crate) fn byte_size(&self) -> usize {
        self.byte_size
    }

    /// Number of entries in this segment.
    pub(crate) fn entries(&self) -> usize {
        usize::from(self.entry_count)
    }

    /// Borrows the packed array.
    ///
    /// # Panics
    ///
    /// Panics when the segment is compressed; callers decompress first.
    pub(crate) fn packed(&self) -> &PackedArray {
        match &self.buffer {
            SegmentBuffer::Raw(array) => array,
            SegmentBuffer::Compressed(_) => panic!("segment buffer accessed while compressed"),
        }
    }

    /// Mutably borrows the packed array.
    ///
    /// # Panics
    ///
    /// Panics when the segment is compressed; callers decompress first.
    pub(crate) fn packed_mut(&mut self) -> &mut PackedArray {
        match &mut self.buffer {
            SegmentBuffer::Raw(array) => array,
            SegmentBuffer::Compressed(_) => panic!("segment buffer accessed while compressed"),
        }
    }

    /// Consumes the segment, returning its packed array.
    ///
    /// # Panics
    ///
    /// Panics when the segment is compressed.
    pub(crate) fn into_packed(self) -> PackedArray {
        match self.buffer {
            SegmentBuffer::Raw(array) => array,
            SegmentBuffer::Compressed(_) => panic!("segment buffer taken while compressed"),
        }
    }

    /// The raw compressed blob, or `None` while uncompressed.
    pub(crate) fn compressed_bytes(&self) -> Option<&[u8]> {
        match &self.buffer {
            SegmentBuffer::Raw(_) => None,
            SegmentBuffer::Compressed(blob) => Some(blob),
        }
    }

    /// Refreshes `byte_size`/`entry_count` after a packed array mutation.
    pub(crate) fn sync_stats(&mut self) {
        let (byte_size, entry_count) = {
            let array = self.packed();
            (array.byte_size(), array.len() as u16)
        };
        self.byte_size = byte_size;
        self.entry_count = entry_count;
        // Content changed: a previously rejected compression may now win.
        self.attempted_compress = false;
    }

    /// Attempts to compress the buffer. Returns true when the segment
    /// ends (or already was) compressed. Buffers below the minimum
    /// worthwhile size, and buffers that already failed to shrink, are
    /// left raw.
    pub(crate) fn try_compress(&mut self) -> bool {
        self.recompress = false;
        let array = match &self.buffer {
            SegmentBuffer::Compressed(_) => return true,
            SegmentBuffer::Raw(array) => array,
        };
        if self.byte_size < MIN_COMPRESS_BYTES || self.attempted_compress {
            return false;
        }
        match packlist_compress::compress(array.as_bytes()) {
            Some(blob) => {
                self.buffer = SegmentBuffer::Compressed(blob);
                true
            }
            None => {
                self.attempted_compress = true;
                false
            }
        }
    }

    /// Restores the raw encoding, clearing any pending recompression.
    pub(crate) fn decompress(&mut self) {
        self.recompress = false;
        let SegmentBuffer::Compressed(blob) = &self.buffer else {
            return;
        };
        let raw = match packlist_compress::decompress(blob, self.byte_size) {
            Ok(bytes) => bytes,
            Err(err) => panic!("segment blob failed to decompress: {err}"),
        };
        self.buffer = SegmentBuffer::Raw(PackedArray::from_raw_bytes(raw));
    }

    /// Decompresses for a temporary access, remembering that the segment
    /// must be recompressed when the access scope ends.
    pub(crate) fn ensure_raw_for_use(&mut self) {
        if self.is_compressed() {
            self.decompress();
            self.recompress = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulky_segment() -> Segment {
        let mut array = PackedArray::new();
        for _ in 0..64 {
            array.push_tail(b"repetitive payload, highly compressible");
        }
        Segment::from_packed(array)
    }

    #[test]
    fn compress_roundtrip_preserves_stats() {
        let mut segment = bulky_segment();
        let bytes = segment.byte_size();
        let entries = segment.entries();

        assert!(segment.try_compress());
        assert!(segment.is_compressed());
        assert_eq!(segment.byte_size(), bytes);
        assert_eq!(segment.entries(), entries);

        segment.decompress();
        assert!(!segment.is_compressed());
        assert_eq!(segment.packed().len(), entries);
        assert_eq!(segment.packed().byte_size(), bytes);
    }

    #[test]
    fn tiny_segment_never_compresses() {
        let mut array = PackedArray::new();
        array.push_tail(b"x");
        let mut segment = Segment::from_packed(array);
        assert!(!segment.try_compress());
        assert!(!segment.is_compressed());
    }

    #[test]
    fn failed_attempt_is_not_retried_until_content_changes() {
        let mut array = PackedArray::new();
        // Large enough to attempt, random enough to reject.
        let noise: Vec<u8> = (0..200u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
        array.push_tail(&noise);
        let mut segment = Segment::from_packed(array);

        assert!(!segment.try_compress());
        assert!(!segment.try_compress());

        // A mutation clears the rejection and allows another attempt.
        segment.packed_mut().push_tail(&[b'a'; 300]);
        segment.sync_stats();
        assert!(segment.try_compress());
    }

    #[test]
    fn ensure_raw_for_use_marks_recompress() {
        let mut segment = bulky_segment();
        assert!(segment.try_compress());

        segment.ensure_raw_for_use();
        assert!(!segment.is_compressed());
        assert!(segment.recompress);

        // Raw segments are untouched.
        let mut raw = bulky_segment();
        raw.ensure_raw_for_use();
        assert!(!raw.recompress);
    }
}
