//! Named, non-owning references to segments.
//!
//! Bookmarks let long-lived operations resume iteration over a large list
//! in portions without holding a cursor across calls. They are only worth
//! using on lists with many segments; every segment removal pays a scan of
//! the bookmark table, so the table is kept small.

use crate::arena::SegmentId;
use crate::config::BOOKMARK_CAPACITY;
use crate::list::PackList;

/// One (name, segment) association.
#[derive(Debug, Clone)]
pub(crate) struct Bookmark {
    pub(crate) name: String,
    pub(crate) segment: SegmentId,
}

impl PackList {
    /// Adds or overwrites a named reference to `segment`.
    ///
    /// Returns `false` when `segment` is not part of this list, or when
    /// the table already holds [`BOOKMARK_CAPACITY`] names and `name` is
    /// not among them.
    pub fn bookmark_create(&mut self, name: &str, segment: SegmentId) -> bool {
        if !self.arena.contains(segment) {
            return false;
        }
        if let Some(bookmark) = self.bookmarks.iter_mut().find(|b| b.name == name) {
            bookmark.segment = segment;
            return true;
        }
        if self.bookmarks.len() >= BOOKMARK_CAPACITY {
            return false;
        }
        self.bookmarks.push(Bookmark {
            name: name.to_owned(),
            segment,
        });
        true
    }

    /// Returns the segment a bookmark refers to, or `None` for an unknown
    /// name.
    #[must_use]
    pub fn bookmark_find(&self, name: &str) -> Option<SegmentId> {
        self.bookmarks
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.segment)
    }

    /// Removes one bookmark by name, reporting whether it existed.
    pub fn bookmark_delete(&mut self, name: &str) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b.name != name);
        self.bookmarks.len() != before
    }

    /// Removes every bookmark.
    pub fn bookmarks_clear(&mut self) {
        self.bookmarks.clear();
    }

    /// Re-points bookmarks on a segment being unlinked to its successor,
    /// evicting them when the segment was the tail.
    pub(crate) fn reconcile_bookmarks(&mut self, removed: SegmentId, next: Option<SegmentId>) {
        match next {
            Some(next) => {
                for bookmark in &mut self.bookmarks {
                    if bookmark.segment == removed {
                        bookmark.segment = next;
                    }
                }
            }
            None => self.bookmarks.retain(|b| b.segment != removed),
        }
    }
}
