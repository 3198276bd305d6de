//! Ordered list of segments a run steps through.
//!
//! The store only holds data. Whether it may be edited (the timer must not
//! be running) is decided by the owner of both the store and the engine,
//! see [`crate::session::Session`].

use serde::{Deserialize, Serialize};

use super::segment::Segment;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutineStore {
    segments: Vec<Segment>,
}

impl RoutineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Sum of every segment's duration in seconds.
    pub fn total_secs(&self) -> u64 {
        self.segments.iter().map(Segment::duration_secs).sum()
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Returns the removed segment, or `None` when `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Option<Segment> {
        if index >= self.segments.len() {
            return None;
        }
        Some(self.segments.remove(index))
    }

    /// Returns `false` if there was nothing to clear.
    pub fn clear(&mut self) -> bool {
        if self.segments.is_empty() {
            return false;
        }
        self.segments.clear();
        true
    }
}

impl<'a> IntoIterator for &'a RoutineStore {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routine::SegmentKind;

    fn seg(kind: SegmentKind, minutes: i64) -> Segment {
        Segment::new(kind, minutes).unwrap()
    }

    #[test]
    fn push_keeps_order() {
        let mut store = RoutineStore::new();
        store.push(seg(SegmentKind::Study, 50));
        store.push(seg(SegmentKind::Break, 10));
        assert_eq!(store.len(), 2);
        assert_eq!(store.first().unwrap().kind(), SegmentKind::Study);
        assert_eq!(store.get(1).unwrap().minutes(), 10);
        assert_eq!(store.total_secs(), 3600);
    }

    #[test]
    fn remove_out_of_bounds_is_none() {
        let mut store = RoutineStore::from_segments(vec![seg(SegmentKind::Study, 5)]);
        assert!(store.remove_at(3).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove_at(0).unwrap().minutes(), 5);
        assert!(store.is_empty());
    }

    #[test]
    fn clear_reports_whether_anything_was_removed() {
        let mut store = RoutineStore::new();
        assert!(!store.clear());
        store.push(seg(SegmentKind::Break, 1));
        assert!(store.clear());
        assert!(store.is_empty());
    }
}
