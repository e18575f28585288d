//! Per-document, per-section record of accepted spans.

use serde::{Deserialize, Serialize};

use crate::domain::Section;

/// How a candidate collides with an accepted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlap {
    /// Same `[start, end)` as an accepted span
    Duplicate,
    /// The candidate covers the accepted span's start
    Head,
    /// The candidate covers the accepted span's end
    Tail,
    /// The candidate lies inside the accepted span
    Body,
}

/// A collision with the accepted span it was found against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub kind: Overlap,
    pub start: usize,
    pub end: usize,
}

/// Half-open character ranges accepted so far, in insertion order.
///
/// Only accepted spans are recorded; a rejected candidate never blocks a
/// later one. Call [`OverlapTracker::clear`] when the document changes.
#[derive(Debug, Clone, Default)]
pub struct OverlapTracker {
    title: Vec<(usize, usize)>,
    abstract_text: Vec<(usize, usize)>,
}

impl OverlapTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn ranges(&self, section: Section) -> &[(usize, usize)] {
        match section {
            Section::Title => &self.title,
            Section::Abstract => &self.abstract_text,
        }
    }

    /// First accepted span in `section` that `[start, end)` collides with.
    ///
    /// Ranges are checked in insertion order, and for each range the rules
    /// are tried in the order duplicate, head, tail, body. Touching
    /// boundaries count as a collision.
    pub fn find_collision(&self, section: Section, start: usize, end: usize) -> Option<Collision> {
        self.ranges(section).iter().find_map(|&(s, e)| {
            let kind = if start == s && end == e {
                Overlap::Duplicate
            } else if start <= s && end >= s {
                Overlap::Head
            } else if start <= e && end >= e {
                Overlap::Tail
            } else if start >= s && end <= e {
                Overlap::Body
            } else {
                return None;
            };
            Some(Collision {
                kind,
                start: s,
                end: e,
            })
        })
    }

    pub fn record(&mut self, section: Section, start: usize, end: usize) {
        match section {
            Section::Title => self.title.push((start, end)),
            Section::Abstract => self.abstract_text.push((start, end)),
        }
    }

    /// Total number of accepted spans across both sections.
    pub fn len(&self) -> usize {
        self.title.len() + self.abstract_text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.abstract_text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with(section: Section, start: usize, end: usize) -> OverlapTracker {
        let mut tracker = OverlapTracker::new();
        tracker.record(section, start, end);
        tracker
    }

    fn kind(tracker: &OverlapTracker, start: usize, end: usize) -> Option<Overlap> {
        tracker
            .find_collision(Section::Title, start, end)
            .map(|c| c.kind)
    }

    #[test]
    fn test_classification() {
        let tracker = tracker_with(Section::Title, 10, 20);
        assert_eq!(kind(&tracker, 10, 20), Some(Overlap::Duplicate));
        assert_eq!(kind(&tracker, 5, 12), Some(Overlap::Head));
        assert_eq!(kind(&tracker, 5, 25), Some(Overlap::Head));
        assert_eq!(kind(&tracker, 15, 25), Some(Overlap::Tail));
        assert_eq!(kind(&tracker, 12, 18), Some(Overlap::Body));
        assert_eq!(kind(&tracker, 0, 5), None);
        assert_eq!(kind(&tracker, 21, 30), None);
    }

    #[test]
    fn test_touching_boundaries_collide() {
        let tracker = tracker_with(Section::Title, 10, 20);
        assert_eq!(kind(&tracker, 5, 10), Some(Overlap::Head));
        assert_eq!(kind(&tracker, 20, 25), Some(Overlap::Tail));
    }

    #[test]
    fn test_same_start_prefers_head_over_body() {
        let tracker = tracker_with(Section::Title, 10, 20);
        assert_eq!(kind(&tracker, 10, 15), Some(Overlap::Head));
        assert_eq!(kind(&tracker, 15, 20), Some(Overlap::Tail));
    }

    #[test]
    fn test_first_range_in_insertion_order_wins() {
        let mut tracker = OverlapTracker::new();
        tracker.record(Section::Title, 30, 40);
        tracker.record(Section::Title, 10, 20);
        let collision = tracker.find_collision(Section::Title, 15, 35).unwrap();
        assert_eq!((collision.start, collision.end), (30, 40));
        assert_eq!(collision.kind, Overlap::Head);
    }

    #[test]
    fn test_sections_are_independent() {
        let tracker = tracker_with(Section::Title, 10, 20);
        assert!(tracker.find_collision(Section::Abstract, 10, 20).is_none());
    }

    #[test]
    fn test_clear() {
        let mut tracker = tracker_with(Section::Abstract, 1, 2);
        assert_eq!(tracker.len(), 1);
        tracker.clear();
        assert!(tracker.is_empty());
        assert!(tracker.find_collision(Section::Abstract, 1, 2).is_none());
    }
}
