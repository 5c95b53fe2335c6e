//! Download queue shown to the user while tracks are being prepared
//!
//! Most recent first, one entry per identity. Entries are removed only by an
//! explicit clear.

use melody_core::{TrackDescriptor, TrackId};
use std::collections::VecDeque;

/// Tracks the backend has been asked to prepare
#[derive(Debug, Clone, Default)]
pub struct DownloadQueue {
    entries: VecDeque<TrackDescriptor>,
}

impl DownloadQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track at the front; returns `false` if it was already queued
    pub fn push(&mut self, track: TrackDescriptor) -> bool {
        if self.contains(track.id) {
            return false;
        }
        self.entries.push_front(track);
        true
    }

    /// Whether `id` is queued
    pub fn contains(&self, id: TrackId) -> bool {
        self.entries.iter().any(|t| t.id == id)
    }

    /// Entries, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &TrackDescriptor> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry, returning how many were removed
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: i64) -> TrackDescriptor {
        TrackDescriptor::new(TrackId::new(id), format!("Track {id}"), "Artist")
    }

    #[test]
    fn newest_first_without_duplicates() {
        let mut queue = DownloadQueue::new();

        assert!(queue.push(track(1)));
        assert!(queue.push(track(2)));
        assert!(!queue.push(track(1)));

        let ids: Vec<i64> = queue.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn clear_reports_count() {
        let mut queue = DownloadQueue::new();
        queue.push(track(1));
        queue.push(track(2));

        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
        assert!(!queue.contains(TrackId::new(1)));
    }
}
