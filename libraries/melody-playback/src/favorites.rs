//! Liked-track set

use melody_core::TrackId;
use std::collections::HashSet;

/// Set of liked track identities
#[derive(Debug, Clone, Default)]
pub struct Favorites {
    liked: HashSet<TrackId>,
}

impl Favorites {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set
    pub fn replace(&mut self, ids: impl IntoIterator<Item = TrackId>) {
        self.liked = ids.into_iter().collect();
    }

    /// Whether `id` is liked
    pub fn contains(&self, id: TrackId) -> bool {
        self.liked.contains(&id)
    }

    /// Set the flag for `id`, returning the previous flag
    pub fn set(&mut self, id: TrackId, liked: bool) -> bool {
        if liked {
            !self.liked.insert(id)
        } else {
            self.liked.remove(&id)
        }
    }

    /// Number of liked tracks
    pub fn len(&self) -> usize {
        self.liked.len()
    }

    /// Whether nothing is liked
    pub fn is_empty(&self) -> bool {
        self.liked.is_empty()
    }
}
