//! The user's library in display order, used for next/previous navigation

use melody_core::{TrackDescriptor, TrackId};
use rand::Rng;

/// Ordered list of the user's tracks
#[derive(Debug, Clone, Default)]
pub struct Library {
    tracks: Vec<TrackDescriptor>,
}

impl Library {
    /// Create a library from tracks in display order
    pub fn new(tracks: Vec<TrackDescriptor>) -> Self {
        Self { tracks }
    }

    /// Replace every track
    pub fn replace(&mut self, tracks: Vec<TrackDescriptor>) {
        self.tracks = tracks;
    }

    /// Remove every track
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Tracks in display order
    pub fn tracks(&self) -> &[TrackDescriptor] {
        &self.tracks
    }

    /// Track with the given identity
    pub fn get(&self, id: TrackId) -> Option<&TrackDescriptor> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Index of the track with the given identity
    pub fn position(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Track after `id`; `None` at the end or when `id` is not in the library
    pub fn successor(&self, id: TrackId) -> Option<&TrackDescriptor> {
        let index = self.position(id)?;
        self.tracks.get(index + 1)
    }

    /// Track before `id`, wrapping to the last entry
    ///
    /// An identity missing from the library also yields the last entry.
    pub fn predecessor(&self, id: TrackId) -> Option<&TrackDescriptor> {
        match self.position(id) {
            Some(index) if index > 0 => self.tracks.get(index - 1),
            _ => self.tracks.last(),
        }
    }

    /// First track
    pub fn first(&self) -> Option<&TrackDescriptor> {
        self.tracks.first()
    }

    /// Uniformly random track
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&TrackDescriptor> {
        if self.tracks.is_empty() {
            return None;
        }
        self.tracks.get(rng.gen_range(0..self.tracks.len()))
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
