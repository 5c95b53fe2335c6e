//! Pending-state registry
//!
//! Maps a track identity to its in-flight acquisition. The presence of an
//! entry is the only signal that a retry timer may still fire for that
//! identity; removing or replacing an entry cancels its token so a
//! scheduled retry never outlives it.

use melody_core::TrackId;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// In-flight acquisition of one track
#[derive(Debug, Clone)]
pub struct PendingEntry {
    /// End of the wait budget
    pub deadline: Instant,

    /// Wait budget the progress ring is drawn against
    pub total_wait: Duration,

    /// Backend reported the track ready; cleanup is scheduled
    pub completed: bool,

    /// Re-polls issued so far
    pub polls: u32,

    generation: u64,
    token: CancellationToken,
}

impl PendingEntry {
    /// Start a new entry whose budget runs from `now`
    pub fn new(now: Instant, total_wait: Duration) -> Self {
        Self {
            deadline: now + total_wait,
            total_wait,
            completed: false,
            polls: 0,
            generation: 0,
            token: CancellationToken::new(),
        }
    }

    /// Generation stamped by the registry
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Token cancelled when the entry leaves the registry
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Time left until the deadline
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Fraction of the wait budget elapsed, `1.0` once completed
    pub fn progress(&self, now: Instant) -> f32 {
        if self.completed || self.total_wait.is_zero() {
            return 1.0;
        }
        let remaining = self.remaining(now).as_secs_f32();
        (1.0 - remaining / self.total_wait.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Track identity to in-flight acquisition
#[derive(Debug, Default)]
pub struct PendingRegistry {
    entries: HashMap<TrackId, PendingEntry>,
    next_generation: u64,
}

impl PendingRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `id`, returning its generation
    ///
    /// A replaced entry has its token cancelled.
    pub fn set(&mut self, id: TrackId, mut entry: PendingEntry) -> u64 {
        self.next_generation += 1;
        entry.generation = self.next_generation;
        if let Some(old) = self.entries.insert(id, entry) {
            old.token.cancel();
        }
        self.next_generation
    }

    /// Entry for `id`
    pub fn get(&self, id: TrackId) -> Option<&PendingEntry> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TrackId) -> Option<&mut PendingEntry> {
        self.entries.get_mut(&id)
    }

    /// Whether `id` has an in-flight acquisition
    pub fn contains(&self, id: TrackId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Whether `generation` is still the live entry for `id`
    pub fn is_current(&self, id: TrackId, generation: u64) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|entry| entry.generation == generation)
    }

    /// Remove the entry for `id` and cancel its timer
    pub fn clear(&mut self, id: TrackId) -> Option<PendingEntry> {
        let entry = self.entries.remove(&id)?;
        entry.token.cancel();
        Some(entry)
    }

    /// Remove every entry and cancel every timer
    pub fn clear_all(&mut self) -> usize {
        let count = self.entries.len();
        for (_, entry) in self.entries.drain() {
            entry.token.cancel();
        }
        count
    }

    /// Flag the entry for `id` as completed
    pub fn mark_completed(&mut self, id: TrackId) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.completed = true;
                true
            }
            None => false,
        }
    }

    /// Progress fraction for `id`
    pub fn progress(&self, id: TrackId, now: Instant) -> Option<f32> {
        self.entries.get(&id).map(|entry| entry.progress(now))
    }

    /// Snapshot of all entries
    pub fn iter(&self) -> impl Iterator<Item = (TrackId, &PendingEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no acquisition is in flight
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
