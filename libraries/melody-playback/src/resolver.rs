//! Track resolver
//!
//! Asks the backend whether a track is playable. When it is not, the track
//! is registered as pending, placed in the download queue and re-polled on
//! a fixed schedule until it is ready, fails, or runs out of budget.
//!
//! Timers never touch state themselves: each one is a task racing a sleep
//! against the pending entry's cancellation token, and on expiry it posts a
//! [`CoordinatorMessage`] that the coordinator handles on its own turn.

use crate::downloads::DownloadQueue;
use crate::pending::{PendingEntry, PendingRegistry};
use crate::types::{Acquisition, Attempt, PlaybackConfig};
use melody_core::{MusicApi, PlayableTrack, PlaybackOutcome, TrackDescriptor, TrackId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Reason recorded when the retry budget runs out
pub const TIMED_OUT: &str = "timed out";

/// Message posted by an expired timer
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatorMessage {
    /// Re-poll a deferred track
    Retry {
        /// Track to re-poll
        track: TrackDescriptor,
        /// Pending generation the timer belongs to
        generation: u64,
    },

    /// Remove the pending entry of a completed track
    Settle {
        /// Completed track
        id: TrackId,
        /// Pending generation the timer belongs to
        generation: u64,
    },
}

impl CoordinatorMessage {
    /// Track the message refers to
    pub fn track_id(&self) -> TrackId {
        match self {
            Self::Retry { track, .. } => track.id,
            Self::Settle { id, .. } => *id,
        }
    }

    /// Pending generation the message was scheduled for
    pub fn generation(&self) -> u64 {
        match self {
            Self::Retry { generation, .. } | Self::Settle { generation, .. } => *generation,
        }
    }
}

/// Result of one resolution attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Playable now; the caller starts playback
    Play(PlayableTrack),

    /// Backend is still preparing the track; a retry is scheduled
    Deferred {
        /// Whether this attempt added the track to the download queue
        queued: bool,
    },

    /// A re-poll found the track ready; cleanup is scheduled
    Completed,

    /// Resolution gave up
    Failed(String),

    /// Another acquisition of the same track is in flight
    Skipped,
}

/// Resolves tracks against the backend and owns their pending state
pub struct TrackResolver {
    api: Arc<dyn MusicApi>,
    config: PlaybackConfig,
    registry: PendingRegistry,
    downloads: DownloadQueue,
    acquisitions: HashMap<TrackId, Acquisition>,
    outbox: mpsc::UnboundedSender<CoordinatorMessage>,
}

impl TrackResolver {
    /// Create a resolver posting timer messages to `outbox`
    pub fn new(
        api: Arc<dyn MusicApi>,
        config: PlaybackConfig,
        outbox: mpsc::UnboundedSender<CoordinatorMessage>,
    ) -> Self {
        Self {
            api,
            config,
            registry: PendingRegistry::new(),
            downloads: DownloadQueue::new(),
            acquisitions: HashMap::new(),
            outbox,
        }
    }

    /// Pending-state registry
    pub fn registry(&self) -> &PendingRegistry {
        &self.registry
    }

    /// Download queue
    pub fn downloads(&self) -> &DownloadQueue {
        &self.downloads
    }

    /// Acquisition status of `id`
    pub fn acquisition(&self, id: TrackId) -> Acquisition {
        self.acquisitions.get(&id).cloned().unwrap_or_default()
    }

    /// Whether a timer message still belongs to the live entry
    pub fn is_current(&self, message: &CoordinatorMessage) -> bool {
        self.registry
            .is_current(message.track_id(), message.generation())
    }

    /// Issue exactly one playback request for `track`
    ///
    /// # Arguments
    /// * `track` - Track to acquire
    /// * `attempt` - `First` for a user request, `Retry` for a scheduled re-poll
    pub async fn resolve(&mut self, track: &TrackDescriptor, attempt: Attempt) -> Resolution {
        let id = track.id;

        if attempt == Attempt::First && self.registry.contains(id) {
            debug!(track_id = %id, "Acquisition already in flight");
            return Resolution::Skipped;
        }

        debug!(track_id = %id, ?attempt, "Requesting playback");
        let outcome = self.api.request_playback(track).await;

        match (outcome, attempt) {
            (Ok(PlaybackOutcome::Ready { media_locator, handle }), Attempt::First) => {
                self.registry.clear(id);
                self.acquisitions.insert(
                    id,
                    Acquisition::Ready {
                        locator: media_locator.clone(),
                    },
                );
                info!(track_id = %id, "Track ready");
                Resolution::Play(PlayableTrack::new(track.clone(), media_locator, handle))
            }
            (Ok(PlaybackOutcome::Ready { media_locator, .. }), Attempt::Retry) => {
                self.complete(id, media_locator)
            }
            (Ok(PlaybackOutcome::Accepted), Attempt::First) => self.defer(track),
            (Ok(PlaybackOutcome::Accepted), Attempt::Retry) => self.reschedule(track),
            (Err(e), _) => {
                warn!(track_id = %id, error = %e, "Playback request failed");
                self.fail(id, e.to_string())
            }
        }
    }

    /// Take the next re-poll for a due retry message
    ///
    /// Returns `None` when the message is stale.
    pub async fn poll(&mut self, track: &TrackDescriptor, generation: u64) -> Option<Resolution> {
        let entry = self.registry.get_mut(track.id)?;
        if entry.generation() != generation || entry.completed {
            return None;
        }
        entry.polls += 1;
        Some(self.resolve(track, Attempt::Retry).await)
    }

    /// Drop the pending entry of a completed track
    ///
    /// Returns `false` when the message is stale.
    pub fn settle(&mut self, id: TrackId, generation: u64) -> bool {
        if !self.registry.is_current(id, generation) {
            return false;
        }
        self.registry.clear(id);
        debug!(track_id = %id, "Pending entry settled");
        true
    }

    /// Forget a pending acquisition and cancel its timer
    pub fn cancel(&mut self, id: TrackId) -> bool {
        let cleared = self.registry.clear(id).is_some();
        if cleared && self.acquisition(id).is_resolving() {
            self.acquisitions.remove(&id);
        }
        cleared
    }

    /// Clear the download queue and cancel every pending timer
    pub fn clear_downloads(&mut self) -> usize {
        let cancelled = self.registry.clear_all();
        self.acquisitions.retain(|_, state| !state.is_resolving());
        let removed = self.downloads.clear();
        info!(removed, cancelled, "Download queue cleared");
        removed
    }

    fn defer(&mut self, track: &TrackDescriptor) -> Resolution {
        let id = track.id;
        let queued = self.downloads.push(track.clone());

        if self.registry.contains(id) {
            return Resolution::Deferred { queued };
        }
        if self.config.max_retries == 0 {
            info!(track_id = %id, "No retries allowed, giving up");
            return self.fail(id, TIMED_OUT.to_string());
        }

        let entry = PendingEntry::new(Instant::now(), self.config.wait_budget);
        let deadline = entry.deadline;
        let token = entry.token().clone();
        let generation = self.registry.set(id, entry);
        self.acquisitions
            .insert(id, Acquisition::Resolving { deadline });

        info!(track_id = %id, "Track queued for download");
        self.schedule(
            self.config.retry_interval,
            token,
            CoordinatorMessage::Retry {
                track: track.clone(),
                generation,
            },
        );
        Resolution::Deferred { queued }
    }

    fn reschedule(&mut self, track: &TrackDescriptor) -> Resolution {
        let id = track.id;
        let Some(entry) = self.registry.get(id) else {
            return Resolution::Skipped;
        };

        if entry.polls >= self.config.max_retries {
            info!(track_id = %id, polls = entry.polls, "Retry budget exhausted");
            return self.fail(id, TIMED_OUT.to_string());
        }

        let token = entry.token().clone();
        let generation = entry.generation();
        debug!(track_id = %id, polls = entry.polls, "Still processing, retrying later");
        self.schedule(
            self.config.retry_interval,
            token,
            CoordinatorMessage::Retry {
                track: track.clone(),
                generation,
            },
        );
        Resolution::Deferred { queued: false }
    }

    fn complete(&mut self, id: TrackId, locator: String) -> Resolution {
        self.acquisitions
            .insert(id, Acquisition::Ready { locator });

        if !self.registry.mark_completed(id) {
            return Resolution::Completed;
        }
        if let Some(entry) = self.registry.get(id) {
            let token = entry.token().clone();
            let generation = entry.generation();
            self.schedule(
                self.config.settle_delay,
                token,
                CoordinatorMessage::Settle { id, generation },
            );
        }
        info!(track_id = %id, "Background download completed");
        Resolution::Completed
    }

    fn fail(&mut self, id: TrackId, reason: String) -> Resolution {
        self.registry.clear(id);
        self.acquisitions.insert(
            id,
            Acquisition::Failed {
                reason: reason.clone(),
            },
        );
        Resolution::Failed(reason)
    }

    fn schedule(&self, delay: Duration, token: CancellationToken, message: CoordinatorMessage) {
        let outbox = self.outbox.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    // Receiver gone means the coordinator was dropped
                    let _ = outbox.send(message);
                }
            }
        });
    }
}
