//! Playback coordinator - core orchestration
//!
//! Owns the current track, play/pause state, shuffle/repeat modes and the
//! audio transport, and drives transitions between tracks. Track requests
//! that are not current are delegated to the [`TrackResolver`].
//!
//! The coordinator is single-threaded: every operation takes `&mut self`,
//! and timer expiries arrive as [`CoordinatorMessage`]s on an inbox the
//! owner drains with [`PlaybackCoordinator::next_message`] or
//! [`PlaybackCoordinator::run_pending`].

use crate::{
    downloads::DownloadQueue,
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    favorites::Favorites,
    library::Library,
    pending::PendingRegistry,
    resolver::{CoordinatorMessage, Resolution, TrackResolver},
    transport::AudioTransport,
    types::{Acquisition, Attempt, PlaybackConfig, PlaybackSession, PlaybackState, RepeatMode},
};
use melody_core::{MusicApi, PlayableTrack, TrackDescriptor, TrackId, UserId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Outcome of a track selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Track was already current; play/pause flipped
    Toggled,

    /// Track is already being acquired; nothing happened
    Ignored,

    /// Track was attached and started
    Playing,

    /// Track is being prepared by the backend
    Downloading,

    /// Resolution failed; the session is unchanged
    Failed,
}

/// Outcome of a next/previous transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Current track restarted from the beginning
    Restarted,

    /// Another track was selected
    Selected(Selection),

    /// End of library reached; playback stopped
    Stopped,

    /// Nothing to navigate (no current track or empty library)
    None,
}

/// Main playback coordinator
pub struct PlaybackCoordinator {
    api: Arc<dyn MusicApi>,
    transport: Box<dyn AudioTransport>,
    resolver: TrackResolver,
    inbox: mpsc::UnboundedReceiver<CoordinatorMessage>,

    session: PlaybackSession,
    library: Library,
    favorites: Favorites,
    user: Option<UserId>,

    config: PlaybackConfig,
    rng: StdRng,

    // Events buffered for the front end
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackCoordinator {
    /// Create a new coordinator
    pub fn new(
        api: Arc<dyn MusicApi>,
        mut transport: Box<dyn AudioTransport>,
        config: PlaybackConfig,
    ) -> Self {
        let (outbox, inbox) = mpsc::unbounded_channel();
        let session = PlaybackSession::new(config.volume);
        transport.set_volume(session.volume);

        Self {
            resolver: TrackResolver::new(Arc::clone(&api), config.clone(), outbox),
            api,
            transport,
            inbox,
            session,
            library: Library::default(),
            favorites: Favorites::new(),
            user: None,
            config,
            rng: StdRng::from_entropy(),
            pending_events: Vec::new(),
        }
    }

    /// Use a deterministic shuffle sequence
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ===== Identity & Library =====

    /// Set the user whose library and likes are used
    pub fn set_user(&mut self, user: UserId) {
        self.user = Some(user);
    }

    /// Current user
    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    /// Reload the library from the backend
    ///
    /// On failure the library and favorites are emptied.
    pub async fn refresh_library(&mut self) -> Result<usize> {
        let user = self.user.ok_or(PlaybackError::NoUser)?;

        match self.api.fetch_library(user).await {
            Ok(tracks) => {
                let count = tracks.len();
                self.set_library(tracks);
                info!(user_id = %user, tracks = count, "Library refreshed");
                Ok(count)
            }
            Err(e) => {
                warn!(user_id = %user, error = %e, "Library fetch failed");
                self.set_library(Vec::new());
                Err(e.into())
            }
        }
    }

    /// Replace the library; every entry counts as liked
    pub fn set_library(&mut self, tracks: Vec<TrackDescriptor>) {
        self.favorites.replace(tracks.iter().map(|t| t.id));
        self.library.replace(tracks);
        self.pending_events.push(PlaybackEvent::LibraryRefreshed {
            tracks: self.library.len(),
        });
    }

    /// The user's library
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Whether `id` is liked
    pub fn is_favorite(&self, id: TrackId) -> bool {
        self.favorites.contains(id)
    }

    /// Like or unlike a track, returning the new flag
    ///
    /// The flag flips immediately; if the backend call fails it is flipped
    /// back and the error returned.
    pub async fn toggle_like(&mut self, track: &TrackDescriptor) -> Result<bool> {
        let user = self.user.ok_or(PlaybackError::NoUser)?;
        let was_liked = self.favorites.contains(track.id);
        let liked = !was_liked;

        self.apply_favorite(track.id, liked);

        let result = if liked {
            self.api.like(user, track).await
        } else {
            self.api.unlike(user, track).await
        };

        if let Err(e) = result {
            warn!(track_id = %track.id, liked, error = %e, "Like update failed, reverting");
            self.apply_favorite(track.id, was_liked);
            return Err(e.into());
        }

        debug!(track_id = %track.id, liked, "Like updated");
        Ok(liked)
    }

    fn apply_favorite(&mut self, id: TrackId, liked: bool) {
        self.favorites.set(id, liked);
        self.pending_events
            .push(PlaybackEvent::FavoriteChanged { track_id: id, liked });
    }

    // ===== Track Selection =====

    /// Handle a user request for a track
    ///
    /// - Current track: flips play/pause without contacting the backend
    /// - Track already being acquired: ignored
    /// - Otherwise: resolved; plays now or enters the download queue
    ///
    /// A failed resolution leaves the session untouched.
    pub async fn select_track(&mut self, track: TrackDescriptor) -> Result<Selection> {
        if self.current_id() == Some(track.id) {
            self.toggle_play()?;
            return Ok(Selection::Toggled);
        }

        if self.resolver.registry().contains(track.id) {
            debug!(track_id = %track.id, "Selection ignored, acquisition in flight");
            return Ok(Selection::Ignored);
        }

        match self.resolver.resolve(&track, Attempt::First).await {
            Resolution::Play(playable) => {
                self.load(playable)?;
                Ok(Selection::Playing)
            }
            Resolution::Deferred { queued } => {
                if queued {
                    self.pending_events
                        .push(PlaybackEvent::DownloadQueued { track_id: track.id });
                }
                Ok(Selection::Downloading)
            }
            Resolution::Failed(reason) => {
                self.pending_events.push(PlaybackEvent::DownloadFailed {
                    track_id: track.id,
                    reason,
                });
                Ok(Selection::Failed)
            }
            Resolution::Completed | Resolution::Skipped => Ok(Selection::Ignored),
        }
    }

    /// Flip play/pause of the loaded track
    pub fn toggle_play(&mut self) -> Result<()> {
        if self.session.current_track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        if self.session.is_playing {
            self.transport.pause();
            self.session.is_playing = false;
        } else {
            self.transport.play()?;
            self.session.is_playing = true;
        }
        self.emit_state_changed();
        Ok(())
    }

    /// Advance to the next track
    ///
    /// - Repeat One: restart the current track
    /// - Shuffle: random library entry
    /// - Otherwise: library successor; at the end, repeat All wraps to the
    ///   first entry and repeat Off stops playback
    pub async fn next(&mut self) -> Result<Transition> {
        let Some(current) = self.current_id() else {
            return Ok(Transition::None);
        };
        if self.library.is_empty() {
            return Ok(Transition::None);
        }

        if self.session.repeat == RepeatMode::One {
            self.restart()?;
            return Ok(Transition::Restarted);
        }

        let target = if self.session.shuffle {
            self.library.random(&mut self.rng).cloned()
        } else {
            match self.library.successor(current) {
                Some(track) => Some(track.clone()),
                None if self.session.repeat == RepeatMode::All => self.library.first().cloned(),
                None => None,
            }
        };

        match target {
            Some(track) => self.transition_to(track).await,
            None => {
                self.stop();
                Ok(Transition::Stopped)
            }
        }
    }

    /// Go to the previous library entry, wrapping to the last one
    ///
    /// Shuffle does not apply.
    pub async fn prev(&mut self) -> Result<Transition> {
        let Some(current) = self.current_id() else {
            return Ok(Transition::None);
        };

        match self.library.predecessor(current).cloned() {
            Some(track) => self.transition_to(track).await,
            None => Ok(Transition::None),
        }
    }

    /// Handle the transport reporting the end of the current track
    ///
    /// The transport has already stopped, so the session is marked paused
    /// before moving on. A successor that is still downloading or fails to
    /// resolve leaves the ended track loaded and paused.
    pub async fn on_track_ended(&mut self) -> Result<Transition> {
        if self.session.is_playing {
            self.session.is_playing = false;
            self.emit_state_changed();
        }
        self.next().await
    }

    async fn transition_to(&mut self, track: TrackDescriptor) -> Result<Transition> {
        if self.current_id() == Some(track.id) {
            self.restart()?;
            return Ok(Transition::Restarted);
        }
        Ok(Transition::Selected(self.select_track(track).await?))
    }

    // ===== Modes & Transport Controls =====

    /// Cycle repeat mode Off -> All -> One -> Off
    pub fn toggle_repeat(&mut self) -> RepeatMode {
        self.set_repeat(self.session.repeat.cycle());
        self.session.repeat
    }

    /// Set repeat mode
    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.session.repeat = mode;
        self.pending_events.push(PlaybackEvent::RepeatChanged { mode });
    }

    /// Enable or disable shuffle
    pub fn set_shuffle(&mut self, enabled: bool) {
        self.session.shuffle = enabled;
        self.pending_events
            .push(PlaybackEvent::ShuffleChanged { enabled });
    }

    /// Flip shuffle, returning the new flag
    pub fn toggle_shuffle(&mut self) -> bool {
        self.set_shuffle(!self.session.shuffle);
        self.session.shuffle
    }

    /// Record the position reported by the transport
    pub fn on_time_update(&mut self, position: Duration, duration: Option<Duration>) {
        self.session.position = position;
        if duration.is_some() {
            self.session.duration = duration;
        }
    }

    /// Seek within the loaded track
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        if self.session.current_track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        let position = match self.session.duration {
            Some(duration) => position.min(duration),
            None => position,
        };
        self.transport.seek(position)?;
        self.session.position = position;
        Ok(())
    }

    /// Set volume (0-100)
    pub fn set_volume(&mut self, level: u8) {
        let level = level.min(100);
        self.session.volume = level;
        self.transport.set_volume(level);
        self.pending_events
            .push(PlaybackEvent::VolumeChanged { level });
    }

    fn restart(&mut self) -> Result<()> {
        self.transport.seek(Duration::ZERO)?;
        self.session.position = Duration::ZERO;
        if !self.session.is_playing {
            self.transport.play()?;
            self.session.is_playing = true;
            self.emit_state_changed();
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.transport.pause();
        if self.session.is_playing {
            self.session.is_playing = false;
            self.emit_state_changed();
        }
        info!("End of library reached");
    }

    /// Attach a resolved track and start it
    fn load(&mut self, track: PlayableTrack) -> Result<()> {
        let previous = self.current_id();

        self.transport.detach();
        if let Err(e) = self.transport.attach(&track) {
            self.session.current_track = None;
            self.session.is_playing = false;
            self.emit_state_changed();
            return Err(e);
        }

        self.session.position = Duration::ZERO;
        self.session.duration = track
            .descriptor
            .duration
            .map(|secs| Duration::from_secs(u64::from(secs)));
        let track_id = track.id();
        self.session.current_track = Some(track);

        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id,
            previous_track_id: previous,
        });

        if let Err(e) = self.transport.play() {
            self.session.is_playing = false;
            self.emit_state_changed();
            return Err(e);
        }
        self.session.is_playing = true;
        self.emit_state_changed();

        info!(track_id = %track_id, "Playback started");
        Ok(())
    }

    // ===== Downloads =====

    /// Clear the download queue and cancel every pending retry
    pub fn clear_downloads(&mut self) -> usize {
        let count = self.resolver.clear_downloads();
        self.pending_events
            .push(PlaybackEvent::DownloadsCleared { count });
        count
    }

    /// Stop following one pending acquisition
    ///
    /// The download-queue entry stays; only the retry timer is cancelled.
    pub fn cancel_download(&mut self, id: TrackId) -> bool {
        let cancelled = self.resolver.cancel(id);
        if cancelled {
            self.pending_events
                .push(PlaybackEvent::PendingCleared { track_id: id });
        }
        cancelled
    }

    /// Download queue, most recent first
    pub fn downloads(&self) -> &DownloadQueue {
        self.resolver.downloads()
    }

    /// Pending-state registry
    pub fn pending(&self) -> &PendingRegistry {
        self.resolver.registry()
    }

    /// Progress-ring fraction for `id`
    pub fn progress(&self, id: TrackId) -> Option<f32> {
        self.resolver.registry().progress(id, Instant::now())
    }

    /// Acquisition status of `id`
    pub fn acquisition(&self, id: TrackId) -> Acquisition {
        self.resolver.acquisition(id)
    }

    // ===== Timer Messages =====

    /// Wait for the next timer message
    pub async fn next_message(&mut self) -> Option<CoordinatorMessage> {
        self.inbox.recv().await
    }

    /// Handle every timer message that is already due, returning the count
    pub async fn run_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.inbox.try_recv() {
            self.handle_message(message).await;
            handled += 1;
        }
        handled
    }

    /// Apply one timer message
    ///
    /// Messages whose pending entry was cleared or replaced are dropped.
    pub async fn handle_message(&mut self, message: CoordinatorMessage) {
        if !self.resolver.is_current(&message) {
            debug!(track_id = %message.track_id(), "Dropping stale timer message");
            return;
        }

        match message {
            CoordinatorMessage::Retry { track, generation } => {
                let track_id = track.id;
                match self.resolver.poll(&track, generation).await {
                    Some(Resolution::Completed) => {
                        self.pending_events
                            .push(PlaybackEvent::DownloadCompleted { track_id });
                    }
                    Some(Resolution::Failed(reason)) => {
                        self.pending_events
                            .push(PlaybackEvent::DownloadFailed { track_id, reason });
                        self.pending_events
                            .push(PlaybackEvent::PendingCleared { track_id });
                    }
                    _ => {}
                }
            }
            CoordinatorMessage::Settle { id, generation } => {
                if self.resolver.settle(id, generation) {
                    self.pending_events
                        .push(PlaybackEvent::PendingCleared { track_id: id });
                    if self.user.is_some() {
                        if let Err(e) = self.refresh_library().await {
                            warn!(error = %e, "Library refresh after download failed");
                        }
                    }
                }
            }
        }
    }

    /// Clock for re-rendering progress rings
    pub fn progress_ticker(&self) -> Interval {
        let mut interval = tokio::time::interval(self.config.progress_tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    }

    // ===== State Queries =====

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.session.state()
    }

    /// Full session snapshot
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// Loaded track
    pub fn current_track(&self) -> Option<&PlayableTrack> {
        self.session.current_track.as_ref()
    }

    fn current_id(&self) -> Option<TrackId> {
        self.session.current_track.as_ref().map(PlayableTrack::id)
    }

    /// Drain buffered events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn emit_state_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::StateChanged {
            state: self.session.state(),
        });
    }
}
