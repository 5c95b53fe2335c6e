//! Audio transport abstraction
//!
//! The coordinator exclusively owns one transport. Only one track is
//! attached at a time; switching tracks always detaches the previous source
//! before attaching the next one.

use crate::error::Result;
use melody_core::PlayableTrack;
use std::time::Duration;

/// Platform-provided audio output
///
/// Implementors stream the media locator of the attached track. A web
/// front end would wrap an audio element; the CLI uses [`NullTransport`].
pub trait AudioTransport: Send {
    /// Attach a track as the active source
    fn attach(&mut self, track: &PlayableTrack) -> Result<()>;

    /// Tear down the active source (no-op if none)
    fn detach(&mut self);

    /// Start or resume playback
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Seek within the active source
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Set output volume (0-100)
    fn set_volume(&mut self, level: u8);

    /// Whether a source is attached
    fn is_attached(&self) -> bool;
}

/// Transport that produces no sound
///
/// Keeps the attach/detach bookkeeping so the coordinator can be driven
/// headless.
#[derive(Debug, Default)]
pub struct NullTransport {
    attached: Option<String>,
}

impl NullTransport {
    /// Create a detached transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Locator of the attached source
    pub fn attached_locator(&self) -> Option<&str> {
        self.attached.as_deref()
    }
}

impl AudioTransport for NullTransport {
    fn attach(&mut self, track: &PlayableTrack) -> Result<()> {
        self.attached = Some(track.media_locator.clone());
        Ok(())
    }

    fn detach(&mut self) {
        self.attached = None;
    }

    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn seek(&mut self, _position: Duration) -> Result<()> {
        Ok(())
    }

    fn set_volume(&mut self, _level: u8) {}

    fn is_attached(&self) -> bool {
        self.attached.is_some()
    }
}
