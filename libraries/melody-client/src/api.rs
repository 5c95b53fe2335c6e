//! `MusicApi` implementation backed by the HTTP client.

use crate::client::MusicClient;
use async_trait::async_trait;
use melody_core::{MusicApi, PlaybackOutcome, Result, TrackDescriptor, TrackId, TrackStatus, UserId};

#[async_trait]
impl MusicApi for MusicClient {
    async fn request_playback(&self, track: &TrackDescriptor) -> Result<PlaybackOutcome> {
        Ok(self.playback().request_playback(track).await?)
    }

    async fn fetch_library(&self, user: UserId) -> Result<Vec<TrackDescriptor>> {
        Ok(self.library().get_library(user).await?)
    }

    async fn search(&self, query: &str) -> Result<Vec<TrackDescriptor>> {
        Ok(self.catalog().search_tracks(query).await?)
    }

    async fn like(&self, user: UserId, track: &TrackDescriptor) -> Result<()> {
        Ok(self.library().like(user, track).await?)
    }

    async fn unlike(&self, user: UserId, track: &TrackDescriptor) -> Result<()> {
        Ok(self.library().unlike(user, track).await?)
    }

    async fn track_status(&self, id: TrackId) -> Result<TrackStatus> {
        Ok(self.playback().track_status(id).await?)
    }

    async fn queue_wait_estimate(&self) -> Result<f64> {
        Ok(self.playback().queue_wait_estimate().await?)
    }
}
