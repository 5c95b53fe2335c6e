//! Saved user identity

use crate::error::{PlaybackError, Result};
use melody_core::{KeyValueStore, UserId};
use std::sync::Arc;
use tracing::{info, warn};

/// Store key holding the user id
pub const SESSION_KEY: &str = "custom_chat_id";

/// Persists the user identity between runs
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Create a session store over `store`
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Save `user` as the active identity
    pub fn login(&self, user: UserId) -> Result<()> {
        self.store
            .set(SESSION_KEY, &user.to_string())
            .map_err(PlaybackError::Store)?;
        info!(user_id = %user, "Session saved");
        Ok(())
    }

    /// Load the saved identity
    ///
    /// A malformed value is treated as no identity.
    pub fn restore(&self) -> Result<Option<UserId>> {
        let Some(raw) = self.store.get(SESSION_KEY).map_err(PlaybackError::Store)? else {
            return Ok(None);
        };

        match raw.parse() {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(value = %raw, error = %e, "Ignoring malformed saved identity");
                Ok(None)
            }
        }
    }

    /// Forget the saved identity
    pub fn logout(&self) -> Result<()> {
        self.store.remove(SESSION_KEY).map_err(PlaybackError::Store)
    }
}
