//! Sessions
//!
//! A [`Session`] is handed out by a successful login and consumed by logout;
//! callers own it. The current-session record in the key-value store lets a
//! later process pick the session back up. Last login wins.

use crate::error::ApiError;
use crate::kv::{KeyValueStore, CURRENT_USER_KEY};
use std::sync::Arc;

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
}

impl Session {
    pub(crate) fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Persisted current-session pointer.
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn set_current(&self, username: &str) -> Result<(), ApiError> {
        self.store.set(CURRENT_USER_KEY, username)?;
        Ok(())
    }

    /// Remove the pointer. Succeeds when nobody is logged in.
    pub fn clear(&self) -> Result<(), ApiError> {
        self.store.delete(CURRENT_USER_KEY)?;
        Ok(())
    }

    /// Username of the current session; an empty record counts as none.
    pub fn get_current(&self) -> Result<Option<String>, ApiError> {
        Ok(self
            .store
            .get(CURRENT_USER_KEY)?
            .filter(|username| !username.is_empty()))
    }
}
