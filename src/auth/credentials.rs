//! Credential store: registered users and their credentials.
//!
//! Credentials are compared by exact string equality; nothing is hashed.

use crate::concurrency::UserLockManager;
use crate::error::ApiError;
use crate::kv::{self, KeyValueStore, USERS_KEY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stored user entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(rename = "passwordHash")]
    pub credential: String,
}

/// Outcome of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered,
    AlreadyExists,
}

pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    locks: Arc<UserLockManager>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            locks: Arc::new(UserLockManager::new()),
        }
    }

    /// Share a lock manager with other writers over the same store.
    pub fn with_lock_manager(mut self, locks: Arc<UserLockManager>) -> Self {
        self.locks = locks;
        self
    }

    /// All registered users, in registration order.
    pub fn users(&self) -> Result<Vec<UserRecord>, ApiError> {
        let users: Option<Vec<UserRecord>> = kv::load_json(self.store.as_ref(), USERS_KEY)?;
        Ok(users.unwrap_or_default())
    }

    /// Add a user. An existing username is left untouched.
    ///
    /// The users record is rewritten whole, so registrations hold the
    /// `USERS_KEY` write lock.
    pub fn register(&self, username: &str, credential: &str) -> Result<RegisterOutcome, ApiError> {
        let lock = self.locks.get_lock(USERS_KEY);
        let _guard = lock.write();

        let mut users = self.users()?;
        if users.iter().any(|u| u.username == username) {
            tracing::debug!(user = username, "Registration rejected, username taken");
            return Ok(RegisterOutcome::AlreadyExists);
        }
        users.push(UserRecord {
            username: username.to_string(),
            credential: credential.to_string(),
        });
        kv::save_json(self.store.as_ref(), USERS_KEY, &users)?;
        tracing::info!(user = username, "Registered user");
        Ok(RegisterOutcome::Registered)
    }

    /// True iff `username` exists and `credential` matches exactly.
    pub fn authenticate(&self, username: &str, credential: &str) -> Result<bool, ApiError> {
        Ok(self
            .users()?
            .iter()
            .any(|u| u.username == username && u.credential == credential))
    }
}
