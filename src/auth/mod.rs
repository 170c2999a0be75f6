//! Authentication
//!
//! Registration, credential checks and session lifecycle. Failures to log in
//! or register are outcomes, not errors; only storage problems are errors.

pub mod credentials;
pub mod session;

use crate::concurrency::UserLockManager;
use crate::error::ApiError;
use crate::kv::KeyValueStore;
use std::sync::Arc;

pub use credentials::{CredentialStore, RegisterOutcome, UserRecord};
pub use session::{Session, SessionStore};

/// Shown for any failed login; never says which half was wrong.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";

/// Shown when a username is already registered.
pub const USERNAME_TAKEN_MESSAGE: &str = "This username already exists.";

/// Credential and session operations over one key-value store.
pub struct AuthService {
    credentials: CredentialStore,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            credentials: CredentialStore::new(store.clone()),
            sessions: SessionStore::new(store),
        }
    }

    /// Serialize credential writes through a shared lock manager.
    pub fn with_lock_manager(mut self, locks: Arc<UserLockManager>) -> Self {
        self.credentials = self.credentials.with_lock_manager(locks);
        self
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn register(&self, username: &str, credential: &str) -> Result<RegisterOutcome, ApiError> {
        self.credentials.register(username, credential)
    }

    /// Register and, on success, log the new user in.
    pub fn register_and_login(
        &self,
        username: &str,
        credential: &str,
    ) -> Result<Option<Session>, ApiError> {
        match self.credentials.register(username, credential)? {
            RegisterOutcome::AlreadyExists => Ok(None),
            RegisterOutcome::Registered => self.login(username, credential),
        }
    }

    /// Authenticate and record the session. `None` when credentials don't match.
    pub fn login(&self, username: &str, credential: &str) -> Result<Option<Session>, ApiError> {
        if !self.credentials.authenticate(username, credential)? {
            tracing::info!(user = username, "Login failed");
            return Ok(None);
        }
        self.sessions.set_current(username)?;
        tracing::info!(user = username, "Logged in");
        Ok(Some(Session::new(username)))
    }

    /// End `session` and clear the persisted pointer unconditionally.
    pub fn logout(&self, session: Session) -> Result<(), ApiError> {
        self.sessions.clear()?;
        tracing::info!(user = session.username(), "Logged out");
        Ok(())
    }

    /// Clear the persisted pointer without holding a session.
    pub fn clear_session(&self) -> Result<(), ApiError> {
        self.sessions.clear()
    }

    /// Session restored from the persisted pointer, if any.
    pub fn current(&self) -> Result<Option<Session>, ApiError> {
        Ok(self.sessions.get_current()?.map(Session::new))
    }

    /// Current session or `Unauthorized`.
    pub fn require_session(&self) -> Result<Session, ApiError> {
        self.current()?
            .ok_or_else(|| ApiError::Unauthorized("Not logged in".to_string()))
    }
}
