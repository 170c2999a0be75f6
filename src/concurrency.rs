//! Per-user write serialization
//!
//! Every repository mutation is a read-modify-write of the user's whole item
//! collection. Holding the user's write lock across that sequence keeps two
//! writers in the same process from losing each other's changes. Different
//! users never contend.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Lock manager keyed by username
pub struct UserLockManager {
    locks: Arc<RwLock<HashMap<String, Arc<RwLock<()>>>>>,
}

impl UserLockManager {
    pub fn new() -> Self {
        Self {
            locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get (or create) the lock guarding `username`'s collection
    pub fn get_lock(&self, username: &str) -> Arc<RwLock<()>> {
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(username) {
                return lock.clone();
            }
        }

        let mut map = self.locks.write();
        // Another thread may have inserted it between the two acquisitions
        map.entry(username.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }
}

impl Default for UserLockManager {
    fn default() -> Self {
        Self::new()
    }
}
