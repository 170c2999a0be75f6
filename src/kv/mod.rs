//! Persistent Key-Value Store
//!
//! String-keyed, string-valued storage that outlives the process. Every
//! organizer record (users, current session, per-user item collections) is a
//! single entry in this store, serialized as JSON.

pub mod memory;
pub mod persistent;

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use memory::MemoryKeyValueStore;
pub use persistent::SledKeyValueStore;

/// Key holding the registered users.
pub const USERS_KEY: &str = "organisa_users";

/// Key holding the username of the current session.
pub const CURRENT_USER_KEY: &str = "organisa_current_user";

/// Prefix of the per-user item collection keys.
pub const DATA_KEY_PREFIX: &str = "organisa_data_";

/// Key of the item collection owned by `username`.
pub fn data_key(username: &str) -> String {
    format!("{}{}", DATA_KEY_PREFIX, username)
}

/// Key-value store port
///
/// Synchronous and durable: once `set` or `delete` returns, the change
/// survives a restart of the process.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Load and decode a JSON record. A missing key yields `None`.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::CorruptRecord {
                key: key.to_string(),
                source,
            }),
    }
}

/// Encode a record as JSON and replace the value at `key`.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
