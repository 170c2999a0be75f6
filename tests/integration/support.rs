//! Shared fixtures for integration tests.

use organisa::item::ItemRepository;
use organisa::kv::{KeyValueStore, SledKeyValueStore};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Open a sled-backed store under `dir`.
pub fn open_store(dir: &Path) -> Arc<dyn KeyValueStore> {
    Arc::new(SledKeyValueStore::open(&dir.join("store")).unwrap())
}

/// Fresh temp directory plus a repository over a sled store inside it.
pub fn sled_repository() -> (TempDir, ItemRepository) {
    let temp_dir = TempDir::new().unwrap();
    let repository = ItemRepository::new(open_store(temp_dir.path()));
    (temp_dir, repository)
}
