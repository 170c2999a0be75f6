//! Item Repository
//!
//! Owns one user's tree of items on top of the key-value store. Each call
//! loads the full collection from the user's record, and each mutation writes
//! the full collection back in a single `set`.

use crate::concurrency::UserLockManager;
use crate::error::ApiError;
use crate::item::tree::{self, ChildIndex};
use crate::item::{Item, NewItem};
use crate::kv::{self, KeyValueStore};
use crate::types::{new_item_id, now_millis, ItemId};
use std::sync::Arc;
use tracing::{debug, info};

pub struct ItemRepository {
    store: Arc<dyn KeyValueStore>,
    locks: Arc<UserLockManager>,
    strict_parents: bool,
}

impl ItemRepository {
    /// Create a permissive repository over `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            locks: Arc::new(UserLockManager::new()),
            strict_parents: false,
        }
    }

    /// Require `create` parents to be existing folders.
    pub fn with_strict_parents(mut self, strict: bool) -> Self {
        self.strict_parents = strict;
        self
    }

    /// Share a lock manager with other repositories over the same store.
    pub fn with_lock_manager(mut self, locks: Arc<UserLockManager>) -> Self {
        self.locks = locks;
        self
    }

    /// Full collection for `username`, in creation order.
    ///
    /// Empty when the user has no record yet.
    pub fn list(&self, username: &str) -> Result<Vec<Item>, ApiError> {
        let lock = self.locks.get_lock(username);
        let _guard = lock.read();
        self.load(username)
    }

    /// Append a new item and persist the collection.
    pub fn create(&self, username: &str, new_item: NewItem) -> Result<Item, ApiError> {
        let lock = self.locks.get_lock(username);
        let _guard = lock.write();

        let mut items = self.load(username)?;
        if self.strict_parents {
            if let Some(parent_id) = new_item.parent_id.as_deref() {
                check_parent(&items, parent_id)?;
            }
        }

        let item = Item {
            id: new_item_id(),
            parent_id: new_item.parent_id,
            name: new_item.name,
            content: new_item.content,
            created_at: now_millis(),
        };
        items.push(item.clone());
        self.save(username, &items)?;

        info!(
            user = username,
            item_id = %item.id,
            kind = %item.kind(),
            parent = item.parent_id.as_deref().unwrap_or("<root>"),
            "Created item"
        );
        Ok(item)
    }

    /// Remove `item_id` and its subtree. Returns the number of items removed.
    ///
    /// An unknown id removes nothing; the collection is still written back.
    pub fn delete(&self, username: &str, item_id: &str) -> Result<usize, ApiError> {
        let lock = self.locks.get_lock(username);
        let _guard = lock.write();

        let items = self.load(username)?;
        let removal = tree::collect_subtree(&items, item_id);
        let before = items.len();
        let remaining: Vec<Item> = items
            .into_iter()
            .filter(|item| !removal.contains(&item.id))
            .collect();
        let removed = before - remaining.len();
        self.save(username, &remaining)?;

        if removed == 0 {
            debug!(user = username, item_id, "Delete matched no items");
        } else {
            info!(user = username, item_id, removed, "Deleted item subtree");
        }
        Ok(removed)
    }

    /// Look up one item by id.
    pub fn get(&self, username: &str, item_id: &str) -> Result<Option<Item>, ApiError> {
        Ok(self
            .list(username)?
            .into_iter()
            .find(|item| item.id == item_id))
    }

    /// Look up one item by id or fail with `ItemNotFound`.
    pub fn get_or_error(&self, username: &str, item_id: &str) -> Result<Item, ApiError> {
        self.get(username, item_id)?
            .ok_or_else(|| ApiError::ItemNotFound(item_id.to_string()))
    }

    /// Direct children of `parent_id` (`None` for root), in creation order.
    pub fn children(&self, username: &str, parent_id: Option<&str>) -> Result<Vec<Item>, ApiError> {
        let items = self.list(username)?;
        let index = ChildIndex::build(&items);
        Ok(index
            .children_of(parent_id)
            .iter()
            .map(|item| (*item).clone())
            .collect())
    }

    /// Case-insensitive name search across the whole collection.
    ///
    /// A blank query lists the root level instead.
    pub fn search(&self, username: &str, query: &str) -> Result<Vec<Item>, ApiError> {
        if query.trim().is_empty() {
            return self.children(username, None);
        }
        let needle = query.to_lowercase();
        Ok(self
            .list(username)?
            .into_iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Path from the root down to `item_id`, inclusive.
    pub fn breadcrumb(&self, username: &str, item_id: &str) -> Result<Vec<Item>, ApiError> {
        let items = self.list(username)?;
        Ok(tree::ancestors(&items, item_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Identifiers `delete(item_id)` would remove, excluding `item_id` itself.
    pub fn descendants(&self, username: &str, item_id: &str) -> Result<Vec<ItemId>, ApiError> {
        let items = self.list(username)?;
        let removal = tree::collect_subtree(&items, item_id);
        Ok(items
            .into_iter()
            .filter(|item| item.id != item_id && removal.contains(&item.id))
            .map(|item| item.id)
            .collect())
    }

    fn load(&self, username: &str) -> Result<Vec<Item>, ApiError> {
        let items: Option<Vec<Item>> = kv::load_json(self.store.as_ref(), &kv::data_key(username))?;
        Ok(items.unwrap_or_default())
    }

    fn save(&self, username: &str, items: &[Item]) -> Result<(), ApiError> {
        kv::save_json(self.store.as_ref(), &kv::data_key(username), items)?;
        debug!(user = username, count = items.len(), "Persisted item collection");
        Ok(())
    }
}

fn check_parent(items: &[Item], parent_id: &str) -> Result<(), ApiError> {
    match items.iter().find(|item| item.id == parent_id) {
        None => Err(ApiError::InvalidParent {
            parent_id: parent_id.to_string(),
            reason: "no such item".to_string(),
        }),
        Some(parent) if !parent.is_folder() => Err(ApiError::InvalidParent {
            parent_id: parent_id.to_string(),
            reason: format!("parent is a {}, not a folder", parent.kind()),
        }),
        Some(_) => Ok(()),
    }
}
