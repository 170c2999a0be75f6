use organisa::error::{ApiError, StorageError};
use organisa::item::{ItemContent, ItemKind, ItemRepository, NewItem};
use organisa::kv::{self, KeyValueStore};
use std::collections::HashSet;

use crate::integration::support::{open_store, sled_repository};

#[test]
fn list_for_new_user_is_empty() {
    let (_dir, repository) = sled_repository();
    assert!(repository.list("nobody").unwrap().is_empty());
}

#[test]
fn create_then_list_contains_exactly_one_new_item() {
    let (_dir, repository) = sled_repository();
    let before = repository.list("alice").unwrap();
    let created = repository
        .create("alice", NewItem::link("Rust", "https://www.rust-lang.org"))
        .unwrap();

    let after = repository.list("alice").unwrap();
    assert_eq!(after.len(), before.len() + 1);
    let matching: Vec<_> = after.iter().filter(|i| i.id == created.id).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].name, "Rust");
    assert_eq!(matching[0].kind(), ItemKind::Link);
    assert_eq!(matching[0].parent_id, None);
    assert_eq!(
        matching[0].content.payload(),
        Some("https://www.rust-lang.org")
    );
}

#[test]
fn deleting_folder_keeps_unrelated_items() {
    let (_dir, repository) = sled_repository();
    let a = repository.create("alice", NewItem::folder("A")).unwrap();
    let b = repository
        .create("alice", NewItem::folder("B").under(Some(a.id.clone())))
        .unwrap();
    repository
        .create("alice", NewItem::note("C", "deep").under(Some(b.id.clone())))
        .unwrap();
    let d = repository.create("alice", NewItem::note("D", "")).unwrap();

    let removed = repository.delete("alice", &a.id).unwrap();
    assert_eq!(removed, 3);

    let remaining = repository.list("alice").unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, d.id);
}

#[test]
fn deleting_leaf_removes_only_that_item() {
    let (_dir, repository) = sled_repository();
    let folder = repository.create("alice", NewItem::folder("F")).unwrap();
    let leaf = repository
        .create("alice", NewItem::note("leaf", "x").under(Some(folder.id.clone())))
        .unwrap();
    let sibling = repository
        .create("alice", NewItem::note("sibling", "y").under(Some(folder.id.clone())))
        .unwrap();

    repository.delete("alice", &leaf.id).unwrap();
    let ids: HashSet<String> = repository
        .list("alice")
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ids, HashSet::from([folder.id, sibling.id]));
}

#[test]
fn deleting_unknown_id_leaves_collection_unchanged() {
    let (_dir, repository) = sled_repository();
    repository.create("alice", NewItem::folder("Keep")).unwrap();
    let before = repository.list("alice").unwrap();
    repository.delete("alice", "no-such-id").unwrap();
    assert_eq!(repository.list("alice").unwrap(), before);
}

#[test]
fn collection_survives_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let created = {
        let repository = ItemRepository::new(open_store(dir.path()));
        let folder = repository.create("alice", NewItem::folder("Docs")).unwrap();
        repository
            .create(
                "alice",
                NewItem::file("a.txt", "data:text/plain;base64,aGk=").under(Some(folder.id)),
            )
            .unwrap();
        repository.list("alice").unwrap()
    };

    let repository = ItemRepository::new(open_store(dir.path()));
    assert_eq!(repository.list("alice").unwrap(), created);
}

#[test]
fn users_have_separate_collections() {
    let (_dir, repository) = sled_repository();
    repository.create("alice", NewItem::folder("A")).unwrap();
    repository.create("bob", NewItem::folder("B")).unwrap();
    assert_eq!(repository.list("alice").unwrap()[0].name, "A");
    assert_eq!(repository.list("bob").unwrap()[0].name, "B");
}

#[test]
fn stored_records_use_camel_case_fields() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = open_store(dir.path());
    let repository = ItemRepository::new(store.clone());
    let folder = repository.create("alice", NewItem::folder("Docs")).unwrap();
    repository
        .create("alice", NewItem::note("n", "body").under(Some(folder.id.clone())))
        .unwrap();

    let raw = store.get(&kv::data_key("alice")).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["type"], "folder");
    assert!(value[0].get("content").is_none());
    assert_eq!(value[1]["parentId"], folder.id.as_str());
    assert_eq!(value[1]["content"], "body");
    assert!(value[1]["createdAt"].is_i64());
}

#[test]
fn corrupt_collection_surfaces_storage_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = open_store(dir.path());
    store.set(&kv::data_key("alice"), "not json").unwrap();

    let repository = ItemRepository::new(store);
    let err = repository.list("alice").unwrap_err();
    assert!(matches!(
        err,
        ApiError::StorageError(StorageError::CorruptRecord { .. })
    ));
    assert!(repository.create("alice", NewItem::folder("x")).is_err());
}

#[test]
fn strict_parents_rejects_missing_and_non_folder_parent() {
    let (_dir, repository) = sled_repository();
    let repository = repository.with_strict_parents(true);
    let note = repository.create("alice", NewItem::note("n", "")).unwrap();

    let missing = repository.create("alice", NewItem::folder("x").under(Some("ghost".to_string())));
    assert!(matches!(missing, Err(ApiError::InvalidParent { .. })));

    let under_note = repository.create("alice", NewItem::folder("x").under(Some(note.id)));
    assert!(matches!(under_note, Err(ApiError::InvalidParent { .. })));
    assert_eq!(repository.list("alice").unwrap().len(), 1);
}

#[test]
fn permissive_mode_accepts_dangling_parent() {
    let (_dir, repository) = sled_repository();
    let item = repository
        .create(
            "alice",
            NewItem::new("orphan", ItemContent::Note { text: String::new() })
                .under(Some("ghost".to_string())),
        )
        .unwrap();
    assert_eq!(item.parent_id.as_deref(), Some("ghost"));
}
