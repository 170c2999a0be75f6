//! Generative checks over randomly shaped collections.

use organisa::item::{Item, ItemRepository, NewItem};
use organisa::kv::MemoryKeyValueStore;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

/// Each entry picks a kind (0 folder, 1 note, 2 link, 3 file), an optional
/// parent, and whether that parent is drawn from the folders or from every
/// item created so far. The repository accepts non-folder parents.
fn shapes() -> impl Strategy<Value = Vec<(u8, Option<usize>, bool)>> {
    prop::collection::vec(
        (0u8..4, prop::option::of(0usize..16), any::<bool>()),
        1..40,
    )
}

fn build(repository: &ItemRepository, shapes: &[(u8, Option<usize>, bool)]) -> Vec<Item> {
    let mut folders: Vec<String> = Vec::new();
    let mut all: Vec<String> = Vec::new();
    for (n, (kind, parent, any_kind)) in shapes.iter().enumerate() {
        let pool = if *any_kind { &all } else { &folders };
        let parent_id = parent.and_then(|p| {
            if pool.is_empty() {
                None
            } else {
                Some(pool[p % pool.len()].clone())
            }
        });
        let name = format!("item-{}", n);
        let new_item = match kind {
            0 => NewItem::folder(name),
            1 => NewItem::note(name, format!("text {}", n)),
            2 => NewItem::link(name, format!("https://example.org/{}", n)),
            _ => NewItem::file(name, "data:application/octet-stream;base64,AA=="),
        };
        let item = repository
            .create("alice", new_item.under(parent_id))
            .unwrap();
        if item.is_folder() {
            folders.push(item.id.clone());
        }
        all.push(item.id);
    }
    repository.list("alice").unwrap()
}

/// Reference answer: the target, its direct children, and the children of
/// every removed folder.
fn expected_removal(items: &[Item], target: &str) -> HashSet<String> {
    let folders: HashSet<&str> = items
        .iter()
        .filter(|i| i.is_folder())
        .map(|i| i.id.as_str())
        .collect();
    let mut removal = HashSet::from([target.to_string()]);
    loop {
        let before = removal.len();
        for item in items {
            if let Some(parent) = &item.parent_id {
                let reached = parent == target
                    || (removal.contains(parent) && folders.contains(parent.as_str()));
                if reached {
                    removal.insert(item.id.clone());
                }
            }
        }
        if removal.len() == before {
            return removal;
        }
    }
}

proptest! {
    #[test]
    fn collection_round_trips_through_json(shapes in shapes()) {
        let repository = ItemRepository::new(Arc::new(MemoryKeyValueStore::new()));
        let items = build(&repository, &shapes);

        let encoded = serde_json::to_string(&items).unwrap();
        let decoded: Vec<Item> = serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(decoded, items);
    }

    #[test]
    fn delete_removes_exactly_the_subtree(shapes in shapes(), pick in 0usize..64) {
        let repository = ItemRepository::new(Arc::new(MemoryKeyValueStore::new()));
        let items = build(&repository, &shapes);
        let target = items[pick % items.len()].id.clone();
        let expected = expected_removal(&items, &target);

        let removed = repository.delete("alice", &target).unwrap();
        let remaining = repository.list("alice").unwrap();

        prop_assert_eq!(removed, expected.len());
        prop_assert_eq!(remaining.len(), items.len() - expected.len());
        for item in &remaining {
            prop_assert!(!expected.contains(&item.id));
        }
        let survivors: Vec<&Item> = items.iter().filter(|i| !expected.contains(&i.id)).collect();
        let remaining_refs: Vec<&Item> = remaining.iter().collect();
        prop_assert_eq!(remaining_refs, survivors);
    }

    #[test]
    fn created_ids_are_unique(shapes in shapes()) {
        let repository = ItemRepository::new(Arc::new(MemoryKeyValueStore::new()));
        let items = build(&repository, &shapes);
        let ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
        prop_assert_eq!(ids.len(), items.len());
    }
}
