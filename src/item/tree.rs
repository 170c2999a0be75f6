//! Tree traversal over a flat item collection.
//!
//! The collection is stored flat, each item pointing at its parent. These
//! helpers build a parent -> children index once and walk it, so subtree
//! collection is linear in the collection size rather than one full scan
//! per level.

use crate::item::Item;
use crate::types::ItemId;
use std::collections::{HashMap, HashSet};

/// Parent -> children index. Children keep collection (creation) order.
pub struct ChildIndex<'a> {
    roots: Vec<&'a Item>,
    children: HashMap<&'a str, Vec<&'a Item>>,
}

impl<'a> ChildIndex<'a> {
    pub fn build(items: &'a [Item]) -> Self {
        let mut roots = Vec::new();
        let mut children: HashMap<&'a str, Vec<&'a Item>> = HashMap::new();
        for item in items {
            match item.parent_id.as_deref() {
                None => roots.push(item),
                Some(parent) => children.entry(parent).or_default().push(item),
            }
        }
        Self { roots, children }
    }

    /// Direct children of `parent` (`None` for root).
    pub fn children_of(&self, parent: Option<&str>) -> &[&'a Item] {
        match parent {
            None => &self.roots,
            Some(parent) => self
                .children
                .get(parent)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }
}

/// Identifiers removed when deleting `target`: the target itself, all of its
/// direct children, and recursively the children of every folder reached.
///
/// The target is always included, even if it is not in `items`. Revisited
/// identifiers are skipped, so a corrupt cycle terminates.
pub fn collect_subtree(items: &[Item], target: &str) -> HashSet<ItemId> {
    let index = ChildIndex::build(items);
    let mut removal: HashSet<ItemId> = HashSet::new();
    removal.insert(target.to_string());

    let mut stack: Vec<&str> = vec![target];
    while let Some(node) = stack.pop() {
        for child in index.children_of(Some(node)) {
            if removal.insert(child.id.clone()) && child.is_folder() {
                stack.push(child.id.as_str());
            }
        }
    }
    removal
}

/// Ancestors of `id` from the root down, ending with the item itself.
///
/// Stops climbing at a dangling parent reference or a revisited id. Empty if
/// `id` is unknown.
pub fn ancestors<'a>(items: &'a [Item], id: &str) -> Vec<&'a Item> {
    let by_id: HashMap<&str, &Item> = items.iter().map(|i| (i.id.as_str(), i)).collect();
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor = by_id.get(id).copied();
    while let Some(item) = cursor {
        if !seen.insert(item.id.as_str()) {
            break;
        }
        chain.push(item);
        cursor = item
            .parent_id
            .as_deref()
            .and_then(|parent| by_id.get(parent).copied());
    }
    chain.reverse();
    chain
}

/// Depth-first walk from the root, yielding `(depth, item)` pairs.
///
/// Items whose parent does not exist are not reachable from the root; each
/// such subtree is appended afterwards starting at depth 0, so every item
/// appears exactly once.
pub fn walk<'a>(items: &'a [Item]) -> Vec<(usize, &'a Item)> {
    let index = ChildIndex::build(items);
    let mut out = Vec::with_capacity(items.len());
    let mut seen: HashSet<&'a str> = HashSet::new();

    descend(&index, index.children_of(None), &mut seen, &mut out);
    for item in items {
        if !seen.contains(item.id.as_str()) {
            descend(&index, &[item], &mut seen, &mut out);
        }
    }
    out
}

fn descend<'a>(
    index: &ChildIndex<'a>,
    starts: &[&'a Item],
    seen: &mut HashSet<&'a str>,
    out: &mut Vec<(usize, &'a Item)>,
) {
    let mut stack: Vec<(usize, &'a Item)> = starts.iter().rev().map(|item| (0, *item)).collect();
    while let Some((depth, item)) = stack.pop() {
        if !seen.insert(item.id.as_str()) {
            continue;
        }
        out.push((depth, item));
        for child in index.children_of(Some(item.id.as_str())).iter().rev() {
            stack.push((depth + 1, *child));
        }
    }
}
