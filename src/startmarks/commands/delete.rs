use crate::error::Result;
use crate::model::{Item, ItemId};
use crate::store::{ItemStore, StorageBackend};
use std::collections::{HashMap, HashSet};

/// Preview of what a subtree deletion would remove.
/// Used by callers to show a confirmation before calling `run`.
#[derive(Debug)]
pub struct DeletePreview {
    /// The item the user asked to delete
    pub target: Item,
    /// Number of nested items that go with it
    pub descendant_count: usize,
}

/// Ids of `root` and every item nested under it.
///
/// Builds a parent -> children index once, then walks it iteratively. Only
/// folders are expanded; the visited set keeps a corrupted (cyclic) graph from
/// being walked twice. Unknown ids yield an empty set.
pub fn closure(items: &[Item], root: &ItemId) -> HashSet<ItemId> {
    let Some(root_item) = items.iter().find(|item| &item.id == root) else {
        return HashSet::new();
    };

    let mut children: HashMap<&ItemId, Vec<&Item>> = HashMap::new();
    for item in items {
        if let Some(parent) = &item.parent_id {
            children.entry(parent).or_default().push(item);
        }
    }

    let mut visited: HashSet<ItemId> = HashSet::new();
    let mut stack = vec![root_item];

    while let Some(item) = stack.pop() {
        if !visited.insert(item.id.clone()) {
            continue;
        }
        if item.is_folder() {
            if let Some(kids) = children.get(&item.id) {
                stack.extend(kids.iter().copied());
            }
        }
    }

    tracing::debug!(root = %root, size = visited.len(), "computed descendant closure");
    visited
}

/// Returns what deleting `id` would remove, without removing anything.
pub fn preview(items: &[Item], id: &ItemId) -> Option<DeletePreview> {
    let target = items.iter().find(|item| &item.id == id)?.clone();
    let descendant_count = closure(items, id).len().saturating_sub(1);
    Some(DeletePreview {
        target,
        descendant_count,
    })
}

/// Removes `id` and everything nested under it in one store write.
///
/// **Important**: This function does NOT prompt for confirmation. Callers
/// should call `preview()` first and confirm with the user.
///
/// Returns the removed ids; empty (and no write) when `id` is unknown.
pub fn run<B: StorageBackend>(store: &mut ItemStore<B>, id: &ItemId) -> Result<HashSet<ItemId>> {
    let ids = closure(store.snapshot(), id);
    if ids.is_empty() {
        return Ok(ids);
    }
    store.remove(&ids)?;
    Ok(ids)
}
