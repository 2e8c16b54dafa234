use super::backend::StorageBackend;
use super::STORAGE_KEY;
use crate::error::{Result, StartmarksError};
use crate::model::{normalize_url, Item, ItemDraft, ItemId, ItemKind, ItemPatch, Link};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Authoritative owner of the item collection.
///
/// The collection is loaded once on [`open`](Self::open) and kept in memory.
/// Every effective mutation computes the next collection, writes it to the
/// backend as one value, and only then swaps it in. A failed write leaves the
/// in-memory state untouched.
pub struct ItemStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    key: String,
    items: Vec<Item>,
}

impl<B: StorageBackend> ItemStore<B> {
    /// Open the store under the default storage key.
    pub fn open(backend: B) -> Result<Self> {
        Self::open_with_key(backend, STORAGE_KEY)
    }

    /// A store with an empty collection, without reading the backend.
    /// The first mutation overwrites whatever the slot held.
    pub fn empty(backend: B) -> Self {
        Self {
            backend,
            key: STORAGE_KEY.to_string(),
            items: Vec::new(),
        }
    }

    pub fn open_with_key(backend: B, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let items = match backend.read_slot(&key)? {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str::<Vec<Item>>(&raw).map_err(StartmarksError::Serialization)?
            }
            _ => Vec::new(),
        };
        tracing::debug!(key = %key, count = items.len(), "loaded item collection");
        Ok(Self {
            backend,
            key,
            items,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The full collection in insertion order.
    pub fn snapshot(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Create an item under `parent` (`None` for the root level).
    ///
    /// Rejects blank titles, links without a url, and parents that are not
    /// existing folders. Nothing is written when validation fails.
    pub fn add(&mut self, draft: ItemDraft, parent: Option<&ItemId>) -> Result<Item> {
        if draft.title().trim().is_empty() {
            return Err(StartmarksError::Validation(
                "Title must not be empty".to_string(),
            ));
        }
        let title = draft.title().to_string();

        if let Some(parent_id) = parent {
            match self.get(parent_id) {
                Some(p) if p.is_folder() => {}
                _ => return Err(StartmarksError::InvalidParent(parent_id.clone())),
            }
        }

        let kind = match draft {
            ItemDraft::Link { url, .. } => {
                if url.trim().is_empty() {
                    return Err(StartmarksError::Validation(
                        "Link must have a url".to_string(),
                    ));
                }
                ItemKind::Link(Link {
                    url: normalize_url(&url),
                    icon: None,
                    click_count: 0,
                })
            }
            ItemDraft::Folder { .. } => ItemKind::Folder,
        };

        let item = Item {
            id: self.fresh_id(),
            title,
            parent_id: parent.cloned(),
            created_at: self.next_timestamp(),
            kind,
        };

        let mut next = self.items.clone();
        next.push(item.clone());
        self.commit(next)?;

        tracing::info!(id = %item.id, title = %item.title, "item created");
        Ok(item)
    }

    /// Remove every item whose id is in `ids` with a single write.
    ///
    /// Unknown ids are ignored. Returns the number of items removed; when that
    /// is zero nothing is written.
    pub fn remove(&mut self, ids: &HashSet<ItemId>) -> Result<usize> {
        let next: Vec<Item> = self
            .items
            .iter()
            .filter(|item| !ids.contains(&item.id))
            .cloned()
            .collect();
        let removed = self.items.len() - next.len();
        if removed == 0 {
            return Ok(0);
        }
        self.commit(next)?;
        tracing::info!(removed, "items removed");
        Ok(removed)
    }

    /// Merge `patch` into the item with `id`.
    ///
    /// Unknown ids and patches that change nothing are no-ops (no write).
    /// Returns whether the item changed.
    pub fn patch(&mut self, id: &ItemId, patch: &ItemPatch) -> Result<bool> {
        let Some(pos) = self.items.iter().position(|item| &item.id == id) else {
            return Ok(false);
        };

        let mut updated = self.items[pos].clone();
        if !updated.apply_patch(patch) {
            return Ok(false);
        }

        let mut next = self.items.clone();
        next[pos] = updated;
        self.commit(next)?;
        Ok(true)
    }

    fn commit(&mut self, next: Vec<Item>) -> Result<()> {
        let content = serde_json::to_string(&next).map_err(StartmarksError::Serialization)?;
        self.backend.write_slot(&self.key, &content)?;
        tracing::debug!(key = %self.key, count = next.len(), "collection persisted");
        self.items = next;
        Ok(())
    }

    fn fresh_id(&self) -> ItemId {
        loop {
            let id = ItemId::generate();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Millisecond-precision "now", never earlier than the newest item.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        let now = DateTime::<Utc>::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
        match self.items.iter().map(|item| item.created_at).max() {
            Some(latest) if latest > now => latest,
            _ => now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn store() -> ItemStore<MemBackend> {
        ItemStore::open(MemBackend::new()).unwrap()
    }

    #[test]
    fn add_link_normalizes_url_and_starts_unclicked() {
        let mut store = store();
        let item = store
            .add(ItemDraft::link("GitHub", "github.com"), None)
            .unwrap();

        let link = item.as_link().unwrap();
        assert_eq!(link.url, "https://github.com");
        assert_eq!(link.icon, None);
        assert_eq!(link.click_count, 0);
        assert_eq!(item.parent_id, None);
        assert_eq!(store.snapshot(), &[item]);
    }

    #[test]
    fn add_rejects_blank_title_without_side_effects() {
        let mut store = store();
        let err = store
            .add(ItemDraft::link("   ", "example.com"), None)
            .unwrap_err();

        assert!(matches!(err, StartmarksError::Validation(_)));
        assert!(store.is_empty());
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn add_keeps_title_as_entered() {
        let mut store = store();
        let item = store
            .add(ItemDraft::folder("  Reading list "), None)
            .unwrap();

        assert_eq!(item.title, "  Reading list ");
        assert_eq!(store.get(&item.id).unwrap().title, "  Reading list ");
    }

    #[test]
    fn add_rejects_link_without_url() {
        let mut store = store();
        let err = store.add(ItemDraft::link("Empty", " "), None).unwrap_err();
        assert!(matches!(err, StartmarksError::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_link_as_parent() {
        let mut store = store();
        let link = store.add(ItemDraft::link("A", "a.com"), None).unwrap();

        let err = store
            .add(ItemDraft::link("B", "b.com"), Some(&link.id))
            .unwrap_err();

        assert!(matches!(err, StartmarksError::InvalidParent(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_rejects_unknown_parent() {
        let mut store = store();
        let ghost = ItemId::from("ghost");
        let err = store.add(ItemDraft::folder("F"), Some(&ghost)).unwrap_err();
        assert!(matches!(err, StartmarksError::InvalidParent(id) if id == ghost));
    }

    #[test]
    fn add_allows_nested_folders() {
        let mut store = store();
        let outer = store.add(ItemDraft::folder("Outer"), None).unwrap();
        let inner = store
            .add(ItemDraft::folder("Inner"), Some(&outer.id))
            .unwrap();
        assert_eq!(inner.parent_id, Some(outer.id));
    }

    #[test]
    fn each_mutation_is_one_write() {
        let mut store = store();
        let a = store.add(ItemDraft::link("A", "a.com"), None).unwrap();
        assert_eq!(store.backend().write_count(), 1);

        store.patch(&a.id, &ItemPatch::icon("x.png")).unwrap();
        assert_eq!(store.backend().write_count(), 2);

        store.remove(&HashSet::from([a.id])).unwrap();
        assert_eq!(store.backend().write_count(), 3);
    }

    #[test]
    fn created_at_is_monotonic() {
        let mut store = store();
        let a = store.add(ItemDraft::folder("A"), None).unwrap();
        let b = store.add(ItemDraft::folder("B"), None).unwrap();
        assert!(b.created_at >= a.created_at);
    }

    #[test]
    fn remove_ignores_unknown_ids() {
        let mut store = store();
        store.add(ItemDraft::folder("Keep"), None).unwrap();
        let writes = store.backend().write_count();

        let removed = store
            .remove(&HashSet::from([ItemId::from("nope")]))
            .unwrap();

        assert_eq!(removed, 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.backend().write_count(), writes);
    }

    #[test]
    fn patch_unknown_id_is_noop() {
        let mut store = store();
        let changed = store
            .patch(&ItemId::from("nope"), &ItemPatch::icon("x"))
            .unwrap();
        assert!(!changed);
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn patch_same_icon_twice_leaves_item_unchanged() {
        let mut store = store();
        let a = store.add(ItemDraft::link("A", "a.com"), None).unwrap();
        let patch = ItemPatch::icon("data:image/png;base64,AAAA");

        assert!(store.patch(&a.id, &patch).unwrap());
        let after_first = store.get(&a.id).cloned();
        assert!(!store.patch(&a.id, &patch).unwrap());

        assert_eq!(store.get(&a.id).cloned(), after_first);
    }

    #[test]
    fn click_count_never_goes_down_through_patch() {
        let mut store = store();
        let a = store.add(ItemDraft::link("A", "a.com"), None).unwrap();
        for _ in 0..5 {
            store.patch(&a.id, &ItemPatch::click()).unwrap();
        }

        let writes = store.backend().write_count();
        assert!(!store.patch(&a.id, &ItemPatch::default()).unwrap());
        store.patch(&a.id, &ItemPatch::icon("a.png")).unwrap();

        assert_eq!(store.get(&a.id).unwrap().click_count(), Some(5));
        assert_eq!(store.backend().write_count(), writes + 1);
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        let mut store = store();
        store.add(ItemDraft::folder("Existing"), None).unwrap();
        store.backend().set_simulate_write_error(true);

        let result = store.add(ItemDraft::folder("Lost"), None);

        assert!(result.is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot()[0].title, "Existing");
    }

    #[test]
    fn reopen_reads_persisted_collection() {
        let mut store = store();
        let folder = store.add(ItemDraft::folder("Work"), None).unwrap();
        store
            .add(ItemDraft::link("Mail", "mail.example.com"), Some(&folder.id))
            .unwrap();
        let raw = store.backend().raw_slot(STORAGE_KEY).unwrap();

        let reopened = ItemStore::open(MemBackend::with_slot(STORAGE_KEY, &raw)).unwrap();

        assert_eq!(reopened.snapshot(), store.snapshot());
    }

    #[test]
    fn persisted_format_is_a_json_array_of_records() {
        let mut store = store();
        store.add(ItemDraft::link("Docs", "docs.rs"), None).unwrap();

        let raw = store.backend().raw_slot(STORAGE_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["type"], "link");
        assert_eq!(records[0]["url"], "https://docs.rs");
        assert_eq!(records[0]["clickCount"], 0);
        assert!(records[0]["parentId"].is_null());
        assert!(records[0]["createdAt"].is_i64());
    }

    #[test]
    fn open_rejects_corrupt_collection() {
        let backend = MemBackend::with_slot(STORAGE_KEY, "{not json");
        assert!(matches!(
            ItemStore::open(backend),
            Err(StartmarksError::Serialization(_))
        ));
    }
}
