//! # API Facade
//!
//! The API layer is a **thin facade** over the store and the command layer.
//! It is the single entry point a UI talks to.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the [`ItemStore`] (the only writer) and the optional [`IconResolver`]
//! - **Dispatches** reads and mutations to the command functions
//! - **Wires side effects** that span components: a new link schedules an
//!   icon lookup; a deletion cancels lookups for everything it removed
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs` and the store
//! - **Rendering**: Returns items, not strings
//! - **Blocking on icons**: `add_link` returns before any lookup finishes
//!
//! ## Generic Over StorageBackend
//!
//! `StartmarksApi<B: StorageBackend>` is generic over the backend:
//! - Production: `StartmarksApi<FsBackend>` via [`StartmarksApi::open`]
//! - Testing: `StartmarksApi<MemBackend>`
//!
//! ## Icon Results
//!
//! Lookups finish on the tokio runtime and queue their results. The owner
//! folds them in with [`StartmarksApi::apply_icon_results`] (non-blocking,
//! e.g. once per UI tick) or awaits them with
//! [`StartmarksApi::next_icon_result`].

use std::collections::HashSet;
use std::sync::Arc;

use crate::commands::delete::{self, DeletePreview};
use crate::commands::view::{self, ViewMode};
use crate::commands::{navigate, search, usage};
use crate::config::StartmarksConfig;
use crate::error::Result;
use crate::icons::{self, HttpIconLookup, IconResolution, IconResolver};
use crate::model::{Item, ItemDraft, ItemId};
use crate::store::fs_backend::FsBackend;
use crate::store::{ItemStore, StorageBackend};

/// The main API facade for bookmark operations.
pub struct StartmarksApi<B: StorageBackend> {
    store: ItemStore<B>,
    icons: Option<IconResolver>,
}

impl StartmarksApi<FsBackend> {
    /// Production stack: filesystem backend under the configured data
    /// directory, plus HTTP icon lookups when enabled.
    pub fn open(config: &StartmarksConfig) -> Result<Self> {
        let backend = FsBackend::new(config.data_dir()?);
        let store = ItemStore::open_with_key(backend, config.storage_key.clone())?;
        let icons = if config.resolve_icons {
            let lookup = HttpIconLookup::new(config.icon_endpoint.clone(), config.icon_timeout())?;
            Some(IconResolver::new(Arc::new(lookup), config.icon_timeout()))
        } else {
            None
        };
        Ok(Self::new(store, icons))
    }
}

impl<B: StorageBackend> StartmarksApi<B> {
    pub fn new(store: ItemStore<B>, icons: Option<IconResolver>) -> Self {
        Self { store, icons }
    }

    pub fn store(&self) -> &ItemStore<B> {
        &self.store
    }

    pub fn snapshot(&self) -> &[Item] {
        self.store.snapshot()
    }

    // --- Mutations ---

    /// Create a link under `parent` and, when a resolver is configured, start
    /// looking up its icon. Must run inside a tokio runtime in that case.
    pub fn add_link(
        &mut self,
        parent: Option<&ItemId>,
        title: &str,
        url: &str,
    ) -> Result<Item> {
        let item = self.store.add(ItemDraft::link(title, url), parent)?;
        if let (Some(resolver), Some(link)) = (self.icons.as_mut(), item.as_link()) {
            resolver.spawn(item.id.clone(), link.url.clone());
        }
        Ok(item)
    }

    pub fn add_folder(&mut self, parent: Option<&ItemId>, title: &str) -> Result<Item> {
        self.store.add(ItemDraft::folder(title), parent)
    }

    /// What `delete` would remove, for a confirmation prompt.
    pub fn delete_preview(&self, id: &ItemId) -> Option<DeletePreview> {
        delete::preview(self.store.snapshot(), id)
    }

    /// Remove `id` and everything under it. Pending icon lookups for the
    /// removed items are cancelled.
    pub fn delete(&mut self, id: &ItemId) -> Result<HashSet<ItemId>> {
        let removed = delete::run(&mut self.store, id)?;
        if let Some(resolver) = self.icons.as_mut() {
            for removed_id in &removed {
                resolver.cancel(removed_id);
            }
        }
        Ok(removed)
    }

    /// Count a visit and hand back the url to open. `None` for folders and
    /// unknown ids.
    pub fn open_link(&mut self, id: &ItemId) -> Result<Option<String>> {
        if usage::record_click(&mut self.store, id)?.is_none() {
            return Ok(None);
        }
        Ok(self
            .store
            .get(id)
            .and_then(Item::as_link)
            .map(|link| link.url.clone()))
    }

    // --- Projections ---

    pub fn children(&self, folder: Option<&ItemId>) -> Vec<&Item> {
        navigate::children_of(self.store.snapshot(), folder)
    }

    pub fn breadcrumbs(&self, folder: Option<&ItemId>) -> Vec<&Item> {
        navigate::breadcrumbs(self.store.snapshot(), folder)
    }

    pub fn search(&self, query: &str) -> Vec<&Item> {
        search::run(self.store.snapshot(), query)
    }

    pub fn most_used(&self) -> Vec<&Item> {
        usage::ranked_view(self.store.snapshot())
    }

    pub fn view(&self, mode: &ViewMode) -> Vec<&Item> {
        view::display_items(self.store.snapshot(), mode)
    }

    // --- Icon results ---

    pub fn pending_icons(&self) -> usize {
        self.icons.as_ref().map_or(0, IconResolver::pending_count)
    }

    /// Fold every finished lookup into the store without waiting.
    /// Returns how many items got an icon.
    pub fn apply_icon_results(&mut self) -> Result<usize> {
        let Some(resolver) = self.icons.as_mut() else {
            return Ok(0);
        };
        let mut applied = 0;
        while let Some(resolution) = resolver.try_next() {
            if icons::apply(&mut self.store, resolution)? {
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Wait for the next lookup to finish and fold it in.
    /// Returns `None` once no lookups are pending.
    pub async fn next_icon_result(&mut self) -> Result<Option<IconResolution>> {
        let Some(resolver) = self.icons.as_mut() else {
            return Ok(None);
        };
        let Some(resolution) = resolver.next().await else {
            return Ok(None);
        };
        icons::apply(&mut self.store, resolution.clone())?;
        Ok(Some(resolution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn api() -> StartmarksApi<crate::store::mem_backend::MemBackend> {
        StartmarksApi::new(InMemoryStore::new(), None)
    }

    #[test]
    fn add_and_list_children() {
        let mut api = api();
        let work = api.add_folder(None, "Work").unwrap();
        api.add_link(Some(&work.id), "Mail", "mail.example.com")
            .unwrap();

        assert_eq!(api.children(None).len(), 1);
        assert_eq!(api.children(Some(&work.id))[0].title, "Mail");
        assert_eq!(api.pending_icons(), 0);
    }

    #[test]
    fn open_link_counts_and_returns_url() {
        let mut api = api();
        let link = api.add_link(None, "Docs", "docs.rs").unwrap();

        let url = api.open_link(&link.id).unwrap();

        assert_eq!(url.as_deref(), Some("https://docs.rs"));
        assert_eq!(api.most_used()[0].click_count(), Some(1));
    }

    #[test]
    fn open_folder_returns_none() {
        let mut api = api();
        let folder = api.add_folder(None, "F").unwrap();
        assert_eq!(api.open_link(&folder.id).unwrap(), None);
    }

    #[test]
    fn delete_dispatches_to_subtree_removal() {
        let mut api = api();
        let work = api.add_folder(None, "Work").unwrap();
        api.add_link(Some(&work.id), "Mail", "mail.com").unwrap();

        assert_eq!(api.delete_preview(&work.id).unwrap().descendant_count, 1);
        assert_eq!(api.delete(&work.id).unwrap().len(), 2);
        assert!(api.snapshot().is_empty());
    }

    #[test]
    fn apply_icon_results_without_resolver_is_zero() {
        let mut api = api();
        assert_eq!(api.apply_icon_results().unwrap(), 0);
    }
}
