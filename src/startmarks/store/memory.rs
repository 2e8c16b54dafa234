use super::item_store::ItemStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = ItemStore<MemBackend>;

impl InMemoryStore {
    pub fn new() -> Self {
        Self::empty(MemBackend::new())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Item, ItemDraft, ItemId};

    /// Builder for stores with a known shape. Items are looked up by title.
    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_folder(mut self, title: &str, parent: Option<&str>) -> Self {
            let parent_id = parent.map(|p| self.id_of(p));
            self.store
                .add(ItemDraft::folder(title), parent_id.as_ref())
                .unwrap();
            self
        }

        pub fn with_link(mut self, title: &str, url: &str, parent: Option<&str>) -> Self {
            let parent_id = parent.map(|p| self.id_of(p));
            self.store
                .add(ItemDraft::link(title, url), parent_id.as_ref())
                .unwrap();
            self
        }

        /// Id of the first item with `title`. Panics if there is none.
        pub fn id_of(&self, title: &str) -> ItemId {
            self.item(title).id.clone()
        }

        pub fn item(&self, title: &str) -> &Item {
            self.store
                .snapshot()
                .iter()
                .find(|item| item.title == title)
                .unwrap_or_else(|| panic!("no item titled {:?}", title))
        }
    }
}
