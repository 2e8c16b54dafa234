use crate::error::Result;

/// Abstract interface for the persistence substrate.
///
/// A backend is a plain key-value store of strings. It knows nothing about
/// items: [`ItemStore`](super::item_store::ItemStore) serializes the whole
/// collection and hands the backend one value per write.
pub trait StorageBackend {
    /// Read the value stored under `key`.
    /// Returns Ok(None) if the slot has never been written.
    fn read_slot(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    /// MUST be atomic: a reader sees either the old or the new value, never a mix.
    fn write_slot(&self, key: &str, value: &str) -> Result<()>;
}
