//! # Storage Layer
//!
//! The item collection lives in a single key-value slot. The backend only
//! moves strings in and out of that slot; [`item_store::ItemStore`] owns the
//! collection, validates mutations, and is the only code that writes.
//!
//! ## Write Model
//!
//! - The whole collection is loaded once when the store is opened.
//! - Every effective mutation (`add`, `remove`, `patch`) serializes the full
//!   collection and writes it with one `write_slot` call.
//! - No-op mutations (unknown ids, patches that change nothing) do not write.
//! - The in-memory collection is replaced only after the write succeeds, so a
//!   failing backend never leaves the store half-updated.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: Production backend, one `<key>.json` file per
//!   slot, written atomically (temp file + rename).
//! - [`mem_backend::MemBackend`]: In-memory backend for tests, with write
//!   counting and write-error simulation.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! └── simplestart-enhanced-bookmarks.json   # JSON array of item records
//! ```

pub mod backend;
pub mod fs_backend;
pub mod item_store;
pub mod mem_backend;
pub mod memory;

/// Slot holding the bookmark collection.
pub const STORAGE_KEY: &str = "simplestart-enhanced-bookmarks";

pub use backend::StorageBackend;
pub use item_store::ItemStore;
