//! # Startmarks Architecture
//!
//! Startmarks is the bookmark core of a personal start page: a user-curated
//! tree of links and folders, kept in one local key-value slot. It is a
//! **UI-agnostic library**; the page that renders it lives elsewhere.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Single entry point for a UI                              │
//! │  - Wires icon lookups to link creation and deletion         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)            Icons (icons.rs)  │
//! │  - Navigation, search, ranking, views     - Background      │
//! │  - Recursive deletion                       lookups, folded │
//! │                                             back by id      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - ItemStore: owns the collection, the only writer          │
//! │  - StorageBackend: key-value slot (FsBackend, MemBackend)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: One Writer, Whole-Collection Writes
//!
//! Only [`store::ItemStore`] mutates or persists items. Each effective
//! mutation rewrites the full collection once. Reads are projections over
//! [`store::ItemStore::snapshot`], recomputed on demand.
//!
//! ## Icons Never Block
//!
//! Creating a link returns immediately with `icon: None`. The lookup runs as a
//! tokio task and reports back through a channel; the result is applied only
//! if the item still exists. A failed lookup leaves the icon unset for good.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Navigation, deletion, search, usage ranking, views
//! - [`icons`]: Icon lookup boundary and background resolver
//! - [`store`]: Item store and storage backends
//! - [`model`]: `Item`, `ItemKind`, drafts, patches, wire records
//! - [`config`]: Configuration loading
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod icons;
pub mod model;
pub mod store;
