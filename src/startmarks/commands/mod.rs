//! # Command Layer
//!
//! This module contains the **core business logic** of startmarks. Each
//! command lives in its own submodule as plain functions over domain types.
//!
//! ## Two Kinds of Commands
//!
//! - **Projections** ([`navigate`], [`search`], [`usage::ranked_view`],
//!   [`view`]) take a snapshot (`&[Item]`) and return borrowed items. They are
//!   pure and recomputed on every state change.
//! - **Mutations** ([`delete`], [`usage::record_click`]) take the
//!   [`ItemStore`](crate::store::ItemStore) and go through its `remove` /
//!   `patch` primitives, so every mutation is one persisted write.
//!
//! ## What Commands Do NOT Do
//!
//! - **Prompting**: deletion exposes `preview`; confirming is the caller's job.
//! - **Rendering**: results are items, not strings.
//! - **Network I/O**: icon resolution lives in [`crate::icons`].
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.** Command tests build
//! trees with [`StoreFixture`](crate::store::memory::fixtures::StoreFixture)
//! on top of the in-memory backend.
//!
//! ## Command Modules
//!
//! - [`navigate`]: Children listing and breadcrumbs
//! - [`delete`]: Recursive subtree deletion
//! - [`search`]: Title search across the whole tree
//! - [`usage`]: Click counting and the most-used ranking
//! - [`view`]: Picks the listing for the current display mode

pub mod delete;
pub mod navigate;
pub mod search;
pub mod usage;
pub mod view;
