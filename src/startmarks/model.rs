//! # Domain Model: Items, Links and Folders
//!
//! Everything the user curates is an [`Item`]: either a link or a folder. Both
//! share the same envelope (id, title, parent, creation time) and differ only in
//! what [`ItemKind`] carries.
//!
//! ## Persisted Shape
//!
//! Items are stored as one flat JSON array. Each record looks like:
//!
//! ```text
//! {
//!   "id": "3f0c…",            // opaque string, never reused
//!   "type": "link",           // or "folder"
//!   "title": "Mail",
//!   "url": "https://mail.example.com",   // links only
//!   "icon": "data:image/png;base64,…",   // links only, optional
//!   "parentId": null,         // or the id of a folder
//!   "createdAt": 1718000000000,          // epoch milliseconds
//!   "clickCount": 3           // links only, missing means 0
//! }
//! ```
//!
//! The in-memory type is a proper sum type; [`ItemRecord`] is the flat wire
//! shape and the conversion between the two is where corrupt records are
//! rejected (a link without a url, an unknown type tag).
//!
//! ## URL Normalization
//!
//! Users type bare hosts ("github.com"). [`normalize_url`] prefixes
//! `https://` unless the input already starts with a `scheme://` prefix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{Result, StartmarksError};

/// Opaque item identifier.
///
/// Fresh ids are UUIDv4 strings, but any string read back from storage is
/// accepted as-is so collections written by older clients keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub icon: Option<String>,
    pub click_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Link(Link),
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub parent_id: Option<ItemId>,
    pub created_at: DateTime<Utc>,
    pub kind: ItemKind,
}

impl Item {
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, ItemKind::Folder)
    }

    pub fn is_link(&self) -> bool {
        matches!(self.kind, ItemKind::Link(_))
    }

    pub fn as_link(&self) -> Option<&Link> {
        match &self.kind {
            ItemKind::Link(link) => Some(link),
            ItemKind::Folder => None,
        }
    }

    /// Click count for links, `None` for folders.
    pub fn click_count(&self) -> Option<u64> {
        self.as_link().map(|l| l.click_count)
    }

    /// Merges the patch into this item. Returns whether anything changed.
    ///
    /// Link-only fields are ignored on folders.
    pub fn apply_patch(&mut self, patch: &ItemPatch) -> bool {
        let ItemKind::Link(link) = &mut self.kind else {
            return false;
        };

        let mut changed = false;
        if let Some(icon) = &patch.icon {
            if link.icon.as_ref() != Some(icon) {
                link.icon = Some(icon.clone());
                changed = true;
            }
        }
        let count = link.click_count.saturating_add(patch.clicks);
        if count != link.click_count {
            link.click_count = count;
            changed = true;
        }
        changed
    }
}

/// What the caller provides to create an item. Id, timestamp and parent are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDraft {
    Link { title: String, url: String },
    Folder { title: String },
}

impl ItemDraft {
    pub fn link(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Link {
            title: title.into(),
            url: url.into(),
        }
    }

    pub fn folder(title: impl Into<String>) -> Self {
        Self::Folder {
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Link { title, .. } | Self::Folder { title } => title,
        }
    }
}

/// Partial update for an existing item. `None` fields are left untouched.
///
/// Click counts only grow: `clicks` is added to the current count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub icon: Option<String>,
    pub clicks: u64,
}

impl ItemPatch {
    pub fn icon(icon: impl Into<String>) -> Self {
        Self {
            icon: Some(icon.into()),
            ..Default::default()
        }
    }

    /// One more visit.
    pub fn click() -> Self {
        Self {
            clicks: 1,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.icon.is_none() && self.clicks == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Link,
    Folder,
}

/// Flat wire shape of an [`Item`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_count: Option<u64>,
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        let (record_type, url, icon, click_count) = match item.kind {
            ItemKind::Link(link) => (
                RecordType::Link,
                Some(link.url),
                link.icon,
                Some(link.click_count),
            ),
            ItemKind::Folder => (RecordType::Folder, None, None, None),
        };
        Self {
            id: item.id.0,
            record_type,
            title: item.title,
            url,
            icon,
            parent_id: item.parent_id.map(|p| p.0),
            created_at: item.created_at,
            click_count,
        }
    }
}

impl TryFrom<ItemRecord> for Item {
    type Error = StartmarksError;

    fn try_from(record: ItemRecord) -> Result<Self> {
        let kind = match record.record_type {
            RecordType::Link => {
                let url = record
                    .url
                    .filter(|u| !u.trim().is_empty())
                    .ok_or_else(|| StartmarksError::CorruptRecord {
                        id: record.id.clone(),
                        reason: "link has no url".to_string(),
                    })?;
                ItemKind::Link(Link {
                    url,
                    icon: record.icon,
                    click_count: record.click_count.unwrap_or(0),
                })
            }
            RecordType::Folder => ItemKind::Folder,
        };

        Ok(Self {
            id: ItemId(record.id),
            title: record.title,
            parent_id: record.parent_id.map(ItemId),
            created_at: record.created_at,
            kind,
        })
    }
}

/// Prefixes `https://` to inputs that carry no `scheme://` prefix.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
