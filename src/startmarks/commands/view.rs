use crate::model::{Item, ItemId};

use super::{navigate, search, usage};

/// Which listing the start page is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    /// Children of a folder, or of the root level when `None`.
    Folder(Option<ItemId>),
    /// Every link, most clicked first.
    MostUsed,
    /// Links matching a title query across the whole tree.
    Search(String),
}

impl Default for ViewMode {
    fn default() -> Self {
        Self::Folder(None)
    }
}

/// Items to display for `mode`.
///
/// A blank search query falls back to the root listing, the same as clearing
/// the search box.
pub fn display_items<'a>(items: &'a [Item], mode: &ViewMode) -> Vec<&'a Item> {
    match mode {
        ViewMode::Search(query) if !query.trim().is_empty() => search::run(items, query),
        ViewMode::Search(_) => navigate::children_of(items, None),
        ViewMode::MostUsed => usage::ranked_view(items),
        ViewMode::Folder(folder) => navigate::children_of(items, folder.as_ref()),
    }
}
