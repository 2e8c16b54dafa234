use crate::error::Result;
use crate::model::{Item, ItemId, ItemPatch};
use crate::store::{ItemStore, StorageBackend};

/// Counts one visit of the link with `id`.
///
/// Returns the new count, or `None` when `id` is unknown or not a link (no write).
pub fn record_click<B: StorageBackend>(
    store: &mut ItemStore<B>,
    id: &ItemId,
) -> Result<Option<u64>> {
    if store.get(id).and_then(Item::click_count).is_none() {
        return Ok(None);
    }
    store.patch(id, &ItemPatch::click())?;
    Ok(store.get(id).and_then(Item::click_count))
}

/// Every link, most clicked first. Ties keep snapshot order.
pub fn ranked_view(items: &[Item]) -> Vec<&Item> {
    let mut links: Vec<&Item> = items.iter().filter(|item| item.is_link()).collect();
    // sort_by_key is stable
    links.sort_by_key(|item| std::cmp::Reverse(item.click_count().unwrap_or(0)));
    links
}
