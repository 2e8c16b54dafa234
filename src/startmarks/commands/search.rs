use crate::model::Item;

/// Links whose title contains `query`, case-insensitively, across the whole tree.
///
/// Hierarchy is ignored and folders are never returned. A blank query matches
/// nothing. Results keep snapshot order; there is no ranking.
pub fn run<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let term_lower = query.to_lowercase();

    items
        .iter()
        .filter(|item| item.is_link() && item.title.to_lowercase().contains(&term_lower))
        .collect()
}
