use crate::model::{Item, ItemId};
use std::collections::{HashMap, HashSet};

/// Items directly under `parent` (`None` for the root level), in insertion order.
pub fn children_of<'a>(items: &'a [Item], parent: Option<&ItemId>) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|item| item.parent_id.as_ref() == parent)
        .collect()
}

/// Folder chain from the root level down to `folder`, inclusive.
///
/// The root itself is not an entry, so `None` yields an empty chain. The walk
/// stops after visiting every item once, so a corrupted parent graph (a cycle,
/// or a parent pointing at a link) cannot loop forever.
pub fn breadcrumbs<'a>(items: &'a [Item], folder: Option<&ItemId>) -> Vec<&'a Item> {
    let Some(start) = folder else {
        return Vec::new();
    };

    let by_id: HashMap<&ItemId, &Item> = items.iter().map(|item| (&item.id, item)).collect();
    let mut visited: HashSet<&ItemId> = HashSet::new();
    let mut chain = Vec::new();
    let mut current = by_id.get(start).copied();

    while let Some(item) = current {
        if !item.is_folder() {
            tracing::warn!(id = %item.id, "breadcrumb walk reached a non-folder item");
            break;
        }
        if !visited.insert(&item.id) || chain.len() >= items.len() {
            tracing::warn!(id = %item.id, "breadcrumb walk hit a cycle");
            break;
        }
        chain.push(item);
        current = item
            .parent_id
            .as_ref()
            .and_then(|parent| by_id.get(parent).copied());
    }

    chain.reverse();
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKind;
    use crate::store::memory::fixtures::StoreFixture;

    fn titles(items: &[&Item]) -> Vec<String> {
        items.iter().map(|item| item.title.clone()).collect()
    }

    #[test]
    fn children_of_root_keeps_insertion_order() {
        let fixture = StoreFixture::new()
            .with_link("Zeta", "z.com", None)
            .with_folder("Alpha", None)
            .with_link("Nested", "n.com", Some("Alpha"))
            .with_link("Beta", "b.com", None);

        let children = children_of(fixture.store.snapshot(), None);

        assert_eq!(titles(&children), vec!["Zeta", "Alpha", "Beta"]);
    }

    #[test]
    fn children_of_folder() {
        let fixture = StoreFixture::new()
            .with_folder("Work", None)
            .with_link("Mail", "mail.com", Some("Work"))
            .with_link("Home", "home.com", None)
            .with_link("Docs", "docs.com", Some("Work"));
        let work = fixture.id_of("Work");

        let children = children_of(fixture.store.snapshot(), Some(&work));

        assert_eq!(titles(&children), vec!["Mail", "Docs"]);
    }

    #[test]
    fn children_of_unknown_folder_is_empty() {
        let fixture = StoreFixture::new().with_link("A", "a.com", None);
        assert!(children_of(fixture.store.snapshot(), Some(&ItemId::from("nope"))).is_empty());
    }

    #[test]
    fn breadcrumbs_root_to_leaf() {
        let fixture = StoreFixture::new()
            .with_folder("F1", None)
            .with_folder("F2", Some("F1"))
            .with_folder("F3", Some("F2"));
        let f3 = fixture.id_of("F3");

        let chain = breadcrumbs(fixture.store.snapshot(), Some(&f3));

        assert_eq!(titles(&chain), vec!["F1", "F2", "F3"]);
    }

    #[test]
    fn breadcrumbs_at_root_is_empty() {
        let fixture = StoreFixture::new().with_folder("F1", None);
        assert!(breadcrumbs(fixture.store.snapshot(), None).is_empty());
    }

    #[test]
    fn breadcrumbs_terminates_on_cycle() {
        let fixture = StoreFixture::new()
            .with_folder("A", None)
            .with_folder("B", Some("A"));
        let mut items = fixture.store.snapshot().to_vec();
        // Corrupt the graph: A's parent becomes B.
        items[0].parent_id = Some(items[1].id.clone());
        let b = items[1].id.clone();

        let chain = breadcrumbs(&items, Some(&b));

        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn breadcrumbs_stops_at_link() {
        let fixture = StoreFixture::new().with_link("L", "l.com", None);
        let items = fixture.store.snapshot();
        assert!(matches!(items[0].kind, ItemKind::Link(_)));

        assert!(breadcrumbs(items, Some(&items[0].id)).is_empty());
    }
}
