//! Visible-item derivation: selection allow-list, free-text search and
//! category grouping.
//!
//! Everything here is a pure function of its inputs so the renderer can
//! call it on every frame without side effects.

use std::collections::HashSet;

use crate::model::Item;

/// Output of [`arrange`]: either one flat sequence or category buckets.
#[derive(Debug, PartialEq)]
pub enum Arrangement<'a> {
    /// Ungrouped, filtered items in original order.
    Flat(Vec<&'a Item>),
    /// `(category, items)` buckets in first-seen category order.
    Grouped(Vec<(String, Vec<&'a Item>)>),
}

impl<'a> Arrangement<'a> {
    /// Total number of visible items across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(items) => items.len(),
            Self::Grouped(groups) => groups.iter().map(|(_, items)| items.len()).sum(),
        }
    }

    /// True when nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visible items flattened back into a single sequence, preserving
    /// display order.
    #[must_use]
    pub fn flattened(&self) -> Vec<&'a Item> {
        match self {
            Self::Flat(items) => items.clone(),
            Self::Grouped(groups) => groups
                .iter()
                .flat_map(|(_, items)| items.iter().copied())
                .collect(),
        }
    }
}

/// Restricts `items` to the explicit selection, then applies the search
/// term.
///
/// An empty selection yields an empty result: rendering is opt-in, "no
/// selection" is not "show all". The search term matches
/// case-insensitively as a substring against name, description, category
/// and url; an empty term matches everything.
#[must_use]
pub fn visible_items<'a>(items: &'a [Item], selection: &[String], search: &str) -> Vec<&'a Item> {
    if selection.is_empty() {
        return Vec::new();
    }
    let selected: HashSet<&str> = selection.iter().map(String::as_str).collect();
    let term = search.trim().to_lowercase();

    items
        .iter()
        .filter(|item| selected.contains(item.id.as_str()))
        .filter(|item| term.is_empty() || matches_term(item, &term))
        .collect()
}

fn matches_term(item: &Item, term: &str) -> bool {
    [
        item.name.as_deref(),
        item.description.as_deref(),
        item.category.as_deref(),
        item.url.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(term))
}

/// Buckets items by category in first-seen order, preserving relative
/// order within each bucket. Absent or empty categories land in the
/// "Uncategorized" bucket.
#[must_use]
pub fn group_by_category<'a>(items: &[&'a Item]) -> Vec<(String, Vec<&'a Item>)> {
    let mut groups: Vec<(String, Vec<&'a Item>)> = Vec::new();
    for item in items {
        let key = item.category_key();
        match groups.iter_mut().find(|(name, _)| name == key) {
            Some((_, bucket)) => bucket.push(item),
            None => groups.push((key.to_string(), vec![item])),
        }
    }
    groups
}

/// Full filter/group pipeline used by the renderer.
#[must_use]
pub fn arrange<'a>(
    items: &'a [Item],
    selection: &[String],
    search: &str,
    group: bool,
) -> Arrangement<'a> {
    let visible = visible_items(items, selection, search);
    if group {
        Arrangement::Grouped(group_by_category(&visible))
    } else {
        Arrangement::Flat(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(id: &str, name: &str, category: &str) -> Item {
        Item {
            name: Some(name.to_string()),
            category: (!category.is_empty()).then(|| category.to_string()),
            ..Item::new(id)
        }
    }

    fn ids(items: &[&Item]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn empty_selection_shows_nothing() {
        let items = vec![item("x", "Sonarr", "Media"), item("y", "Radarr", "Media")];
        assert!(visible_items(&items, &[], "").is_empty());
        assert!(visible_items(&items, &[], "sonarr").is_empty());
    }

    #[test]
    fn selection_restricts_to_ids() {
        let items = vec![
            item("x", "Sonarr", "Media"),
            item("y", "Radarr", "Media"),
            item("z", "Grafana", "Monitoring"),
        ];
        let selection = vec!["x".to_string(), "z".to_string()];
        let visible = visible_items(&items, &selection, "");
        assert_eq!(ids(&visible), vec!["x", "z"]);
    }

    #[test]
    fn search_matches_any_of_four_fields() {
        let mut target = item("x", "Sonarr", "Media");
        target.description = Some("TV automation".to_string());
        target.url = Some("http://nas.local:8989".to_string());
        let items = vec![target, item("y", "Radarr", "Media")];
        let selection = vec!["x".to_string(), "y".to_string()];

        // name, case-insensitive
        assert_eq!(ids(&visible_items(&items, &selection, "SONA")), vec!["x"]);
        // description
        assert_eq!(
            ids(&visible_items(&items, &selection, "automation")),
            vec!["x"]
        );
        // url
        assert_eq!(ids(&visible_items(&items, &selection, "8989")), vec!["x"]);
        // category matches both
        assert_eq!(
            ids(&visible_items(&items, &selection, "media")),
            vec!["x", "y"]
        );
        // no match
        assert!(visible_items(&items, &selection, "plex").is_empty());
    }

    #[test]
    fn grouping_uses_first_seen_order() {
        let items = vec![
            item("x", "Sonarr", "A"),
            item("y", "Radarr", "B"),
            item("z", "Lidarr", "A"),
        ];
        let selection: Vec<String> = ["x", "y", "z"].iter().map(ToString::to_string).collect();

        let Arrangement::Grouped(groups) = arrange(&items, &selection, "", true) else {
            panic!("expected grouped arrangement");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "A");
        assert_eq!(ids(&groups[0].1), vec!["x", "z"]);
        assert_eq!(groups[1].0, "B");
        assert_eq!(ids(&groups[1].1), vec!["y"]);
    }

    #[test]
    fn two_categories_two_items_scenario() {
        let items = vec![item("x", "X", "A"), item("y", "Y", "B")];
        let selection = vec!["x".to_string(), "y".to_string()];
        let Arrangement::Grouped(groups) = arrange(&items, &selection, "", true) else {
            panic!("expected grouped arrangement");
        };
        assert_eq!(groups[0].0, "A");
        assert_eq!(ids(&groups[0].1), vec!["x"]);
        assert_eq!(groups[1].0, "B");
        assert_eq!(ids(&groups[1].1), vec!["y"]);
    }

    #[test]
    fn missing_category_buckets_as_uncategorized() {
        let items = vec![item("x", "X", ""), item("y", "Y", "A")];
        let selection = vec!["x".to_string(), "y".to_string()];
        let Arrangement::Grouped(groups) = arrange(&items, &selection, "", true) else {
            panic!("expected grouped arrangement");
        };
        assert_eq!(groups[0].0, "Uncategorized");
        assert_eq!(groups[1].0, "A");
    }

    #[test]
    fn ungrouped_arrangement_is_flat() {
        let items = vec![item("x", "X", "A"), item("y", "Y", "B")];
        let selection = vec!["x".to_string(), "y".to_string()];
        let arrangement = arrange(&items, &selection, "", false);
        assert_eq!(arrangement.len(), 2);
        assert!(matches!(arrangement, Arrangement::Flat(_)));
    }

    proptest! {
        #[test]
        fn empty_selection_always_empty(
            item_ids in proptest::collection::vec("[a-z]{1,8}", 0..20),
            search in "[a-z]{0,8}",
        ) {
            let items: Vec<Item> = item_ids.iter().map(|id| Item::new(id.clone())).collect();
            prop_assert!(visible_items(&items, &[], &search).is_empty());
        }

        #[test]
        fn visible_is_subset_of_selection(
            item_ids in proptest::collection::vec("[a-z]{1,8}", 0..20),
            selection in proptest::collection::vec("[a-z]{1,8}", 0..10),
            search in "[a-z]{0,4}",
        ) {
            let items: Vec<Item> = item_ids.iter().map(|id| Item::new(id.clone())).collect();
            let visible = visible_items(&items, &selection, &search);
            for shown in visible {
                prop_assert!(selection.contains(&shown.id));
            }
        }

        #[test]
        fn grouping_is_idempotent(
            specs in proptest::collection::vec(("[a-z]{1,6}", "[A-C]"), 0..20),
        ) {
            let items: Vec<Item> = specs
                .iter()
                .enumerate()
                .map(|(index, (id, cat))| Item {
                    category: Some(cat.clone()),
                    ..Item::new(format!("{id}-{index}"))
                })
                .collect();
            let selection: Vec<String> = items.iter().map(|i| i.id.clone()).collect();

            let first = arrange(&items, &selection, "", true);
            let second = arrange(&items, &selection, "", true);
            prop_assert_eq!(first, second);
        }
    }
}
