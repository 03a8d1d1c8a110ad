//! Derived views over the item collection.
//!
//! Every function here is pure and recomputes from the slices it is given.
//! Nothing is cached or maintained incrementally; at the expected volumes
//! (tens to low thousands of items) a linear scan per read is fine.

use crate::{Category, CategoryId, Entity, StorageItem, StorageItemId, StorageSpace};
use serde::Serialize;

/// Default number of items returned by [`recent_items`].
pub const DEFAULT_RECENT_LIMIT: usize = 10;

// ============================================================================
// SEARCH
// ============================================================================

/// True when `item` passes the search predicate.
///
/// The text part matches when `query` is empty or is a case-insensitive
/// substring of the name or the description. The category part matches
/// when no filter is given or one of the item's category snapshots has the
/// filter's id.
pub fn matches_search(item: &StorageItem, query: &str, category: Option<CategoryId>) -> bool {
    let text_matches = query.is_empty() || {
        let needle = query.to_lowercase();
        item.name.to_lowercase().contains(&needle)
            || item
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    };
    text_matches && category.map_or(true, |id| item.has_category(id))
}

/// Filter `items` by free text and an optional category, keeping order.
pub fn search<'a>(
    items: &'a [StorageItem],
    query: &str,
    category: Option<CategoryId>,
) -> Vec<&'a StorageItem> {
    items
        .iter()
        .filter(|item| matches_search(item, query, category))
        .collect()
}

/// Map a position in a derived view back to the identity of the item
/// shown there.
pub fn resolve_view_index(view: &[&StorageItem], index: usize) -> Option<StorageItemId> {
    view.get(index).map(|item| item.id())
}

// ============================================================================
// DISTRIBUTIONS
// ============================================================================

/// `count / total * 100`, or 0 for an empty collection.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// Row key of the category distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CategoryBucket {
    Category(Category),
    /// Items with an empty category list.
    Uncategorized,
}

impl CategoryBucket {
    pub fn label(&self) -> &str {
        match self {
            Self::Category(category) => &category.name,
            Self::Uncategorized => "Uncategorized",
        }
    }
}

/// One row of [`category_distribution`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub bucket: CategoryBucket,
    pub count: usize,
    pub percentage: f64,
}

/// One row of [`storage_distribution`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageShare {
    pub space: StorageSpace,
    pub count: usize,
    pub percentage: f64,
}

/// Per-category item counts in category-collection order, followed by an
/// `Uncategorized` row when any item has no category.
///
/// An item tagged with several categories counts once in each, so the
/// percentages only sum to 100 when every item has at most one category.
pub fn category_distribution(
    items: &[StorageItem],
    categories: &[Category],
) -> Vec<CategoryShare> {
    let total = items.len();
    let mut rows: Vec<CategoryShare> = categories
        .iter()
        .map(|category| {
            let count = items
                .iter()
                .filter(|item| item.has_category(category.id()))
                .count();
            CategoryShare {
                bucket: CategoryBucket::Category(category.clone()),
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();

    let uncategorized = items.iter().filter(|item| item.is_uncategorized()).count();
    if uncategorized > 0 {
        rows.push(CategoryShare {
            bucket: CategoryBucket::Uncategorized,
            count: uncategorized,
            percentage: percentage(uncategorized, total),
        });
    }
    rows
}

/// Per-space item counts in space-collection order, matched by the id of
/// each item's storage-space snapshot.
pub fn storage_distribution(items: &[StorageItem], spaces: &[StorageSpace]) -> Vec<StorageShare> {
    let total = items.len();
    spaces
        .iter()
        .map(|space| {
            let count = items
                .iter()
                .filter(|item| item.storage_space.id() == space.id())
                .count();
            StorageShare {
                space: space.clone(),
                count,
                percentage: percentage(count, total),
            }
        })
        .collect()
}

// ============================================================================
// RECENT ITEMS & OVERVIEW
// ============================================================================

/// The last `limit` items, newest first.
///
/// Items carry no creation timestamp, so "recent" means "appended last".
pub fn recent_items(items: &[StorageItem], limit: usize) -> Vec<&StorageItem> {
    items.iter().rev().take(limit).collect()
}

/// Headline counts for the statistics screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InventoryOverview {
    pub total_items: usize,
    pub categories: usize,
    pub storage_spaces: usize,
    pub items_with_photos: usize,
}

pub fn inventory_overview(
    items: &[StorageItem],
    categories: &[Category],
    spaces: &[StorageSpace],
) -> InventoryOverview {
    InventoryOverview {
        total_items: items.len(),
        categories: categories.len(),
        storage_spaces: spaces.len(),
        items_with_photos: items.iter().filter(|item| item.has_photo()).count(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Dimensions, Position};

    fn space(name: &str, w: u32, h: u32, d: u32) -> StorageSpace {
        StorageSpace::new(name, Dimensions::new(w, h, d).unwrap(), Color::BLUE).unwrap()
    }

    fn item(name: &str, space: &StorageSpace, categories: &[&Category]) -> StorageItem {
        StorageItem::new(name, space.clone(), Position::ORIGIN)
            .unwrap()
            .with_categories(categories.iter().map(|c| (*c).clone()).collect())
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let garage = space("Garage", 4, 3, 5);
        let items = vec![
            item("Drill", &garage, &[]),
            item("Saw", &garage, &[]),
            item("Hammer", &garage, &[]),
        ];
        let names: Vec<_> = search(&items, "", None).iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Drill", "Saw", "Hammer"]);
    }

    #[test]
    fn test_query_matches_name_or_description_case_insensitively() {
        let garage = space("Garage", 4, 3, 5);
        let items = vec![
            item("Fire Extinguisher", &garage, &[]),
            item("Bucket", &garage, &[]).with_description("for sand in case of FIRE"),
            item("Rake", &garage, &[]),
        ];
        let names: Vec<_> = search(&items, "fire", None)
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Fire Extinguisher", "Bucket"]);
    }

    #[test]
    fn test_category_filter_matches_by_identity() {
        let garage = space("Garage", 4, 3, 5);
        let fire = Category::new("Fire Safety", Color::RED);
        let impostor = Category::new("Fire Safety", Color::RED);
        let items = vec![item("Blanket", &garage, &[&fire]), item("Hose", &garage, &[&impostor])];

        let hits = search(&items, "", Some(fire.id()));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Blanket");
    }

    #[test]
    fn test_category_distribution_scenario() {
        let garage = space("Garage", 4, 3, 5);
        let fire = Category::new("Fire Safety", Color::RED);
        let coshh = Category::new("COSHH", Color::YELLOW);
        let items = vec![
            item("A", &garage, &[&fire]),
            item("B", &garage, &[]),
            item("C", &garage, &[&fire, &coshh]),
        ];

        let rows = category_distribution(&items, &[fire.clone(), coshh.clone()]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].bucket, CategoryBucket::Category(fire));
        assert_eq!(rows[0].count, 2);
        assert!((rows[0].percentage - 66.666).abs() < 0.01);
        assert_eq!(rows[1].bucket, CategoryBucket::Category(coshh));
        assert_eq!(rows[1].count, 1);
        assert!((rows[1].percentage - 33.333).abs() < 0.01);
        assert_eq!(rows[2].bucket, CategoryBucket::Uncategorized);
        assert_eq!(rows[2].bucket.label(), "Uncategorized");
        assert_eq!(rows[2].count, 1);
    }

    #[test]
    fn test_uncategorized_row_hidden_when_zero() {
        let garage = space("Garage", 4, 3, 5);
        let fire = Category::new("Fire Safety", Color::RED);
        let items = vec![item("A", &garage, &[&fire])];
        let rows = category_distribution(&items, std::slice::from_ref(&fire));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].percentage, 100.0);
    }

    #[test]
    fn test_empty_items_report_zero_rows() {
        let fire = Category::new("Fire Safety", Color::RED);
        let garage = space("Garage", 4, 3, 5);

        let rows = category_distribution(&[], std::slice::from_ref(&fire));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count, 0);
        assert_eq!(rows[0].percentage, 0.0);

        let rows = storage_distribution(&[], std::slice::from_ref(&garage));
        assert_eq!(rows[0].count, 0);
        assert_eq!(rows[0].percentage, 0.0);
    }

    #[test]
    fn test_storage_distribution_uses_space_identity() {
        let closet = space("Small Closet", 2, 3, 2);
        let garage = space("Garage", 4, 3, 5);
        let items = vec![
            item("A", &garage, &[]),
            item("B", &garage, &[]),
            item("C", &closet, &[]),
            item("D", &garage, &[]),
        ];
        let rows = storage_distribution(&items, &[closet.clone(), garage.clone()]);
        assert_eq!(rows[0].space, closet);
        assert_eq!(rows[0].count, 1);
        assert_eq!(rows[0].percentage, 25.0);
        assert_eq!(rows[1].count, 3);
        assert_eq!(rows[1].percentage, 75.0);
    }

    #[test]
    fn test_recent_items_newest_first() {
        let garage = space("Garage", 4, 3, 5);
        let items: Vec<_> = (0..12).map(|i| item(&format!("item-{i}"), &garage, &[])).collect();
        let recent = recent_items(&items, DEFAULT_RECENT_LIMIT);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].name, "item-11");
        assert_eq!(recent[9].name, "item-2");

        assert_eq!(recent_items(&items[..3], DEFAULT_RECENT_LIMIT).len(), 3);
    }

    #[test]
    fn test_resolve_view_index() {
        let garage = space("Garage", 4, 3, 5);
        let items = vec![item("Drill", &garage, &[]), item("Saw", &garage, &[])];
        let view = search(&items, "saw", None);
        assert_eq!(resolve_view_index(&view, 0), Some(items[1].id()));
        assert_eq!(resolve_view_index(&view, 1), None);
    }

    #[test]
    fn test_overview_counts_photos() {
        let garage = space("Garage", 4, 3, 5);
        let items = vec![
            item("Drill", &garage, &[]).with_photo(vec![1, 2, 3]),
            item("Saw", &garage, &[]),
        ];
        let overview = inventory_overview(&items, &[], std::slice::from_ref(&garage));
        assert_eq!(
            overview,
            InventoryOverview {
                total_items: 2,
                categories: 0,
                storage_spaces: 1,
                items_with_photos: 1,
            }
        );
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::{Color, Dimensions, Position};
    use proptest::prelude::*;

    fn fixed_categories() -> Vec<Category> {
        ["Fire Safety", "COSHH", "Trip Hazard"]
            .into_iter()
            .map(|n| Category::new(n, Color::GRAY))
            .collect()
    }

    fn fixed_spaces() -> Vec<StorageSpace> {
        [("Small Closet", 2, 3, 2), ("Garage", 4, 3, 5), ("Attic", 3, 2, 3)]
            .into_iter()
            .map(|(n, w, h, d)| {
                StorageSpace::new(n, Dimensions::new(w, h, d).expect("dims"), Color::GRAY)
                    .expect("space")
            })
            .collect()
    }

    /// (name, description, category index, space index) per item.
    fn arb_item_specs() -> impl Strategy<Value = Vec<(String, Option<String>, Option<usize>, usize)>> {
        prop::collection::vec(
            (
                "[a-zA-Z][a-zA-Z ]{0,11}",
                prop::option::of("[a-zA-Z ]{0,20}"),
                prop::option::of(0usize..3),
                0usize..3,
            ),
            0..40,
        )
    }

    fn build(
        specs: &[(String, Option<String>, Option<usize>, usize)],
        categories: &[Category],
        spaces: &[StorageSpace],
    ) -> Vec<StorageItem> {
        specs
            .iter()
            .map(|(name, description, category, space)| {
                let mut item = StorageItem::new(name.clone(), spaces[*space].clone(), Position::ORIGIN)
                    .expect("valid item");
                item.description = description.clone();
                if let Some(c) = category {
                    item.categories = vec![categories[*c].clone()];
                }
                item
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Empty query with no filter returns the whole collection in order.
        #[test]
        fn prop_empty_search_is_identity(specs in arb_item_specs()) {
            let categories = fixed_categories();
            let spaces = fixed_spaces();
            let items = build(&specs, &categories, &spaces);
            let ids: Vec<_> = search(&items, "", None).iter().map(|i| i.id()).collect();
            let all: Vec<_> = items.iter().map(|i| i.id()).collect();
            prop_assert_eq!(ids, all);
        }

        /// Search is sound and complete with respect to the predicate.
        #[test]
        fn prop_search_sound_and_complete(
            specs in arb_item_specs(),
            query in "[a-zA-Z]{0,3}",
            filter in prop::option::of(0usize..3),
        ) {
            let categories = fixed_categories();
            let spaces = fixed_spaces();
            let items = build(&specs, &categories, &spaces);
            let filter_id = filter.map(|c| categories[c].id());

            let hits: Vec<_> = search(&items, &query, filter_id).iter().map(|i| i.id()).collect();
            let expected: Vec<_> = items
                .iter()
                .filter(|item| {
                    let q = query.to_lowercase();
                    let text = q.is_empty()
                        || item.name.to_lowercase().contains(&q)
                        || item.description.as_ref().map_or(false, |d| d.to_lowercase().contains(&q));
                    let cat = filter_id.map_or(true, |id| item.categories.iter().any(|c| c.id() == id));
                    text && cat
                })
                .map(|i| i.id())
                .collect();
            prop_assert_eq!(hits, expected);
        }

        /// With at most one category per item, category shares sum to 100.
        #[test]
        fn prop_category_shares_sum_to_100(specs in arb_item_specs()) {
            let categories = fixed_categories();
            let spaces = fixed_spaces();
            let items = build(&specs, &categories, &spaces);
            let rows = category_distribution(&items, &categories);

            let sum: f64 = rows.iter().map(|r| r.percentage).sum();
            if items.is_empty() {
                prop_assert!(rows.iter().all(|r| r.count == 0 && r.percentage == 0.0));
            } else {
                prop_assert!((sum - 100.0).abs() < 1e-6, "sum was {}", sum);
            }
        }

        /// Every item sits in exactly one listed space, so storage shares sum to 100.
        #[test]
        fn prop_storage_shares_sum_to_100(specs in arb_item_specs()) {
            let categories = fixed_categories();
            let spaces = fixed_spaces();
            let items = build(&specs, &categories, &spaces);
            let rows = storage_distribution(&items, &spaces);

            let sum: f64 = rows.iter().map(|r| r.percentage).sum();
            let counted: usize = rows.iter().map(|r| r.count).sum();
            prop_assert_eq!(counted, items.len());
            if items.is_empty() {
                prop_assert!(rows.iter().all(|r| r.percentage == 0.0));
            } else {
                prop_assert!((sum - 100.0).abs() < 1e-6, "sum was {}", sum);
            }
        }
    }
}
