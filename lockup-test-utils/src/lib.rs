//! Lockup Test Utilities
//!
//! Shared test infrastructure for the Lockup workspace:
//! - Mock classifiers for the suggestion gateway
//! - Proptest generators for all entity types
//! - Fixtures for the canonical inventory scenarios
//! - Custom assertions for Lockup errors

// Re-export core types for convenience
pub use lockup_core::{
    Category, CategoryId, ClassificationError, Color, Dimensions, Entity, EntityIdType,
    EntityType, Inventory, InventoryConfig, ItemDraft, LockupError, LockupResult, Position,
    StorageItem, StorageItemId, StorageSpace, StorageSpaceId, StoreError, ValidationError,
};
pub use lockup_vision::{Classification, ImageClassifier, SuggestionGateway};

use async_trait::async_trait;
use image::DynamicImage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// MOCK CLASSIFIERS
// ============================================================================

/// Classifier that returns the same ranked list for every image and counts
/// how often it was asked.
#[derive(Debug, Default)]
pub struct MockClassifier {
    candidates: Vec<Classification>,
    calls: AtomicUsize,
}

impl MockClassifier {
    /// Build from `(label, confidence)` pairs, best first.
    pub fn ranked(pairs: &[(&str, f32)]) -> Self {
        Self {
            candidates: pairs
                .iter()
                .map(|(label, confidence)| Classification::new(*label, *confidence))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Classifier that never recognises anything.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ImageClassifier for MockClassifier {
    async fn classify(
        &self,
        _image: &DynamicImage,
    ) -> Result<Vec<Classification>, ClassificationError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.candidates.clone())
    }

    fn classifier_id(&self) -> &str {
        "mock"
    }
}

/// Classifier whose model always fails.
#[derive(Debug, Clone)]
pub struct FailingClassifier {
    reason: String,
}

impl FailingClassifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for FailingClassifier {
    fn default() -> Self {
        Self::new("model unavailable")
    }
}

#[async_trait]
impl ImageClassifier for FailingClassifier {
    async fn classify(
        &self,
        _image: &DynamicImage,
    ) -> Result<Vec<Classification>, ClassificationError> {
        Err(ClassificationError::Classifier {
            classifier: self.classifier_id().to_string(),
            reason: self.reason.clone(),
        })
    }

    fn classifier_id(&self) -> &str {
        "failing"
    }
}

/// Gateway over a [`MockClassifier`] built from `pairs`.
pub fn mock_gateway(pairs: &[(&str, f32)]) -> SuggestionGateway {
    SuggestionGateway::new(Arc::new(MockClassifier::ranked(pairs)))
}

// ============================================================================
// PHOTO HELPERS
// ============================================================================

pub mod photos {
    //! Encoded images for feeding the gateway.

    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;

    /// A solid-color PNG of the given size.
    pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)));
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, ImageOutputFormat::Png)
            .expect("encoding an in-memory PNG cannot fail");
        out.into_inner()
    }

    /// A small gray PNG.
    pub fn sample_png() -> Vec<u8> {
        solid_png(4, 4, [128, 128, 128])
    }

    /// Bytes no decoder accepts.
    pub fn garbage() -> Vec<u8> {
        b"definitely not an image".to_vec()
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating Lockup entity types.

    use super::*;
    use proptest::prelude::*;

    /// Generate a color with every channel in `[0, 1]`.
    pub fn arb_color() -> impl Strategy<Value = Color> {
        (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0).prop_map(
            |(red, green, blue, alpha)| Color {
                red,
                green,
                blue,
                alpha,
            },
        )
    }

    /// Generate dimensions within the editor's stepper range (1...10).
    pub fn arb_dimensions() -> impl Strategy<Value = Dimensions> {
        (1u32..=10, 1u32..=10, 1u32..=10)
            .prop_filter_map("dimensions must be positive", |(w, h, d)| {
                Dimensions::new(w, h, d).ok()
            })
    }

    /// Generate any position, including far out of bounds.
    pub fn arb_position() -> impl Strategy<Value = Position> {
        (-50i32..50, -50i32..50, -50i32..50).prop_map(|(x, y, z)| Position::new(x, y, z))
    }

    /// Generate a position inside `dimensions`.
    pub fn arb_position_within(dimensions: Dimensions) -> impl Strategy<Value = Position> {
        (
            0..dimensions.width() as i32,
            0..dimensions.height() as i32,
            0..dimensions.depth() as i32,
        )
            .prop_map(|(x, y, z)| Position::new(x, y, z))
    }

    /// Generate a non-blank display name.
    pub fn arb_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{0,15}"
    }

    pub fn arb_category() -> impl Strategy<Value = Category> {
        (arb_name(), arb_color()).prop_map(|(name, color)| Category::new(name, color))
    }

    pub fn arb_storage_space() -> impl Strategy<Value = StorageSpace> {
        (arb_name(), arb_dimensions(), arb_color())
            .prop_filter_map("storage space must be valid", |(name, dims, color)| {
                StorageSpace::new(name, dims, color).ok()
            })
    }

    /// Generate an item placed in `space`, tagged with up to two of
    /// `categories`.
    pub fn arb_item_in(
        space: StorageSpace,
        categories: Vec<Category>,
    ) -> impl Strategy<Value = StorageItem> {
        let dims = space.dimensions;
        let tag_count = categories.len().min(2);
        (
            arb_name(),
            arb_position_within(dims),
            proptest::option::of("[a-z ]{0,20}"),
            proptest::sample::subsequence(categories, 0..=tag_count),
            any::<bool>(),
        )
            .prop_filter_map(
                "item must be valid",
                move |(name, position, description, tags, with_photo)| {
                    let mut item = StorageItem::new(name, space.clone(), position)
                        .ok()?
                        .with_categories(tags);
                    item.description = description;
                    if with_photo {
                        item.photo = Some(vec![0u8; 8]);
                    }
                    Some(item)
                },
            )
    }

    /// Generate an item tagged with at most one of `categories`.
    pub fn arb_single_tag_item_in(
        space: StorageSpace,
        categories: Vec<Category>,
    ) -> impl Strategy<Value = StorageItem> {
        let upper = categories.len().min(1);
        (
            arb_name(),
            arb_position_within(space.dimensions),
            proptest::sample::subsequence(categories, 0..=upper),
        )
            .prop_filter_map("item must be valid", move |(name, position, tags)| {
                StorageItem::new(name, space.clone(), position)
                    .ok()
                    .map(|item| item.with_categories(tags))
            })
    }

    /// Generate a small world: a few categories, a few spaces, and items
    /// spread over them.
    pub fn arb_inventory_snapshot(
    ) -> impl Strategy<Value = (Vec<Category>, Vec<StorageSpace>, Vec<StorageItem>)> {
        (
            prop::collection::vec(arb_category(), 0..4),
            prop::collection::vec(arb_storage_space(), 1..4),
        )
            .prop_flat_map(|(categories, spaces)| {
                let items = prop::collection::vec(
                    prop::sample::select(spaces.clone()).prop_flat_map({
                        let categories = categories.clone();
                        move |space| arb_item_in(space, categories.clone())
                    }),
                    0..20,
                );
                (Just(categories), Just(spaces), items)
            })
    }

    /// Generate a valid inventory configuration.
    pub fn arb_valid_config() -> impl Strategy<Value = InventoryConfig> {
        (1usize..50, 0.0f32..=1.0, 1usize..1024, any::<bool>()).prop_map(
            |(recent_limit, suggestion_threshold, event_capacity, seed_defaults)| InventoryConfig {
                recent_limit,
                suggestion_threshold,
                event_capacity,
                seed_defaults,
            },
        )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Canonical entities and inventories used across crates.

    use super::*;

    fn space(name: &str, w: u32, h: u32, d: u32, color: Color) -> StorageSpace {
        let dims = Dimensions::new(w, h, d).expect("fixture dimensions are positive");
        StorageSpace::new(name, dims, color).expect("fixture space is valid")
    }

    /// "Garage", 4×3×5.
    pub fn garage() -> StorageSpace {
        space("Garage", 4, 3, 5, Color::GREEN)
    }

    /// "Small Closet", 2×3×2.
    pub fn small_closet() -> StorageSpace {
        space("Small Closet", 2, 3, 2, Color::BLUE)
    }

    /// "Attic", 3×2×3.
    pub fn attic() -> StorageSpace {
        space("Attic", 3, 2, 3, Color::ORANGE)
    }

    pub fn fire_safety() -> Category {
        Category::new("Fire Safety", Color::RED)
    }

    pub fn coshh() -> Category {
        Category::new("COSHH", Color::YELLOW)
    }

    /// An item at `position` in `space`.
    pub fn item(name: &str, space: StorageSpace, position: Position) -> StorageItem {
        StorageItem::new(name, space, position).expect("fixture item is valid")
    }

    /// Inventory with no seed data.
    pub fn empty_inventory() -> Inventory {
        Inventory::empty()
    }

    /// Inventory with the stock categories and spaces.
    pub fn seeded_inventory() -> Inventory {
        Inventory::new(InventoryConfig::standard()).expect("standard config is valid")
    }

    /// Categories [Fire Safety, COSHH] and items A {Fire Safety}, B {},
    /// C {Fire Safety, COSHH}, all in the garage.
    pub fn category_scenario() -> Inventory {
        let mut inventory = empty_inventory();
        let garage = garage();
        let fire = fire_safety();
        let chem = coshh();
        inventory
            .create_category(&fire.name, fire.color)
            .expect("fresh name");
        inventory
            .create_category(&chem.name, chem.color)
            .expect("fresh name");
        let fire = inventory.categories().all()[0].clone();
        let chem = inventory.categories().all()[1].clone();

        inventory.add_item(
            item("A", garage.clone(), Position::ORIGIN).with_categories(vec![fire.clone()]),
        );
        inventory.add_item(item("B", garage.clone(), Position::ORIGIN));
        inventory.add_item(
            item("C", garage, Position::ORIGIN).with_categories(vec![fire, chem]),
        );
        inventory
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertion helpers for Lockup-specific errors.

    use super::*;

    /// Assert that a validation failed because `field` was missing.
    #[track_caller]
    pub fn assert_missing_field<T: std::fmt::Debug>(
        result: &Result<T, ValidationError>,
        field: &str,
    ) {
        match result {
            Err(ValidationError::RequiredFieldMissing { field: f }) => {
                assert_eq!(f, field, "Wrong missing field");
            }
            other => panic!("Expected RequiredFieldMissing({field}), got: {other:?}"),
        }
    }

    /// Assert that a validation failed on a duplicate name.
    #[track_caller]
    pub fn assert_duplicate_name<T: std::fmt::Debug>(result: &Result<T, ValidationError>) {
        match result {
            Err(ValidationError::DuplicateName { .. }) => {}
            other => panic!("Expected DuplicateName, got: {other:?}"),
        }
    }

    /// Assert that a LockupResult is a NotFound store error for `entity_type`.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &LockupResult<T>, entity_type: EntityType) {
        match result {
            Err(LockupError::Store(StoreError::NotFound { entity_type: et, .. })) => {
                assert_eq!(*et, entity_type, "Wrong entity type in NotFound error");
            }
            other => panic!("Expected NotFound error for {entity_type:?}, got: {other:?}"),
        }
    }

    /// Assert two percentages agree to one decimal place.
    #[track_caller]
    pub fn assert_percentage(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.05,
            "Expected {expected:.1}%, got {actual:.3}%"
        );
    }
}
