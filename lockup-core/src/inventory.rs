//! The inventory facade: three stores plus the operations the UI calls.
//!
//! One `Inventory` is built per process and handed to consumers by
//! reference. It is the only place that enforces cross-entity rules such as
//! category name uniqueness.

use crate::query::{self, CategoryShare, InventoryOverview, StorageShare};
use crate::{
    Category, CategoryId, Color, Dimensions, Entity, EntityType, InventoryConfig, ItemDraft,
    ItemEdit, ItemField, LockupResult, Position, StorageItem, StorageItemId, StorageSpace,
    StorageSpaceId, Store, StoreError, ValidationError,
};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Owner of the item, category and storage-space stores.
#[derive(Debug)]
pub struct Inventory {
    items: Store<StorageItem>,
    categories: Store<Category>,
    storage_spaces: Store<StorageSpace>,
    config: InventoryConfig,
}

impl Inventory {
    /// Build an inventory from a validated configuration.
    pub fn new(config: InventoryConfig) -> LockupResult<Self> {
        config.validate()?;
        let capacity = config.event_capacity;
        let (categories, spaces) = if config.seed_defaults {
            (default_categories(), default_storage_spaces()?)
        } else {
            (Vec::new(), Vec::new())
        };
        info!(
            categories = categories.len(),
            storage_spaces = spaces.len(),
            "Inventory initialized"
        );
        Ok(Self {
            items: Store::new(capacity),
            categories: Store::with_entities(categories, capacity),
            storage_spaces: Store::with_entities(spaces, capacity),
            config,
        })
    }

    /// An inventory with no seed data and stock settings.
    pub fn empty() -> Self {
        let config = InventoryConfig {
            seed_defaults: false,
            ..InventoryConfig::standard()
        };
        let capacity = config.event_capacity;
        Self {
            items: Store::new(capacity),
            categories: Store::new(capacity),
            storage_spaces: Store::new(capacity),
            config,
        }
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    pub fn items(&self) -> &Store<StorageItem> {
        &self.items
    }

    pub fn categories(&self) -> &Store<Category> {
        &self.categories
    }

    pub fn storage_spaces(&self) -> &Store<StorageSpace> {
        &self.storage_spaces
    }

    // ========================================================================
    // CATEGORIES
    // ========================================================================

    /// Add a category after trimming its name. Empty names and names that
    /// match an existing category case-insensitively are rejected and
    /// nothing is stored.
    pub fn create_category(
        &mut self,
        name: &str,
        color: Color,
    ) -> Result<CategoryId, ValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            warn!("Rejected category with empty name");
            return Err(ValidationError::RequiredFieldMissing {
                field: "name".to_string(),
            });
        }
        let lowered = trimmed.to_lowercase();
        if self
            .categories
            .all()
            .iter()
            .any(|c| c.name.trim().to_lowercase() == lowered)
        {
            warn!(name = trimmed, "Rejected duplicate category name");
            return Err(ValidationError::DuplicateName {
                entity_type: EntityType::Category,
                name: trimmed.to_string(),
            });
        }
        Ok(self.categories.append(Category::new(trimmed, color)))
    }

    /// Delete a category from the master list. Items keep their snapshot.
    pub fn delete_category(&mut self, id: CategoryId) -> Option<Category> {
        self.categories.remove_by_id(id)
    }

    pub fn delete_category_at(&mut self, index: usize) -> Option<Category> {
        self.categories.remove_at(index)
    }

    pub fn delete_categories_where<F>(&mut self, predicate: F) -> Vec<Category>
    where
        F: FnMut(&Category) -> bool,
    {
        self.categories.remove_where(predicate)
    }

    // ========================================================================
    // STORAGE SPACES
    // ========================================================================

    pub fn create_storage_space(
        &mut self,
        name: &str,
        dimensions: Dimensions,
        color: Color,
    ) -> Result<StorageSpaceId, ValidationError> {
        let space = StorageSpace::new(name, dimensions, color)?;
        Ok(self.storage_spaces.append(space))
    }

    /// Delete a storage space. Items placed in it keep their snapshot.
    pub fn delete_storage_space(&mut self, id: StorageSpaceId) -> Option<StorageSpace> {
        self.storage_spaces.remove_by_id(id)
    }

    /// Remove several spaces by list position, as a swipe-to-delete over
    /// the unfiltered list does. Out-of-range positions are ignored.
    pub fn delete_storage_spaces_at(&mut self, indices: &[usize]) -> Vec<StorageSpace> {
        let ids: Vec<StorageSpaceId> = indices
            .iter()
            .filter_map(|&i| self.storage_spaces.all().get(i).map(|s| s.id()))
            .collect();
        self.storage_spaces.remove_where(|s| ids.contains(&s.id()))
    }

    pub fn delete_storage_spaces_where<F>(&mut self, predicate: F) -> Vec<StorageSpace>
    where
        F: FnMut(&StorageSpace) -> bool,
    {
        self.storage_spaces.remove_where(predicate)
    }

    // ========================================================================
    // ITEMS
    // ========================================================================

    /// Store an item. Its position is clamped into the snapshot of its
    /// storage space first, so the store never holds an unreachable cell.
    pub fn add_item(&mut self, mut item: StorageItem) -> StorageItemId {
        let clamped = crate::clamp_position(item.storage_space.dimensions, item.position);
        if clamped != item.position {
            debug!(
                name = %item.name,
                from = ?item.position,
                to = ?clamped,
                "Clamped item position on insert"
            );
            item.position = clamped;
        }
        self.items.append(item)
    }

    /// Build the draft into an item, store it and reset the draft. On a
    /// validation failure the draft is left untouched.
    pub fn commit_draft(&mut self, draft: &mut ItemDraft) -> Result<StorageItemId, ValidationError> {
        let item = draft.build().map_err(|err| {
            debug!(error = %err, "Draft not ready");
            err
        })?;
        let id = self.items.append(item);
        draft.reset();
        Ok(id)
    }

    pub fn edit_item(&mut self, id: StorageItemId, edit: ItemEdit) -> Option<ItemField> {
        self.items.edit(id, edit)
    }

    pub fn delete_item(&mut self, id: StorageItemId) -> Option<StorageItem> {
        self.items.remove_by_id(id)
    }

    /// Delete by position in the unfiltered item list. Out of range is a
    /// no-op and emits no event.
    pub fn delete_item_at(&mut self, index: usize) -> Option<StorageItem> {
        self.items.remove_at(index)
    }

    pub fn delete_items_where<F>(&mut self, predicate: F) -> Vec<StorageItem>
    where
        F: FnMut(&StorageItem) -> bool,
    {
        self.items.remove_where(predicate)
    }

    /// Delete the item shown at `index` of a derived view. The position is
    /// resolved to an identity first; the master collection is never
    /// indexed with a view position.
    pub fn remove_item_in_view(
        &mut self,
        view: &[StorageItemId],
        index: usize,
    ) -> Option<StorageItem> {
        let id = *view.get(index)?;
        self.items.remove_by_id(id)
    }

    // ========================================================================
    // DERIVED VIEWS
    // ========================================================================

    pub fn search(&self, query: &str, category: Option<&Category>) -> Vec<&StorageItem> {
        query::search(self.items.all(), query, category.map(|c| c.id()))
    }

    /// Ids of the items a search would show, in display order. Hold on to
    /// this to delete through the view with [`Self::remove_item_in_view`].
    pub fn search_ids(&self, query: &str, category: Option<&Category>) -> Vec<StorageItemId> {
        self.search(query, category).iter().map(|i| i.id()).collect()
    }

    pub fn category_distribution(&self) -> Vec<CategoryShare> {
        query::category_distribution(self.items.all(), self.categories.all())
    }

    pub fn storage_distribution(&self) -> Vec<StorageShare> {
        query::storage_distribution(self.items.all(), self.storage_spaces.all())
    }

    /// The configured number of most recently appended items, newest first.
    pub fn recent_items(&self) -> Vec<&StorageItem> {
        query::recent_items(self.items.all(), self.config.recent_limit)
    }

    pub fn overview(&self) -> InventoryOverview {
        query::inventory_overview(
            self.items.all(),
            self.categories.all(),
            self.storage_spaces.all(),
        )
    }

    /// Clamp a position into the space with `id`, if it still exists.
    pub fn clamp_position(&self, id: StorageSpaceId, position: Position) -> LockupResult<Position> {
        let space = self.storage_spaces.get(id).ok_or(StoreError::NotFound {
            entity_type: EntityType::StorageSpace,
            id: id.into(),
        })?;
        Ok(crate::clamp_position(space.dimensions, position))
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::empty()
    }
}

/// The categories a fresh install starts with.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("Fire Safety", Color::RED),
        Category::new("COSHH", Color::YELLOW),
        Category::new("Trip Hazard", Color::ORANGE),
    ]
}

/// The storage spaces a fresh install starts with.
pub fn default_storage_spaces() -> Result<Vec<StorageSpace>, ValidationError> {
    Ok(vec![
        StorageSpace::new("Small Closet", Dimensions::new(2, 3, 2)?, Color::BLUE)?,
        StorageSpace::new("Garage", Dimensions::new(4, 3, 5)?, Color::GREEN)?,
        StorageSpace::new("Attic", Dimensions::new(3, 2, 3)?, Color::ORANGE)?,
    ])
}

// ============================================================================
// SHARED INVENTORY
// ============================================================================

/// An [`Inventory`] behind a lock, for hosts with more than one writer.
#[derive(Debug, Clone)]
pub struct SharedInventory {
    inner: Arc<RwLock<Inventory>>,
}

impl SharedInventory {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inner: Arc::new(RwLock::new(inventory)),
        }
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, Inventory>, StoreError> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, Inventory>, StoreError> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned)
    }
}
