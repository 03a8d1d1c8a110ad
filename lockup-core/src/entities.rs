//! Core entity structures

use crate::{
    CategoryId, Color, Dimensions, EntityIdType, EntityType, Position,
    StorageItemId, StorageSpaceId, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Behaviour shared by everything a [`Store`](crate::Store) can own.
pub trait Entity: Clone {
    type Id: EntityIdType;

    const ENTITY_TYPE: EntityType;

    fn id(&self) -> Self::Id;

    /// Display name, used in log fields.
    fn name(&self) -> &str;
}

/// Equality and hashing by identifier only, so that field edits never
/// change which entity a value refers to.
macro_rules! identity_eq {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }
    };
}

fn require_name(field: &str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: field.to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// CATEGORY
// ============================================================================

/// A user-defined tag with a display color.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    pub name: String,
    #[serde(rename = "color_data", with = "crate::color::blob")]
    pub color: Color,
}

identity_eq!(Category);

impl Category {
    /// Create a category with a fresh id. Name uniqueness is the caller's
    /// concern; see [`Inventory::create_category`](crate::Inventory::create_category).
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            id: CategoryId::now_v7(),
            name: name.into(),
            color,
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;
    const ENTITY_TYPE: EntityType = EntityType::Category;

    fn id(&self) -> CategoryId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// STORAGE SPACE
// ============================================================================

/// A named box-shaped space that items are positioned inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSpace {
    id: StorageSpaceId,
    pub name: String,
    pub dimensions: Dimensions,
    #[serde(rename = "color_data", with = "crate::color::blob")]
    pub color: Color,
}

identity_eq!(StorageSpace);

impl StorageSpace {
    pub fn new(
        name: impl Into<String>,
        dimensions: Dimensions,
        color: Color,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        require_name("name", &name)?;
        Ok(Self {
            id: StorageSpaceId::now_v7(),
            name,
            dimensions,
            color,
        })
    }
}

impl Entity for StorageSpace {
    type Id = StorageSpaceId;
    const ENTITY_TYPE: EntityType = EntityType::StorageSpace;

    fn id(&self) -> StorageSpaceId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// STORAGE ITEM
// ============================================================================

/// A photographed, positioned inventory item.
///
/// `categories` and `storage_space` are value snapshots taken when the item
/// was created. Editing or deleting the master category or space afterwards
/// does not touch them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageItem {
    id: StorageItemId,
    pub name: String,
    pub photo: Option<Vec<u8>>,
    pub position: Position,
    pub description: Option<String>,
    pub categories: Vec<Category>,
    pub storage_space: StorageSpace,
}

identity_eq!(StorageItem);

impl StorageItem {
    /// Create an item placed at `position` inside `storage_space`.
    ///
    /// Only the name is checked. Bounds are the position picker's job: run
    /// interactive positions through [`clamp_position`](crate::clamp_position).
    pub fn new(
        name: impl Into<String>,
        storage_space: StorageSpace,
        position: Position,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        require_name("name", &name)?;
        Ok(Self {
            id: StorageItemId::now_v7(),
            name,
            photo: None,
            position,
            description: None,
            categories: Vec::new(),
            storage_space,
        })
    }

    pub fn with_photo(mut self, photo: Vec<u8>) -> Self {
        self.photo = Some(photo);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    pub fn is_uncategorized(&self) -> bool {
        self.categories.is_empty()
    }

    /// True when one of the item's category snapshots has this id.
    pub fn has_category(&self, id: CategoryId) -> bool {
        self.categories.iter().any(|c| c.id() == id)
    }

    /// Apply a single-field edit and report which field changed.
    pub fn apply(&mut self, edit: ItemEdit) -> ItemField {
        match edit {
            ItemEdit::Name(name) => {
                self.name = name;
                ItemField::Name
            }
            ItemEdit::Photo(photo) => {
                self.photo = photo;
                ItemField::Photo
            }
            ItemEdit::Position(position) => {
                self.position = position;
                ItemField::Position
            }
            ItemEdit::Description(description) => {
                self.description = description;
                ItemField::Description
            }
            ItemEdit::Categories(categories) => {
                self.categories = categories;
                ItemField::Categories
            }
            ItemEdit::StorageSpace(space) => {
                self.storage_space = space;
                ItemField::StorageSpace
            }
        }
    }
}

impl Entity for StorageItem {
    type Id = StorageItemId;
    const ENTITY_TYPE: EntityType = EntityType::StorageItem;

    fn id(&self) -> StorageItemId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A replacement value for one mutable field of a [`StorageItem`].
#[derive(Debug, Clone, PartialEq)]
pub enum ItemEdit {
    Name(String),
    Photo(Option<Vec<u8>>),
    Position(Position),
    Description(Option<String>),
    Categories(Vec<Category>),
    StorageSpace(StorageSpace),
}

/// The field touched by an [`ItemEdit`], carried in change events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemField {
    Name,
    Photo,
    Position,
    Description,
    Categories,
    StorageSpace,
}

impl ItemEdit {
    pub fn field(&self) -> ItemField {
        match self {
            Self::Name(_) => ItemField::Name,
            Self::Photo(_) => ItemField::Photo,
            Self::Position(_) => ItemField::Position,
            Self::Description(_) => ItemField::Description,
            Self::Categories(_) => ItemField::Categories,
            Self::StorageSpace(_) => ItemField::StorageSpace,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
