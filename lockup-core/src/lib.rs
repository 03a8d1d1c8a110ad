//! Lockup Core - Inventory Model
//!
//! Entities, observable stores and derived views for a personal storage
//! inventory: items placed at a 3-D position inside storage spaces and
//! tagged with categories. Everything here is synchronous and in memory;
//! image classification lives in `lockup-vision`.

pub mod color;
pub mod config;
pub mod draft;
pub mod entities;
pub mod error;
pub mod identity;
pub mod inventory;
pub mod position;
pub mod query;
pub mod store;

pub use color::{Color, COLOR_BLOB_LEN};
pub use config::{InventoryConfig, DEFAULT_EVENT_CAPACITY, DEFAULT_SUGGESTION_THRESHOLD};
pub use draft::{DraftStep, ItemDraft, Suggestion, SuggestionState, SuggestionToken};
pub use entities::{Category, Entity, ItemEdit, ItemField, StorageItem, StorageSpace};
pub use error::{
    ClassificationError, ColorCodecError, ConfigError, LockupError, LockupResult, StoreError,
    ValidationError,
};
pub use identity::{CategoryId, EntityIdType, EntityType, StorageItemId, StorageSpaceId};
pub use inventory::{default_categories, default_storage_spaces, Inventory, SharedInventory};
pub use position::{clamp_axis, clamp_position, Dimensions, Position};
pub use query::{
    CategoryBucket, CategoryShare, InventoryOverview, StorageShare, DEFAULT_RECENT_LIMIT,
};
pub use store::{Store, StoreEvent};
