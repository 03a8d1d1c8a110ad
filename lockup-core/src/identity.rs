//! Identity types for Lockup entities

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Common behaviour of the strongly-typed entity identifiers.
///
/// Identifiers are UUIDv7 so that ids minted later sort after ids minted
/// earlier, but nothing in the query engine relies on that ordering.
pub trait EntityIdType: Copy + Eq + std::hash::Hash + fmt::Debug + fmt::Display {
    /// Wrap an existing UUID.
    fn new(uuid: Uuid) -> Self;

    /// The underlying UUID.
    fn as_uuid(&self) -> Uuid;

    /// Mint a fresh, globally unique identifier.
    fn now_v7() -> Self {
        Self::new(Uuid::now_v7())
    }

    /// The all-zero identifier, useful as a sentinel in tests.
    fn nil() -> Self {
        Self::new(Uuid::nil())
    }
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl EntityIdType for $name {
            fn new(uuid: Uuid) -> Self {
                Self(uuid)
            }

            fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

define_entity_id!(
    /// Identifier of a [`Category`](crate::Category).
    CategoryId
);
define_entity_id!(
    /// Identifier of a [`StorageSpace`](crate::StorageSpace).
    StorageSpaceId
);
define_entity_id!(
    /// Identifier of a [`StorageItem`](crate::StorageItem).
    StorageItemId
);

/// Entity type discriminator used in events and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Category,
    StorageSpace,
    StorageItem,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::StorageSpace => "StorageSpace",
            Self::StorageItem => "StorageItem",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
