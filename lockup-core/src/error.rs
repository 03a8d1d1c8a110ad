//! Error types for Lockup operations

use crate::EntityType;
use thiserror::Error;
use uuid::Uuid;

/// Rejections raised before any mutation takes place.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("A {entity_type} named '{name}' already exists")]
    DuplicateName { entity_type: EntityType, name: String },

    #[error("Dimension {axis} must be at least 1, got {value}")]
    InvalidDimension { axis: &'static str, value: i64 },
}

/// Color blob decoding errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ColorCodecError {
    #[error("Color blob must be {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("Color channel {channel} out of range: {value}")]
    ChannelOutOfRange { channel: &'static str, value: f32 },
}

/// Image classification failures. The gateway collapses all of these to
/// "no suggestion"; they exist so the cause can be logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("Image could not be decoded: {reason}")]
    Decode { reason: String },

    #[error("Classifier {classifier} failed: {reason}")]
    Classifier { classifier: String, reason: String },

    #[error("Classification worker failed: {reason}")]
    WorkerFailed { reason: String },
}

/// Store access errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: EntityType, id: Uuid },

    #[error("Inventory lock poisoned")]
    LockPoisoned,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse configuration: {reason}")]
    Parse { reason: String },
}

/// Master error type for all Lockup errors.
#[derive(Debug, Clone, Error)]
pub enum LockupError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Color codec error: {0}")]
    ColorCodec(#[from] ColorCodecError),

    #[error("Classification error: {0}")]
    Classification(#[from] ClassificationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Lockup operations.
pub type LockupResult<T> = Result<T, LockupError>;

// =============================================================================
// TESTS
// =============================================================================
