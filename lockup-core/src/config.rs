//! Configuration types

use crate::{ConfigError, DEFAULT_RECENT_LIMIT};
use serde::{Deserialize, Serialize};

/// Confidence a classifier candidate must exceed to become a suggestion.
pub const DEFAULT_SUGGESTION_THRESHOLD: f32 = 0.3;

/// Events an observer may fall behind by before it starts lagging.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Inventory configuration.
///
/// Every field must be present when loading from TOML; use
/// [`InventoryConfig::standard`] for the stock values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryConfig {
    /// Number of items in the "recently added" view.
    pub recent_limit: usize,
    /// Minimum classifier confidence (exclusive) for a name suggestion.
    pub suggestion_threshold: f32,
    /// Broadcast buffer per store.
    pub event_capacity: usize,
    /// Seed the stock categories and storage spaces on construction.
    pub seed_defaults: bool,
}

impl InventoryConfig {
    pub fn standard() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            suggestion_threshold: DEFAULT_SUGGESTION_THRESHOLD,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            seed_defaults: true,
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: InventoryConfig = toml::from_str(source).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates:
    /// - recent_limit > 0
    /// - suggestion_threshold in [0.0, 1.0]
    /// - event_capacity > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recent_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "recent_limit".to_string(),
                value: self.recent_limit.to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.suggestion_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "suggestion_threshold".to_string(),
                value: self.suggestion_threshold.to_string(),
                reason: "must be between 0.0 and 1.0".to_string(),
            });
        }

        if self.event_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "event_capacity".to_string(),
                value: self.event_capacity.to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self::standard()
    }
}


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
