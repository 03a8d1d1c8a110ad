//! In-progress item creation.
//!
//! Item creation is a three-step flow: photo, then name and location,
//! then optional details. [`ItemDraft`] holds the partially filled fields
//! between steps and refuses to build an item until the mandatory ones
//! (name, photo, storage space) are present.
//!
//! Name suggestions from the image classifier arrive asynchronously. Each
//! request is stamped with a [`SuggestionToken`]; only the most recent
//! token is honoured, and typing a name by hand retires it, so a slow
//! classifier can never overwrite a newer photo's suggestion or a manual
//! edit.

use crate::{
    clamp_position, Category, CategoryId, Entity, Position, StorageItem, StorageSpace,
    ValidationError,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Step of the creation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DraftStep {
    Photo,
    NameAndLocation,
    Details,
}

impl DraftStep {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Photo => "Add Photo",
            Self::NameAndLocation => "Name & Location",
            Self::Details => "Details (Optional)",
        }
    }
}

/// Stamp identifying one suggestion request for one draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SuggestionToken(u64);

impl SuggestionToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// The single result of a suggestion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub token: SuggestionToken,
    /// Capitalized label, or `None` when nothing was recognised.
    pub label: Option<String>,
}

/// Progress of the name suggestion for the current photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionState {
    Idle,
    Pending(SuggestionToken),
    /// The last request finished without a usable label.
    NotRecognized,
}

/// Fields gathered so far by the creation flow.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    step: DraftStep,
    name: String,
    photo: Option<Vec<u8>>,
    position: Position,
    description: String,
    categories: Vec<Category>,
    storage_space: Option<StorageSpace>,
    suggestion: SuggestionState,
    issued_tokens: u64,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemDraft {
    pub fn new() -> Self {
        Self {
            step: DraftStep::Photo,
            name: String::new(),
            photo: None,
            position: Position::ORIGIN,
            description: String::new(),
            categories: Vec::new(),
            storage_space: None,
            suggestion: SuggestionState::Idle,
            issued_tokens: 0,
        }
    }

    // === Accessors ===

    pub fn step(&self) -> DraftStep {
        self.step
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn photo(&self) -> Option<&[u8]> {
        self.photo.as_deref()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn storage_space(&self) -> Option<&StorageSpace> {
        self.storage_space.as_ref()
    }

    pub fn suggestion_state(&self) -> SuggestionState {
        self.suggestion
    }

    // === Navigation ===

    /// Advance one step. The last step stays put; committing is
    /// [`Inventory::commit_draft`](crate::Inventory::commit_draft)'s job.
    pub fn next(&mut self) -> DraftStep {
        self.step = match self.step {
            DraftStep::Photo => DraftStep::NameAndLocation,
            DraftStep::NameAndLocation | DraftStep::Details => DraftStep::Details,
        };
        self.step
    }

    pub fn back(&mut self) -> DraftStep {
        self.step = match self.step {
            DraftStep::Photo | DraftStep::NameAndLocation => DraftStep::Photo,
            DraftStep::Details => DraftStep::NameAndLocation,
        };
        self.step
    }

    pub fn skip_to_details(&mut self) -> DraftStep {
        self.step = DraftStep::Details;
        self.step
    }

    // === Field edits ===

    /// Store a newly captured photo and open a suggestion request for it.
    /// Any earlier request is superseded.
    pub fn set_photo(&mut self, photo: Vec<u8>) -> SuggestionToken {
        self.photo = Some(photo);
        self.issued_tokens += 1;
        let token = SuggestionToken(self.issued_tokens);
        self.suggestion = SuggestionState::Pending(token);
        token
    }

    /// Deliver a suggestion. It is applied only if `suggestion.token` is
    /// the pending one; returns whether the draft changed.
    pub fn apply_suggestion(&mut self, suggestion: Suggestion) -> bool {
        if self.suggestion != SuggestionState::Pending(suggestion.token) {
            debug!(
                token = suggestion.token.value(),
                state = ?self.suggestion,
                "Discarding stale name suggestion"
            );
            return false;
        }
        match suggestion.label {
            Some(label) => {
                self.name = label;
                self.suggestion = SuggestionState::Idle;
            }
            None => self.suggestion = SuggestionState::NotRecognized,
        }
        true
    }

    /// Manual name edit. Retires any pending suggestion.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        if matches!(self.suggestion, SuggestionState::Pending(_)) {
            self.suggestion = SuggestionState::Idle;
        }
    }

    /// Choose the storage space, pulling the current position inside it.
    pub fn select_storage_space(&mut self, space: StorageSpace) {
        self.position = clamp_position(space.dimensions, self.position);
        self.storage_space = Some(space);
    }

    /// Set the position, clamped to the selected space if there is one.
    pub fn set_position(&mut self, position: Position) {
        self.position = match &self.storage_space {
            Some(space) => clamp_position(space.dimensions, position),
            None => position,
        };
    }

    pub fn raise(&mut self) {
        if let Some(space) = &self.storage_space {
            self.position = self.position.step_up(space.dimensions);
        }
    }

    pub fn lower(&mut self) {
        if let Some(space) = &self.storage_space {
            self.position = self.position.step_down(space.dimensions);
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Tag the draft with a snapshot of `category`. Tagging twice is a no-op.
    pub fn add_category(&mut self, category: &Category) {
        if !self.categories.iter().any(|c| c.id() == category.id()) {
            self.categories.push(category.clone());
        }
    }

    pub fn remove_category(&mut self, id: CategoryId) {
        self.categories.retain(|c| c.id() != id);
    }

    // === Completion ===

    /// Whether every mandatory field is present.
    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.photo.is_none() {
            Some("photo")
        } else if self.storage_space.is_none() {
            Some("storage_space")
        } else {
            None
        }
    }

    /// Build the item. An empty description becomes `None`.
    pub fn build(&self) -> Result<StorageItem, ValidationError> {
        if let Some(field) = self.missing_field() {
            return Err(ValidationError::RequiredFieldMissing {
                field: field.to_string(),
            });
        }
        let space = self
            .storage_space
            .clone()
            .ok_or_else(|| ValidationError::RequiredFieldMissing {
                field: "storage_space".to_string(),
            })?;

        let mut item = StorageItem::new(self.name.clone(), space, self.position)?
            .with_categories(self.categories.clone());
        item.photo = self.photo.clone();
        if !self.description.is_empty() {
            item.description = Some(self.description.clone());
        }
        Ok(item)
    }

    /// Clear every field and return to the first step. Tokens issued
    /// before the reset stay invalid.
    pub fn reset(&mut self) {
        let issued_tokens = self.issued_tokens;
        *self = Self {
            issued_tokens,
            ..Self::new()
        };
    }
}
