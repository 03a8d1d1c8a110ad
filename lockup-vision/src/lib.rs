//! Lockup Vision - Name Suggestions From Photos
//!
//! Provider-agnostic classifier trait plus the gateway that turns a raw
//! photo into at most one suggested item name. Actual classifier models
//! are supplied by the host; this crate only decodes, thresholds and
//! formats.
//!
//! The gateway is best-effort: every failure (undecodable bytes, a
//! classifier error, a panicked worker, an empty or low-confidence result)
//! ends up as "no suggestion" and is logged, never returned.

use async_trait::async_trait;
use image::DynamicImage;
use lockup_core::{
    ClassificationError, InventoryConfig, Suggestion, SuggestionToken,
    DEFAULT_SUGGESTION_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// One candidate label from a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Raw label as the model reports it, e.g. "golden retriever".
    pub label: String,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Trait for image classifiers.
/// Implementations must be thread-safe (Send + Sync).
///
/// # Example
/// ```ignore
/// struct OnDeviceModel { /* ... */ }
///
/// #[async_trait]
/// impl ImageClassifier for OnDeviceModel {
///     async fn classify(&self, image: &DynamicImage)
///         -> Result<Vec<Classification>, ClassificationError> {
///         // Run the model
///     }
///     fn classifier_id(&self) -> &str { "on-device" }
/// }
/// ```
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    /// Classify a decoded image.
    ///
    /// # Returns
    /// * `Ok(Vec<Classification>)` - Candidates ranked best-first, possibly empty
    /// * `Err(ClassificationError)` - If the model could not run
    async fn classify(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<Classification>, ClassificationError>;

    /// Identifier used in logs and errors.
    fn classifier_id(&self) -> &str;
}

// ============================================================================
// DECODING AND LABEL POLICY
// ============================================================================

/// Decode a photo on the blocking pool.
pub async fn decode_image(bytes: Vec<u8>) -> Result<DynamicImage, ClassificationError> {
    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| ClassificationError::WorkerFailed {
            reason: e.to_string(),
        })?;
    decoded.map_err(|e| ClassificationError::Decode {
        reason: e.to_string(),
    })
}

/// Uppercase the first letter of every whitespace-separated word and
/// lowercase the rest: "golden retriever" becomes "Golden Retriever".
pub fn capitalize_words(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut at_word_start = true;
    for ch in label.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            at_word_start = false;
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// Pick the suggestion from a ranked candidate list. Only the top
/// candidate is considered and its confidence must exceed `threshold`.
pub fn select_label(candidates: &[Classification], threshold: f32) -> Option<String> {
    let top = candidates.first()?;
    if top.confidence > threshold {
        Some(capitalize_words(&top.label))
    } else {
        debug!(
            label = %top.label,
            confidence = top.confidence,
            threshold,
            "Top candidate below threshold"
        );
        None
    }
}

// ============================================================================
// SUGGESTION GATEWAY
// ============================================================================

/// Runs a classifier over item photos and produces name suggestions.
#[derive(Clone)]
pub struct SuggestionGateway {
    classifier: Arc<dyn ImageClassifier>,
    threshold: f32,
}

impl SuggestionGateway {
    /// Gateway with the stock confidence threshold.
    pub fn new(classifier: Arc<dyn ImageClassifier>) -> Self {
        Self {
            classifier,
            threshold: DEFAULT_SUGGESTION_THRESHOLD,
        }
    }

    /// Gateway using the threshold from `config`.
    pub fn from_config(classifier: Arc<dyn ImageClassifier>, config: &InventoryConfig) -> Self {
        Self::new(classifier).with_threshold(config.suggestion_threshold)
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Decode, classify and select. Errors are surfaced here so that
    /// [`Self::suggest_name`] can log them in one place.
    pub async fn classify_bytes(
        &self,
        bytes: Vec<u8>,
    ) -> Result<Option<String>, ClassificationError> {
        let image = decode_image(bytes).await?;
        let candidates = self.classifier.classify(&image).await?;
        debug!(
            classifier = self.classifier.classifier_id(),
            candidates = candidates.len(),
            "Classification finished"
        );
        Ok(select_label(&candidates, self.threshold))
    }

    /// Suggested name for a photo, or `None` if nothing usable came back.
    pub async fn suggest_name(&self, bytes: Vec<u8>) -> Option<String> {
        match self.classify_bytes(bytes).await {
            Ok(label) => label,
            Err(e) => {
                warn!(
                    classifier = self.classifier.classifier_id(),
                    error = %e,
                    "Could not identify object in image"
                );
                None
            }
        }
    }

    /// Start a suggestion for the draft request stamped `token`. The work
    /// runs on a spawned task and delivers exactly one [`Suggestion`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&self, bytes: Vec<u8>, token: SuggestionToken) -> PendingSuggestion {
        let (tx, rx) = oneshot::channel();
        let gateway = self.clone();
        tokio::spawn(async move {
            let label = gateway.suggest_name(bytes).await;
            if tx.send(Suggestion { token, label }).is_err() {
                debug!(token = token.value(), "Suggestion receiver dropped");
            }
        });
        PendingSuggestion { token, rx: Some(rx) }
    }
}

impl std::fmt::Debug for SuggestionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionGateway")
            .field("classifier", &self.classifier.classifier_id())
            .field("threshold", &self.threshold)
            .finish()
    }
}

/// Handle to an in-flight suggestion request. Yields its result exactly
/// once, through either [`Self::try_take`] or [`Self::wait`].
#[derive(Debug)]
pub struct PendingSuggestion {
    token: SuggestionToken,
    rx: Option<oneshot::Receiver<Suggestion>>,
}

impl PendingSuggestion {
    pub fn token(&self) -> SuggestionToken {
        self.token
    }

    /// Whether the result has already been handed out.
    pub fn is_delivered(&self) -> bool {
        self.rx.is_none()
    }

    /// Wait for the result. A worker that died without answering counts
    /// as "not recognised". Returns `None` if [`Self::try_take`] already
    /// delivered it.
    pub async fn wait(mut self) -> Option<Suggestion> {
        let rx = self.rx.take()?;
        let token = self.token;
        Some(rx.await.unwrap_or_else(|_| {
            warn!(token = token.value(), "Suggestion worker ended without a result");
            Suggestion { token, label: None }
        }))
    }

    /// Non-blocking poll for UI loops. Returns `None` while still running
    /// and on every call after the result was delivered.
    pub fn try_take(&mut self) -> Option<Suggestion> {
        let rx = self.rx.as_mut()?;
        let suggestion = match rx.try_recv() {
            Ok(suggestion) => suggestion,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => {
                warn!(token = self.token.value(), "Suggestion worker ended without a result");
                Suggestion {
                    token: self.token,
                    label: None,
                }
            }
        };
        self.rx = None;
        Some(suggestion)
    }
}


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
