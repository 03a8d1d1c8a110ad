//! Gateway behaviour against mock classifiers and real encoded photos.

use lockup_core::{InventoryConfig, ItemDraft, SuggestionState};
use lockup_test_utils::fixtures::{garage, seeded_inventory};
use lockup_test_utils::photos::{garbage, sample_png, solid_png};
use lockup_test_utils::{mock_gateway, FailingClassifier, MockClassifier};
use lockup_vision::SuggestionGateway;
use std::sync::Arc;

#[tokio::test]
async fn test_top_candidate_above_threshold_is_suggested() {
    let gateway = mock_gateway(&[("dog", 0.8), ("cat", 0.5)]);
    assert_eq!(gateway.suggest_name(sample_png()).await, Some("Dog".to_string()));
}

#[tokio::test]
async fn test_low_confidence_yields_nothing() {
    let gateway = mock_gateway(&[("dog", 0.2)]);
    assert_eq!(gateway.suggest_name(sample_png()).await, None);
}

#[tokio::test]
async fn test_multi_word_label_is_capitalized() {
    let gateway = mock_gateway(&[("fire extinguisher", 0.91)]);
    assert_eq!(
        gateway.suggest_name(solid_png(16, 8, [200, 10, 10])).await,
        Some("Fire Extinguisher".to_string())
    );
}

#[tokio::test]
async fn test_undecodable_photo_never_reaches_classifier() {
    let classifier = Arc::new(MockClassifier::ranked(&[("dog", 0.9)]));
    let gateway = SuggestionGateway::new(classifier.clone());

    assert_eq!(gateway.suggest_name(garbage()).await, None);
    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn test_classifier_failure_collapses_to_none() {
    let gateway = SuggestionGateway::new(Arc::new(FailingClassifier::default()));
    assert_eq!(gateway.suggest_name(sample_png()).await, None);
    assert!(gateway.classify_bytes(sample_png()).await.is_err());
}

#[tokio::test]
async fn test_empty_result_yields_nothing() {
    let gateway = SuggestionGateway::new(Arc::new(MockClassifier::empty()));
    assert_eq!(gateway.suggest_name(sample_png()).await, None);
}

#[tokio::test]
async fn test_threshold_comes_from_config() {
    let config = InventoryConfig {
        suggestion_threshold: 0.9,
        ..InventoryConfig::standard()
    };
    let gateway = SuggestionGateway::from_config(
        Arc::new(MockClassifier::ranked(&[("dog", 0.8)])),
        &config,
    );
    assert_eq!(gateway.threshold(), 0.9);
    assert_eq!(gateway.suggest_name(sample_png()).await, None);
}

#[tokio::test]
async fn test_request_delivers_into_draft() {
    let gateway = mock_gateway(&[("ladder", 0.7)]);
    let mut draft = ItemDraft::new();
    let photo = sample_png();

    let token = draft.set_photo(photo.clone());
    let pending = gateway.request(photo, token);
    assert_eq!(pending.token(), token);

    let suggestion = pending.wait().await.unwrap();
    assert!(draft.apply_suggestion(suggestion));
    assert_eq!(draft.name(), "Ladder");
    assert_eq!(draft.suggestion_state(), SuggestionState::Idle);
}

#[tokio::test]
async fn test_unrecognised_photo_marks_draft() {
    let gateway = mock_gateway(&[("blur", 0.1)]);
    let mut draft = ItemDraft::new();
    let token = draft.set_photo(sample_png());

    let suggestion = gateway.request(sample_png(), token).wait().await.unwrap();
    assert_eq!(suggestion.label, None);
    assert!(draft.apply_suggestion(suggestion));
    assert_eq!(draft.suggestion_state(), SuggestionState::NotRecognized);
    assert_eq!(draft.name(), "");
}

#[tokio::test]
async fn test_suggestion_for_replaced_photo_is_discarded() {
    let gateway = mock_gateway(&[("dog", 0.8)]);
    let mut draft = ItemDraft::new();

    let first = draft.set_photo(sample_png());
    let stale = gateway.request(sample_png(), first);
    let second = draft.set_photo(solid_png(2, 2, [0, 0, 0]));
    let fresh = gateway.request(solid_png(2, 2, [0, 0, 0]), second);

    assert!(!draft.apply_suggestion(stale.wait().await.unwrap()));
    assert_eq!(draft.name(), "");
    assert!(draft.apply_suggestion(fresh.wait().await.unwrap()));
    assert_eq!(draft.name(), "Dog");
}

#[tokio::test]
async fn test_manual_name_wins_over_late_suggestion() {
    let gateway = mock_gateway(&[("dog", 0.8)]);
    let mut draft = ItemDraft::new();

    let token = draft.set_photo(sample_png());
    let pending = gateway.request(sample_png(), token);
    draft.set_name("Rex's bed");

    assert!(!draft.apply_suggestion(pending.wait().await.unwrap()));
    assert_eq!(draft.name(), "Rex's bed");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_suggested_name_commits_to_inventory() {
    let gateway = mock_gateway(&[("toolbox", 0.66)]);
    let mut inventory = seeded_inventory();
    let mut draft = ItemDraft::new();

    let photo = sample_png();
    let token = draft.set_photo(photo.clone());
    draft.select_storage_space(garage());
    let mut pending = gateway.request(photo, token);

    let suggestion = loop {
        if let Some(suggestion) = pending.try_take() {
            break suggestion;
        }
        tokio::task::yield_now().await;
    };
    assert!(draft.apply_suggestion(suggestion));

    let id = inventory.commit_draft(&mut draft).unwrap();
    let item = inventory.items().get(id).unwrap();
    assert_eq!(item.name, "Toolbox");
    assert!(item.has_photo());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_suggestion_is_delivered_only_once() {
    let gateway = mock_gateway(&[("dog", 0.8)]);
    let mut draft = ItemDraft::new();
    let token = draft.set_photo(sample_png());
    let mut pending = gateway.request(sample_png(), token);

    let first = loop {
        if let Some(suggestion) = pending.try_take() {
            break suggestion;
        }
        tokio::task::yield_now().await;
    };
    assert_eq!(first.label.as_deref(), Some("Dog"));
    assert!(pending.is_delivered());

    assert_eq!(pending.try_take(), None);
    assert_eq!(pending.try_take(), None);
    assert_eq!(pending.wait().await, None);
}
