//! Model catalog cache and default model selection against a mock models endpoint

mod integration;

use bookmark_classifier::events::ClassifierEvent;
use bookmark_classifier::Error;
use integration::mock_server::MockServerFixture;
use std::time::Duration;

const KEY: &str = "sk-or-v1-test-key";

#[tokio::test]
async fn test_fetch_filters_unqualified_ids_and_sends_bearer() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/models")
        .match_header("authorization", format!("Bearer {}", KEY).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data":[
                {"id":"not-vendor-qualified","name":"Broken"},
                {"id":"openai/gpt-4o-mini","name":"OpenAI: GPT-4o-mini","context_length":128000},
                {"name":"missing id"}
            ]}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let classifier = fixture.classifier();
    let models = classifier.catalog().fetch_models(KEY, false).await.unwrap();

    mock.assert_async().await;
    let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["openai/gpt-4o-mini"]);
    assert_eq!(models[0].display_name, "OpenAI: GPT-4o-mini");
    assert_eq!(models[0].context_length, Some(128_000));
    assert_eq!(fixture.cached_ids().await, vec!["openai/gpt-4o-mini"]);
}

#[tokio::test]
async fn test_second_fetch_within_ttl_hits_cache() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_models(&["openai/gpt-4o", "meta/llama-3.1-8b-instruct"], 1).await;

    let classifier = fixture.classifier();
    let first = classifier.catalog().fetch_models(KEY, false).await.unwrap();
    let second = classifier.catalog().fetch_models(KEY, false).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);
    assert_eq!(
        fixture.events.events(),
        vec![ClassifierEvent::ModelsFetched { count: 2 }]
    );
}

#[tokio::test]
async fn test_force_refresh_always_fetches() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_models(&["openai/gpt-4o"], 2).await;

    let classifier = fixture.classifier();
    classifier.catalog().fetch_models(KEY, true).await.unwrap();
    classifier.catalog().fetch_models(KEY, true).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_expired_cache_is_replaced_not_merged() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .seed_cache(&["old/model-a", "old/model-b"], Duration::from_secs(16 * 60))
        .await;
    let mock = fixture.mock_models(&["new/model"], 1).await;

    let classifier = fixture.classifier();
    let models = classifier.catalog().fetch_models(KEY, false).await.unwrap();

    mock.assert_async().await;
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].id, "new/model");
    assert_eq!(fixture.cached_ids().await, vec!["new/model"]);
}

#[tokio::test]
async fn test_fresh_seeded_cache_is_served_without_network() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .seed_cache(&["cached/model"], Duration::from_secs(60))
        .await;
    let mock = fixture.mock_models(&["new/model"], 0).await;

    let classifier = fixture.classifier();
    let models = classifier.catalog().fetch_models(KEY, false).await.unwrap();

    mock.assert_async().await;
    assert_eq!(models[0].id, "cached/model");
}

#[tokio::test]
async fn test_stale_cache_served_when_refetch_fails() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .seed_cache(&["old/model"], Duration::from_secs(60 * 60))
        .await;
    let mock = fixture.mock_models_error(500, 1).await;

    let classifier = fixture.classifier();
    let models = classifier.catalog().fetch_models(KEY, false).await.unwrap();

    mock.assert_async().await;
    assert_eq!(models[0].id, "old/model");
    // the stale envelope is left as it was
    assert_eq!(fixture.cached_ids().await, vec!["old/model"]);
    assert!(matches!(
        fixture.events.events().as_slice(),
        [ClassifierEvent::ModelsServedStale { count: 1, .. }]
    ));
}

#[tokio::test]
async fn test_stale_cache_served_when_forced_refresh_hits_rate_limit() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .seed_cache(&["old/model"], Duration::from_secs(30))
        .await;
    let mock = fixture.mock_models_error(429, 1).await;

    let classifier = fixture.classifier();
    let models = classifier.catalog().fetch_models(KEY, true).await.unwrap();

    mock.assert_async().await;
    assert_eq!(models[0].id, "old/model");
}

#[tokio::test]
async fn test_stale_cache_served_when_network_is_down() {
    let fixture = MockServerFixture::new().await;
    fixture
        .seed_cache(&["old/model"], Duration::from_secs(60 * 60))
        .await;

    let classifier = fixture.unreachable_classifier();
    let models = classifier.catalog().fetch_models(KEY, false).await.unwrap();
    assert_eq!(models[0].id, "old/model");
}

#[tokio::test]
async fn test_errors_propagate_without_cache() {
    for status in [401usize, 429, 503] {
        let mut fixture = MockServerFixture::new().await;
        let mock = fixture.mock_models_error(status, 1).await;

        let classifier = fixture.classifier();
        let err = classifier.catalog().fetch_models(KEY, false).await.unwrap_err();

        mock.assert_async().await;
        let expected = match status {
            401 => matches!(err, Error::InvalidCredential { status: 401, .. }),
            429 => matches!(err, Error::RateLimited { .. }),
            _ => matches!(err, Error::CatalogFetch { status: 503, .. }),
        };
        assert!(expected, "status {}: unexpected error {:?}", status, err);
    }
}

#[tokio::test]
async fn test_choose_default_prefers_known_models() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_models(
            &["mistral/mixtral", "anthropic/claude-3-haiku", "openai/gpt-4o-mini"],
            1,
        )
        .await;

    let classifier = fixture.classifier();
    let choice = classifier.catalog().choose_default(KEY).await;

    mock.assert_async().await;
    assert_eq!(choice.as_deref(), Some("openai/gpt-4o-mini"));
}

#[tokio::test]
async fn test_choose_default_without_catalog_is_none() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_models_error(500, 1).await;

    let classifier = fixture.classifier();
    assert_eq!(classifier.catalog().choose_default(KEY).await, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_choose_default_for_empty_catalog_is_none() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_models(&[], 1).await;

    let classifier = fixture.classifier();
    assert_eq!(classifier.catalog().choose_default(KEY).await, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_json_catalog_body_is_a_fetch_error() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/models")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>maintenance</html>")
        .expect(1)
        .create_async()
        .await;

    let classifier = fixture.classifier();
    let err = classifier.catalog().fetch_models(KEY, false).await.unwrap_err();

    mock.assert_async().await;
    assert!(
        matches!(err, Error::CatalogFetch { status: 200, .. }),
        "unexpected error {:?}",
        err
    );
}

#[tokio::test]
async fn test_float_context_length_entry_is_kept() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/models")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"id":"vendor/float-ctx","name":7,"context_length":8192.0}]}"#)
        .expect(1)
        .create_async()
        .await;

    let classifier = fixture.classifier();
    let models = classifier.catalog().fetch_models(KEY, false).await.unwrap();

    mock.assert_async().await;
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].context_length, Some(8192));
    assert_eq!(
        classifier.catalog().choose_default(KEY).await.as_deref(),
        Some("vendor/float-ctx")
    );
}
