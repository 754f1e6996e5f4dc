//! End-to-end voice store tests against a mocked upstream.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{any, body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sesame_voice::{AppConfig, RequestClient, RetryPolicy, VoiceError, VoiceStore};

fn test_store(endpoint: &str, voice_dir: &Path) -> VoiceStore {
    let config = AppConfig {
        api_token: "hf_test_token".to_string(),
        api_url: endpoint.to_string(),
        voice_dir: voice_dir.to_path_buf(),
        output_dir: voice_dir.join("outputs"),
        retry: RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
            backoff_multiplier: 2.0,
            retryable_status: HashSet::from([503]),
        },
    };
    let client = Arc::new(RequestClient::new(&config).unwrap());
    VoiceStore::new(&config, client)
}

/// Upstream body for a successful voice extraction
fn clone_success() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(r#"{"parameters":{"pitch":0.25,"timbre":-0.5,"pace":1.1}}"#)
        .insert_header("Content-Type", "application/json")
}

#[tokio::test]
async fn test_clone_then_resolve_roundtrip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(clone_success())
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&server.uri(), dir.path());

    let cloned = store.clone_voice("alice", &[1u8; 32 * 1024]).await.unwrap();
    let resolved = store.resolve("alice").await.unwrap();

    assert_eq!(resolved, cloned);
    assert!((resolved.parameters.pace - 1.1).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_failed_clone_leaves_no_partial_artifact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&server.uri(), dir.path());

    let result = store.clone_voice("alice", b"sample").await;
    assert!(matches!(
        result,
        Err(VoiceError::TransientService { .. })
    ));

    assert!(matches!(
        store.resolve("alice").await,
        Err(VoiceError::VoiceNotFound(_))
    ));
    assert!(store.list().await.unwrap().is_empty());
    // Not even a temp file may survive a failed clone.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_reclone_overwrites_existing_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"parameters":{"pitch":0.1,"timbre":0.0,"pace":1.0}}"#))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"parameters":{"pitch":0.9,"timbre":0.0,"pace":1.0}}"#))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&server.uri(), dir.path());

    let first = store.clone_voice("alice", b"first sample").await.unwrap();
    let second = store.clone_voice("alice", b"second sample").await.unwrap();
    assert!((first.parameters.pitch - 0.1).abs() < f32::EPSILON);
    assert!((second.parameters.pitch - 0.9).abs() < f32::EPSILON);

    // Resolve sees the replacement, and only one artifact exists.
    let resolved = store.resolve("alice").await.unwrap();
    assert_eq!(resolved, second);
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_text_makes_no_network_call() {
    let server = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&server.uri(), dir.path());

    assert!(matches!(
        store.synthesize("", Some("default")).await,
        Err(VoiceError::Validation(_))
    ));
    assert!(matches!(
        store.synthesize("   ", None).await,
        Err(VoiceError::Validation(_))
    ));
}

#[tokio::test]
async fn test_empty_sample_makes_no_network_call() {
    let server = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&server.uri(), dir.path());

    assert!(matches!(
        store.clone_voice("alice", &[]).await,
        Err(VoiceError::Validation(_))
    ));
}

#[tokio::test]
async fn test_preset_synthesis_returns_upstream_bytes_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "inputs": "Hello world",
            "parameters": {"voice_preset": "female"}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"AUDIO".to_vec())
                .insert_header("Content-Type", "audio/wav"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&server.uri(), dir.path());

    let audio = store.synthesize("Hello world", Some("female")).await.unwrap();
    assert_eq!(audio.data, b"AUDIO");
    assert_eq!(audio.content_type, "audio/wav");
}

#[tokio::test]
async fn test_cloned_voice_synthesis_carries_profile_conditioning() {
    let server = MockServer::start().await;
    // Clone call first, then the conditioned synthesis call.
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "parameters": {"task": "voice_extraction"}
        })))
        .respond_with(clone_success())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "inputs": "Hi there",
            "parameters": {"voice_preset": "alice", "pace": 1.1}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"CLONED-AUDIO".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&server.uri(), dir.path());

    store.clone_voice("alice", b"reference sample").await.unwrap();
    let audio = store.synthesize("Hi there", Some("alice")).await.unwrap();
    assert_eq!(audio.data, b"CLONED-AUDIO");
}

#[tokio::test]
async fn test_unknown_voice_reference_is_validation_error() {
    let server = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&server.uri(), dir.path());

    assert!(matches!(
        store.synthesize("Hello", Some("nobody")).await,
        Err(VoiceError::Validation(_))
    ));
}

#[tokio::test]
async fn test_list_is_sorted_and_stable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(clone_success())
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&server.uri(), dir.path());

    store.clone_voice("bob", b"sample b").await.unwrap();
    store.clone_voice("alice", b"sample a").await.unwrap();

    let first = store.list().await.unwrap();
    assert_eq!(first, vec!["alice".to_string(), "bob".to_string()]);

    let second = store.list().await.unwrap();
    assert_eq!(first, second);
}
