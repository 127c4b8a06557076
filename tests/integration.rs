// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

// Integration tests.
//
// End-to-end tests exercising the full pipeline:
// request → status check → byte stream → decode → frame → classify → sink
//
// Uses wiremock as the backend mock and the real BackendClient; no mocks
// inside the pipeline itself.

use std::sync::Arc;

use mockingbird::analysis::AnalysisOutcome;
use mockingbird::client::{BackendClient, TransportError};
use mockingbird::config::{self, StringSource};
use mockingbird::generation::GenerationOutcome;
use mockingbird::stream::{
    AnalysisClassifier, GenerationClassifier, SessionState, StreamSession,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Infrastructure
// ---------------------------------------------------------------------------

/// Build a client pointed at the mock backend.
fn test_client(server: &MockServer) -> BackendClient {
    let yaml = format!(
        "mockingbird: v1\nbackend:\n  base_url: \"{}\"\n",
        server.uri()
    );
    let config =
        config::load_config(&StringSource(yaml)).expect("test config should parse");
    BackendClient::new(&config).expect("client should build")
}

fn ndjson(lines: &[&str]) -> ResponseTemplate {
    let mut body = String::new();
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson")
}

// ---------------------------------------------------------------------------
// Analysis flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn analysis_stream_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_json(serde_json::json!({"tweet": "We did it."})))
        .respond_with(ndjson(&[
            r#"{"explanation": "", "streaming": true}"#,
            r#"{"explanation": "The measured", "streaming": true}"#,
            r#"{"explanation": "The measured cadence points to Obama.", "streaming": true}"#,
            r#"{"predicted_author": "Obama", "explanation": "The measured cadence points to Obama.", "confidence": 100.0, "topic": "politics", "topic_confidence": 87.5, "streaming": false}"#,
        ]))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let stream = client.analyze("We did it.").await.expect("request should succeed");

    let mut outcome = AnalysisOutcome::new();
    let state = StreamSession::new(Arc::new(AnalysisClassifier))
        .run(stream, &mut outcome, CancellationToken::new())
        .await;

    assert_eq!(state, SessionState::Closed);
    assert_eq!(outcome.malformed_lines, 0);
    assert!(outcome.error.is_none());
    let verdict = outcome.verdict.expect("verdict should be present");
    assert_eq!(verdict.predicted_author, "Obama");
    assert_eq!(verdict.topic, "politics");
    assert_eq!(outcome.explanation, "The measured cadence points to Obama.");
}

#[tokio::test]
async fn analysis_survives_a_corrupt_line() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ndjson(&[
            r#"{"explanation": "Looking", "streaming": true}"#,
            "%% garbage line %%",
            r#"{"predicted_author": "Musk", "explanation": "Short and blunt.", "streaming": false}"#,
        ]))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let stream = client.analyze("to the moon").await.expect("request should succeed");

    let mut outcome = AnalysisOutcome::new();
    StreamSession::new(Arc::new(AnalysisClassifier))
        .run(stream, &mut outcome, CancellationToken::new())
        .await;

    assert_eq!(outcome.malformed_lines, 1);
    assert_eq!(
        outcome.verdict.expect("verdict should survive").predicted_author,
        "Musk"
    );
}

#[tokio::test]
async fn analysis_non_success_status_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            r#"{"predicted_author": "ERROR", "explanation": "No tweets found for this topic. Please try a different tweet.", "streaming": false}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .analyze("obscure topic")
        .await
        .expect_err("404 should not stream");

    match err {
        TransportError::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("No tweets found"));
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Generation flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generation_stream_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_tweet"))
        .and(body_json(serde_json::json!({
            "author": "Obama",
            "topic": "healthcare"
        })))
        .respond_with(ndjson(&[
            r#"{"generated_tweet": "", "streaming": true}"#,
            r#"{"generated_tweet": "Health care is", "streaming": true}"#,
            r#"{"generated_tweet": "Health care is a right, not a privilege.", "streaming": true}"#,
            r#"{"generated_tweet": "Health care is a right, not a privilege.", "streaming": false}"#,
        ]))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let stream = client
        .generate("Obama", "healthcare")
        .await
        .expect("request should succeed");

    let mut outcome = GenerationOutcome::new();
    let state = StreamSession::new(Arc::new(GenerationClassifier))
        .run(stream, &mut outcome, CancellationToken::new())
        .await;

    assert_eq!(state, SessionState::Closed);
    assert!(outcome.error.is_none());
    assert_eq!(
        outcome.tweet.as_deref(),
        Some("Health care is a right, not a privilege.")
    );
}

#[tokio::test]
async fn generation_error_record_halts_and_clears_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_tweet"))
        .respond_with(ndjson(&[
            r#"{"generated_tweet": "We choose to", "streaming": true}"#,
            r#"{"error": "LLM API connection failed.", "streaming": false}"#,
            r#"{"generated_tweet": "never delivered", "streaming": false}"#,
        ]))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let stream = client
        .generate("Musk", "space")
        .await
        .expect("request should succeed");

    let mut outcome = GenerationOutcome::new();
    StreamSession::new(Arc::new(GenerationClassifier))
        .run(stream, &mut outcome, CancellationToken::new())
        .await;

    assert_eq!(outcome.error.as_deref(), Some("LLM API connection failed."));
    assert!(outcome.draft.is_empty(), "draft should be cleared on error");
    assert!(outcome.tweet.is_none(), "no tweet after an error record");
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn topics_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analytics/topics"))
        .and(query_param("author", "Musk"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"author": "Musk", "topics": ["space", "ai", "manufacturing"]}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let topics = client.topics("Musk").await.expect("request should succeed");
    assert_eq!(topics, vec!["space", "ai", "manufacturing"]);
}

#[tokio::test]
async fn topics_server_error_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analytics/topics"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_raw(r#"{"error": "database unavailable"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .topics("Obama")
        .await
        .expect_err("500 should be an error");
    match err {
        TransportError::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("database unavailable"));
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}
