// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

// Backend HTTP client.
//
// Thin adapter between the backend's HTTP surface and the stream
// controller: issues the request, validates the status, and exposes the
// chunked response body as a fallible byte stream.

use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::config::Config;

// ---------------------------------------------------------------------------
// Transport types
// ---------------------------------------------------------------------------

/// Byte chunks as delivered by the backend, in order, until end of
/// stream. Chunk boundaries are unrelated to line or record boundaries.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Transport-level failures: connection and HTTP status problems, as
/// opposed to malformed records, which are recovered in-stream. Not
/// retried here; the caller decides whether to start a new session.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("HTTP {status} from backend: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("connection interrupted mid-stream: {0}")]
    Interrupted(String),

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

// ---------------------------------------------------------------------------
// Request/response bodies
// ---------------------------------------------------------------------------

/// Request body for `/analyze`.
#[derive(Debug, Serialize)]
struct TweetRequest<'a> {
    tweet: &'a str,
}

/// Request body for `/generate_tweet`.
#[derive(Debug, Serialize)]
struct TweetGenerationRequest<'a> {
    author: &'a str,
    topic: &'a str,
}

/// Response body for `/analytics/topics`.
#[derive(Debug, Deserialize)]
struct TopicsResponse {
    topics: Vec<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the tweet-authorship analysis/generation backend.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.backend.connect_timeout_ms))
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self {
            http,
            base_url: config.backend.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Start an authorship analysis stream for one tweet.
    pub async fn analyze(&self, tweet: &str) -> Result<ByteStream, TransportError> {
        let url = format!("{}/analyze", self.base_url);
        self.post_ndjson(&url, &TweetRequest { tweet }).await
    }

    /// Start a tweet-generation stream for one author/topic pair.
    pub async fn generate(&self, author: &str, topic: &str) -> Result<ByteStream, TransportError> {
        let url = format!("{}/generate_tweet", self.base_url);
        self.post_ndjson(&url, &TweetGenerationRequest { author, topic })
            .await
    }

    /// Topics on record for an author; these parameterize the generation
    /// flow.
    pub async fn topics(&self, author: &str) -> Result<Vec<String>, TransportError> {
        let url = format!("{}/analytics/topics", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("author", author)])
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.clone(),
                source: e,
            })?;
        let response = check_status(response).await?;
        let body: TopicsResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Request { url, source: e })?;
        Ok(body.topics)
    }

    async fn post_ndjson<B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<ByteStream, TransportError> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                source: e,
            })?;
        let response = check_status(response).await?;
        let stream = response
            .bytes_stream()
            .map_err(|e| TransportError::Interrupted(e.to_string()));
        Ok(Box::pin(stream))
    }
}

/// Reject non-success statuses before streaming begins. The backend
/// returns JSON error bodies (404 when no context tweets exist, 500 on
/// internal failure); the body text is carried into the error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::HttpStatus {
        status: status.as_u16(),
        body,
    })
}
