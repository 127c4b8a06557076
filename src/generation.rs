// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

// Tweet-generation flow.
//
// Consumes the `/generate_tweet` stream: progress records carry the
// cumulative draft, the final record the finished tweet. An error record
// ends accumulation: a partial draft is never kept alongside an error.

use serde::Deserialize;

use crate::stream::{Record, RecordSink};

/// The finished tweet from a generation stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedTweet {
    pub generated_tweet: String,
}

impl GeneratedTweet {
    pub fn from_record(record: &Record) -> Result<Self, serde_json::Error> {
        serde_json::from_value(record.value().clone())
    }
}

/// Collects one generation session's outcome.
#[derive(Debug, Default)]
pub struct GenerationOutcome {
    /// The growing draft, replaced per progress record.
    pub draft: String,
    pub tweet: Option<String>,
    pub error: Option<String>,
    pub malformed_lines: usize,
    pub cancelled: bool,
    pub closed_without_result: bool,
}

impl GenerationOutcome {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for GenerationOutcome {
    fn on_progress(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    fn on_final(&mut self, record: Record) {
        match GeneratedTweet::from_record(&record) {
            Ok(t) => self.tweet = Some(t.generated_tweet),
            Err(e) => {
                self.error = Some(format!("final record had unexpected shape: {e}"));
            }
        }
    }

    fn on_malformed(&mut self, _raw: &str, _reason: &str) {
        self.malformed_lines += 1;
    }

    fn on_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
        // A draft produced before the failure is not a usable tweet.
        self.draft.clear();
    }

    fn on_closed(&mut self) {
        self.closed_without_result = true;
    }

    fn on_cancelled(&mut self) {
        self.cancelled = true;
    }
}
