// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

// Tweet-authorship analysis flow.
//
// Consumes the `/analyze` stream: progress records carry the cumulative
// LLM explanation, the final record the predicted author and confidence
// scores.

use serde::Deserialize;

use crate::stream::{Record, RecordSink};

/// The authoritative result of one analysis stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthorshipVerdict {
    pub predicted_author: String,
    pub explanation: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub topic_confidence: f64,
}

impl AuthorshipVerdict {
    /// Deserialize from a final record. Domain fields pass through the
    /// stream core untouched, so shape errors surface here.
    pub fn from_record(record: &Record) -> Result<Self, serde_json::Error> {
        serde_json::from_value(record.value().clone())
    }
}

/// Collects one analysis session's outcome.
///
/// Holds what a caller displays live: the growing explanation while the
/// stream runs, then exactly one of verdict, error, cancellation, or a
/// close without any result.
#[derive(Debug, Default)]
pub struct AnalysisOutcome {
    pub explanation: String,
    pub verdict: Option<AuthorshipVerdict>,
    pub error: Option<String>,
    pub malformed_lines: usize,
    pub cancelled: bool,
    pub closed_without_result: bool,
}

impl AnalysisOutcome {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for AnalysisOutcome {
    fn on_progress(&mut self, text: &str) {
        // Progress text is cumulative, not a delta.
        self.explanation = text.to_string();
    }

    fn on_final(&mut self, record: Record) {
        match AuthorshipVerdict::from_record(&record) {
            Ok(verdict) => {
                self.explanation = verdict.explanation.clone();
                self.verdict = Some(verdict);
            }
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
    }

    fn on_closed(&mut self) {
        self.closed_without_result = true;
    }

    fn on_cancelled(&mut self) {
        self.cancelled = true;
    }
}
