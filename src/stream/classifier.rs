// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

// Record classifiers.
//
// Each non-empty line is an independent JSON object. The two flows share
// the wire protocol but name their progress-text field differently: the
// authorship flow streams a growing "explanation", the generation flow a
// growing "generated_tweet". A classifier knows which field to surface.

use serde_json::Value;

use super::types::{Classified, Record};

// ---------------------------------------------------------------------------
// Trait: RecordClassifier
// ---------------------------------------------------------------------------

/// Classifies one complete, non-empty NDJSON line.
///
/// Classification is a pure function of the line text: the same line
/// always yields the same result.
pub trait RecordClassifier: Send + Sync {
    fn classify(&self, line: &str) -> Classified;
}

// ---------------------------------------------------------------------------
// Flow classifiers
// ---------------------------------------------------------------------------

/// Classifier for the tweet-authorship analysis stream. Progress records
/// carry the cumulative LLM explanation in `"explanation"`.
pub struct AnalysisClassifier;

impl RecordClassifier for AnalysisClassifier {
    fn classify(&self, line: &str) -> Classified {
        classify_line(line, "explanation")
    }
}

/// Classifier for the tweet-generation stream. Progress records carry the
/// cumulative draft in `"generated_tweet"`.
pub struct GenerationClassifier;

impl RecordClassifier for GenerationClassifier {
    fn classify(&self, line: &str) -> Classified {
        classify_line(line, "generated_tweet")
    }
}

// ---------------------------------------------------------------------------
// Shared rules
// ---------------------------------------------------------------------------

/// Shared classification rules:
///
/// - Parse failure: malformed. Reported and skipped; one corrupt update
///   does not abort the session.
/// - `"error"` present: backend-reported failure, terminal for the
///   operation even though the transport is healthy.
/// - `"streaming"` true: non-terminal progress.
/// - Otherwise: final. A later final supersedes an earlier one.
fn classify_line(line: &str, progress_field: &str) -> Classified {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            return Classified::Malformed {
                raw: line.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let record = Record::new(value);

    if let Some(message) = record.error() {
        let message = message.to_string();
        return Classified::BackendError { message, record };
    }

    if record.streaming() {
        let text = record.text_field(progress_field).map(str::to_string);
        return Classified::Progress { text, record };
    }

    Classified::Final(record)
}
