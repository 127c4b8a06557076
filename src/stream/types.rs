// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

// Stream types: records, classification results, the consumer sink
// interface, and session lifecycle.

use serde_json::Value;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A successfully parsed NDJSON record.
///
/// The backend's domain fields (predicted author, confidence scores,
/// generated tweet text) are opaque to the stream core: the record keeps
/// the full JSON value and interprets only the two fields the protocol
/// itself defines: the `"streaming"` discriminator and the optional
/// `"error"` message.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    value: Value,
}

impl Record {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// The non-terminal discriminator. A record without `"streaming"`
    /// counts as final.
    pub fn streaming(&self) -> bool {
        self.value
            .get("streaming")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Backend-reported error message, if the record carries one.
    pub fn error(&self) -> Option<&str> {
        self.value.get("error").and_then(Value::as_str)
    }

    /// A named string field. Classifiers use this to pull the flow's
    /// progress text out of non-terminal records.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.value.get(name).and_then(Value::as_str)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classification of one complete, non-empty NDJSON line.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    /// Non-terminal update. `text` is the flow's human-readable progress
    /// field when present; the backend sends cumulative text, not deltas.
    Progress { text: Option<String>, record: Record },

    /// Terminal result. A later final record supersedes an earlier one.
    Final(Record),

    /// Parsed record with an `"error"` field: the operation failed even
    /// though the transport is healthy.
    BackendError { message: String, record: Record },

    /// The line was not valid JSON. Recoverable; the stream continues.
    Malformed { raw: String, reason: String },
}

// ---------------------------------------------------------------------------
// Consumer sink
// ---------------------------------------------------------------------------

/// Callback interface for one stream session.
///
/// The controller invokes these synchronously from its read loop, in
/// arrival order. Exactly one terminal callback (`on_final`, `on_error`,
/// `on_closed`, or `on_cancelled`) fires per session, after every
/// `on_progress` and `on_malformed` for that session.
pub trait RecordSink {
    /// Non-terminal progress text (cumulative). Empty when the record
    /// carried no progress field.
    fn on_progress(&mut self, text: &str);

    /// The authoritative result: the last final record seen on the
    /// stream, delivered at close.
    fn on_final(&mut self, record: Record);

    /// A line that failed JSON parsing. The session continues.
    fn on_malformed(&mut self, raw: &str, reason: &str);

    /// Terminal failure from a backend error record or a transport
    /// failure. No further records follow.
    fn on_error(&mut self, message: &str);

    /// The stream closed without any final record.
    fn on_closed(&mut self);

    /// The session was cancelled before completion. Distinct from a
    /// normal close: the backend did not return "nothing", the caller
    /// stopped listening.
    fn on_cancelled(&mut self);
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle of one stream session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet reading.
    Idle,
    /// Consuming chunks from the transport.
    Reading,
    /// End of stream seen; flushing the decoder and line buffer.
    Draining,
    /// Finished; the terminal callback has been delivered.
    Closed,
    /// The transport failed mid-stream.
    Failed,
}
