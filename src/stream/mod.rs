// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

// NDJSON progress/final streaming.
//
// Responsibilities:
// - Decode raw byte chunks into text, joining multi-byte characters
//   split across chunk boundaries
// - Frame decoded text into complete newline-delimited lines
// - Classify each line as progress, final, backend error, or malformed
// - Drive the read loop and deliver records to a consumer sink in
//   arrival order, with exactly one terminal notification per session
// - Recover from malformed records without aborting the stream

mod classifier;
mod controller;
mod decode;
mod framer;
mod types;

pub use classifier::{AnalysisClassifier, GenerationClassifier, RecordClassifier};
pub use controller::StreamSession;
pub use decode::Utf8Decoder;
pub use framer::LineFramer;
pub use types::{Classified, Record, RecordSink, SessionState};
