// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

// Stream controller.
//
// Owns the read loop for one session: chunk → decode → frame → classify
// → deliver. The line buffer and the latest final record are the only
// state carried across iterations; everything else is recomputed per
// chunk.

use std::sync::Arc;

use bytes::Bytes;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use super::classifier::RecordClassifier;
use super::decode::Utf8Decoder;
use super::framer::LineFramer;
use super::types::{Classified, Record, RecordSink, SessionState};

/// One end-to-end streamed request/response exchange.
///
/// Sessions are single-use: `run` consumes the session and all state is
/// discarded when the loop exits. Two sessions never share a decoder,
/// buffer, or final-record slot, so independent flows can stream
/// concurrently without interference.
pub struct StreamSession {
    classifier: Arc<dyn RecordClassifier>,
    decoder: Utf8Decoder,
    framer: LineFramer,
    latest_final: Option<Record>,
    state: SessionState,
}

impl StreamSession {
    pub fn new(classifier: Arc<dyn RecordClassifier>) -> Self {
        Self {
            classifier,
            decoder: Utf8Decoder::new(),
            framer: LineFramer::new(),
            latest_final: None,
            state: SessionState::Idle,
        }
    }

    /// Drive the read loop to completion.
    ///
    /// Consumes chunks from `input` until end of stream, transport error,
    /// backend-reported error record, or cancellation. All sink callbacks
    /// fire synchronously from this loop in arrival order; exactly one
    /// terminal callback fires, after every progress callback.
    ///
    /// Cancellation is cooperative: it takes effect at the next chunk
    /// read, never mid-chunk.
    pub async fn run<T, E, S>(
        mut self,
        mut input: T,
        sink: &mut S,
        cancel: CancellationToken,
    ) -> SessionState
    where
        T: Stream<Item = Result<Bytes, E>> + Unpin,
        E: std::fmt::Display,
        S: RecordSink + ?Sized,
    {
        self.state = SessionState::Reading;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("session cancelled");
                    self.state = SessionState::Closed;
                    sink.on_cancelled();
                    return self.state;
                }
                chunk = input.next() => match chunk {
                    None => break,
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "transport failed mid-stream");
                        self.state = SessionState::Failed;
                        sink.on_error(&e.to_string());
                        return self.state;
                    }
                    Some(Ok(bytes)) => {
                        let text = self.decoder.decode(&bytes);
                        if !self.deliver_lines(&text, sink) {
                            // Backend error record: the error callback has
                            // fired and no further chunks are read.
                            self.state = SessionState::Closed;
                            return self.state;
                        }
                    }
                },
            }
        }

        // End of stream. Flush the decoder, then drop whatever partial
        // line is left: a well-formed stream ends on a line boundary, so
        // leftover text is never force-parsed.
        self.state = SessionState::Draining;
        let tail = self.decoder.flush();
        if !tail.is_empty() {
            // A replacement character cannot complete a line; it joins
            // the leftover buffer and is discarded with it below.
            let _ = self.framer.push(&tail);
        }
        let leftover = self.framer.take_remainder();
        if !leftover.trim().is_empty() {
            tracing::debug!(
                bytes = leftover.len(),
                "discarding incomplete trailing line"
            );
        }

        self.state = SessionState::Closed;
        match self.latest_final.take() {
            Some(record) => sink.on_final(record),
            None => sink.on_closed(),
        }
        self.state
    }

    /// Frame `text` into complete lines and deliver each classified
    /// record in order. Returns false when a backend-reported error ended
    /// the session (the error callback has already fired).
    fn deliver_lines<S: RecordSink + ?Sized>(&mut self, text: &str, sink: &mut S) -> bool {
        for line in self.framer.push(text) {
            // Blank lines carry no record.
            if line.trim().is_empty() {
                continue;
            }
            match self.classifier.classify(&line) {
                Classified::Progress { text, .. } => {
                    sink.on_progress(text.as_deref().unwrap_or(""));
                }
                Classified::Final(record) => {
                    // Last final wins; delivered once at close.
                    self.latest_final = Some(record);
                }
                Classified::BackendError { message, .. } => {
                    tracing::debug!(%message, "backend reported an error record");
                    sink.on_error(&message);
                    return false;
                }
                Classified::Malformed { raw, reason } => {
                    tracing::warn!(%reason, "skipping malformed record");
                    sink.on_malformed(&raw, &reason);
                }
            }
        }
        true
    }
}
