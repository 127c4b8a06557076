// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

// Line framing.
//
// Accumulates decoded text and yields complete newline-delimited lines.
// The suffix after the last newline stays buffered until the next chunk
// completes it.

/// Splits decoded text into complete lines across chunk boundaries.
///
/// The buffer holds exactly the text after the last newline seen so far.
/// Empty lines are yielded; they carry no record and the caller skips
/// them. The buffer is unbounded: records are small analytic payloads,
/// so correctness wins over memory bounding here.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: String,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append newly decoded text and return every complete line, in
    /// order. The segment after the last newline is retained, not
    /// returned: it is not yet known to be complete.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.buffer.push_str(text);
        match self.buffer.rfind('\n') {
            None => Vec::new(),
            Some(last) => {
                let rest = self.buffer.split_off(last + 1);
                let complete = std::mem::replace(&mut self.buffer, rest);
                complete[..last].split('\n').map(str::to_string).collect()
            }
        }
    }

    /// The retained partial line, consumed at end of stream.
    pub fn take_remainder(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}
