// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

// Incremental UTF-8 decoding.
//
// Transport chunks cut the byte stream anywhere, including inside a
// multi-byte character. The decoder carries the truncated tail of one
// sequence between calls so text is never split or corrupted at chunk
// boundaries.

/// Incremental UTF-8 decoder with carry state between chunks.
///
/// Invalid interior sequences decode to U+FFFD immediately; a sequence
/// truncated at the end of a chunk is held back and completed by the next
/// chunk. `flush` substitutes any carry the stream never completed rather
/// than failing the whole stream.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    carry: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, joining any bytes carried from the previous
    /// call. Incomplete trailing bytes are retained for the next chunk.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let joined;
        let mut rest: &[u8] = if self.carry.is_empty() {
            chunk
        } else {
            let mut bytes = std::mem::take(&mut self.carry);
            bytes.extend_from_slice(chunk);
            joined = bytes;
            &joined
        };

        let mut out = String::with_capacity(rest.len());
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // The prefix up to valid_up_to is UTF-8 by contract.
                    out.push_str(std::str::from_utf8(valid).unwrap_or(""));
                    match e.error_len() {
                        // Invalid sequence inside the chunk: substitute
                        // and keep decoding.
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        // Truncated sequence at the end of the chunk:
                        // carry it forward.
                        None => {
                            self.carry = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// End of stream: a carried partial sequence can no longer complete.
    /// Returns its replacement instead of an error.
    pub fn flush(&mut self) -> String {
        if self.carry.is_empty() {
            String::new()
        } else {
            self.carry.clear();
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }
}
