//! Incremental SSE decoder
//!
//! Turns arbitrarily split byte chunks into decoded JSON events. Chunk
//! boundaries may fall anywhere: inside a frame, inside a JSON payload,
//! between the `\r` and `\n` of a line ending, or inside a multi-byte
//! UTF-8 character.

use serde_json::Value;

use crate::sse::events::DecodeDiagnostic;
use crate::sse::parser::decode_frame;

const FRAME_DELIMITER: &str = "\n\n";

/// Stateful decoder owning the buffer of one streaming session.
///
/// Between calls to [`EventDecoder::feed`] the buffer holds at most one
/// partial frame; every complete frame has already been decoded and removed.
#[derive(Debug, Default)]
pub struct EventDecoder {
    /// Trailing bytes of an incomplete UTF-8 sequence from the last chunk
    utf8_carry: Vec<u8>,
    /// Decoded, CRLF-normalized text not yet closed by a blank line
    buffer: String,
    /// Recovered problems since the last `take_diagnostics`
    diagnostics: Vec<DecodeDiagnostic>,
    events_emitted: u64,
    frames_decoded: u64,
}

impl EventDecoder {
    /// Create a new decoder with an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return the events completed by it, in order.
    ///
    /// Malformed payloads are skipped and recorded as diagnostics.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Value> {
        let text = self.decode_utf8(chunk);
        let scan_from = self.append_normalized(&text);

        let mut events = Vec::new();
        let mut consumed = 0;
        let mut search_from = scan_from;

        while let Some(rel) = self.buffer[search_from..].find(FRAME_DELIMITER) {
            let end = search_from + rel;
            let (frame_events, frame_diagnostics) = decode_frame(&self.buffer[consumed..end]);
            self.frames_decoded += 1;
            events.extend(frame_events);
            self.diagnostics.extend(frame_diagnostics);

            consumed = end + FRAME_DELIMITER.len();
            search_from = consumed;
        }

        if consumed > 0 {
            self.buffer.drain(..consumed);
        }

        self.events_emitted += events.len() as u64;
        tracing::trace!(
            "Decoded chunk of {} bytes: {} events, {} bytes pending",
            chunk.len(),
            events.len(),
            self.buffer.len()
        );
        events
    }

    /// Text waiting for a frame delimiter.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Drain the diagnostics recorded so far.
    pub fn take_diagnostics(&mut self) -> Vec<DecodeDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Total number of events returned by this decoder
    pub fn events_emitted(&self) -> u64 {
        self.events_emitted
    }

    /// Total number of complete frames processed
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// End the session, discarding any unterminated remainder.
    ///
    /// Returns the number of discarded bytes. Trailing data without a
    /// closing blank line is never parsed.
    pub fn finish(self) -> usize {
        let discarded = self.buffer.len() + self.utf8_carry.len();
        if discarded > 0 {
            tracing::debug!("Stream ended with {} unterminated bytes, dropping", discarded);
        }
        discarded
    }

    /// Decode bytes as UTF-8, carrying an incomplete trailing sequence over
    /// to the next chunk. Invalid sequences become U+FFFD.
    fn decode_utf8(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.utf8_carry);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            // Incomplete sequence at the end; wait for more bytes
                            self.utf8_carry = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Append text, rewriting CRLF to LF in the appended region.
    ///
    /// Only the new tail is rewritten, plus a `\r` left at the end of the
    /// previous buffer. Returns the byte offset where delimiter scanning must
    /// start: nothing before it can contain `\n\n`.
    fn append_normalized(&mut self, text: &str) -> usize {
        let from = if self.buffer.ends_with('\r') {
            self.buffer.len() - 1
        } else {
            self.buffer.len()
        };

        self.buffer.push_str(text);

        if self.buffer[from..].contains("\r\n") {
            let tail = self.buffer[from..].replace("\r\n", "\n");
            self.buffer.truncate(from);
            self.buffer.push_str(&tail);
        }

        // A delimiter may straddle the old end of the buffer
        if from > 0 && self.buffer.as_bytes()[from - 1] == b'\n' {
            from - 1
        } else {
            from
        }
    }
}
