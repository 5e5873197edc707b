//! Lazy event stream over a byte source.
//!
//! Wraps an [`EventDecoder`] and a transport byte stream into a
//! `futures::Stream` of decoded events. The byte source is owned by the
//! stream: dropping the stream early closes the source, and the source is
//! dropped as soon as the session ends.

use std::collections::VecDeque;
use std::pin::Pin;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::ApiError;
use crate::sse::decoder::EventDecoder;
use crate::sse::events::DecodeDiagnostic;
use crate::traits::ByteStream;

/// Stream of decoded events produced by one streaming call
pub type EventStream = Pin<Box<dyn Stream<Item = Result<Value, ApiError>> + Send>>;

/// Per-call session state.
enum Session {
    /// Waiting for the next chunk, or handing out events already decoded
    Streaming {
        source: ByteStream,
        decoder: EventDecoder,
        pending: VecDeque<Value>,
    },
    /// Terminal; source and buffer have been dropped
    Ended,
}

/// Decode a byte stream into a lazy sequence of JSON events.
///
/// Events are yielded one at a time; the next chunk is only pulled once every
/// event decoded from the previous chunk has been consumed. An upstream
/// transport error is yielded once as [`ApiError::Transport`] and ends the
/// stream. Malformed payloads are skipped; if `diagnostics` is given, each one
/// is also sent there.
pub fn decode_event_stream(
    source: ByteStream,
    diagnostics: Option<UnboundedSender<DecodeDiagnostic>>,
) -> EventStream {
    let session = Session::Streaming {
        source,
        decoder: EventDecoder::new(),
        pending: VecDeque::new(),
    };

    let event_stream = stream::unfold((session, diagnostics), |(session, diagnostics)| async move {
        let (mut source, mut decoder, mut pending) = match session {
            Session::Streaming {
                source,
                decoder,
                pending,
            } => (source, decoder, pending),
            Session::Ended => return None,
        };

        loop {
            if let Some(event) = pending.pop_front() {
                let session = Session::Streaming {
                    source,
                    decoder,
                    pending,
                };
                return Some((Ok(event), (session, diagnostics)));
            }

            match source.next().await {
                Some(Ok(chunk)) => {
                    pending.extend(decoder.feed(&chunk));
                    for diagnostic in decoder.take_diagnostics() {
                        if let Some(tx) = &diagnostics {
                            // Observers going away never affects decoding
                            let _ = tx.send(diagnostic);
                        }
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!("Byte stream failed after {} events: {}", decoder.events_emitted(), e);
                    drop(source);
                    decoder.finish();
                    return Some((Err(ApiError::Transport(e)), (Session::Ended, diagnostics)));
                }
                None => {
                    tracing::debug!(
                        "Byte stream ended: {} frames, {} events",
                        decoder.frames_decoded(),
                        decoder.events_emitted()
                    );
                    decoder.finish();
                    return None;
                }
            }
        }
    });

    Box::pin(event_stream.fuse())
}
