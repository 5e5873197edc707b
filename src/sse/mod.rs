//! SSE (Server-Sent Events) stream decoding
//!
//! Decodes the chat backend's streaming response. The wire format is:
//! - `data: <json>` - payload line, one JSON event per line
//! - Empty line - ends a frame
//! - Any other line (`event:`, `id:`, `: comment`) - ignored
//!
//! # Module structure
//! - `events` - Line classification and decode diagnostics
//! - `parser` - Frame-level parsing (`parse_sse_line`, `decode_frame`)
//! - `decoder` - Incremental byte-to-event decoder (`EventDecoder`)
//! - `stream` - Lazy `Stream` adapter over a transport byte stream

mod decoder;
mod events;
mod parser;
mod stream;

pub use decoder::EventDecoder;
pub use events::{DecodeDiagnostic, SseLine, DATA_PREFIX};
pub use parser::{decode_frame, parse_sse_line};
pub use stream::{decode_event_stream, EventStream};
