//! SSE line and diagnostic types
//!
//! Contains the line classification used while walking a frame and the
//! diagnostics recorded for events that could not be decoded.

use std::fmt;

/// Literal prefix that marks a payload-carrying line.
pub const DATA_PREFIX: &str = "data: ";

/// Represents a classified line inside an SSE frame
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine<'a> {
    /// Payload line (`data: <json>`), holding the text after the prefix
    Data(&'a str),
    /// Event type declaration (e.g., "event: ping")
    Event(&'a str),
    /// Comment line (starts with ':')
    Comment(&'a str),
    /// Empty line
    Empty,
    /// Anything else, including `data:` without the trailing space
    Other(&'a str),
}

impl SseLine<'_> {
    /// Short name used in trace logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SseLine::Data(_) => "data",
            SseLine::Event(_) => "event",
            SseLine::Comment(_) => "comment",
            SseLine::Empty => "empty",
            SseLine::Other(_) => "other",
        }
    }
}

/// A decode-local problem that was recovered from.
///
/// Diagnostics never stop the stream; they exist so callers can observe
/// what was skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeDiagnostic {
    /// A `data: ` line whose payload is not valid JSON
    MalformedEvent {
        /// The raw text after the `data: ` prefix
        payload: String,
        /// Parser error message
        message: String,
    },
}

impl DecodeDiagnostic {
    /// Stable kind name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeDiagnostic::MalformedEvent { .. } => "malformed_event",
        }
    }
}

impl fmt::Display for DecodeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeDiagnostic::MalformedEvent { payload, message } => {
                write!(f, "Malformed event ({}): {}", message, payload)
            }
        }
    }
}
