//! Frame-level SSE parsing
//!
//! A frame is one blank-line-delimited block of text. Only lines that start
//! with the exact prefix `data: ` carry payload; every other line type is
//! ignored so that new line kinds from the server never break decoding.

use serde_json::Value;

use crate::sse::events::{DecodeDiagnostic, SseLine, DATA_PREFIX};

/// Classify a single SSE line
pub fn parse_sse_line(line: &str) -> SseLine<'_> {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(rest) = line.strip_prefix(DATA_PREFIX) {
        return SseLine::Data(rest);
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim());
    }

    SseLine::Other(line)
}

/// Decode every data line of a complete frame.
///
/// Returns the parsed events in line order together with a diagnostic for
/// each data line that was not valid JSON. Data lines that are blank after
/// trimming are skipped silently.
pub fn decode_frame(frame: &str) -> (Vec<Value>, Vec<DecodeDiagnostic>) {
    let mut events = Vec::new();
    let mut diagnostics = Vec::new();

    for line in frame.split('\n') {
        let payload = match parse_sse_line(line) {
            SseLine::Data(payload) => payload,
            other => {
                tracing::trace!("Ignoring {} line", other.kind());
                continue;
            }
        };

        if payload.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(payload) {
            Ok(value) => events.push(value),
            Err(e) => {
                tracing::warn!("Skipping malformed event: {} for: {}", e, payload);
                diagnostics.push(DecodeDiagnostic::MalformedEvent {
                    payload: payload.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    (events, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(parse_sse_line(""), SseLine::Empty);
    }

    #[test]
    fn test_parse_data_line() {
        assert_eq!(
            parse_sse_line(r#"data: {"text": "hello"}"#),
            SseLine::Data(r#"{"text": "hello"}"#)
        );
        // Only the first space belongs to the prefix
        assert_eq!(parse_sse_line("data:  {}"), SseLine::Data(" {}"));
    }

    #[test]
    fn test_data_without_space_is_not_payload() {
        assert_eq!(parse_sse_line("data:{\"x\":1}"), SseLine::Other("data:{\"x\":1}"));
    }

    #[test]
    fn test_parse_comment_and_event_lines() {
        assert_eq!(parse_sse_line(": keep-alive"), SseLine::Comment("keep-alive"));
        assert_eq!(parse_sse_line("event:  ping "), SseLine::Event("ping"));
        assert_eq!(parse_sse_line("id: 7"), SseLine::Other("id: 7"));
    }

    #[test]
    fn test_decode_frame_single_event() {
        let (events, diags) = decode_frame(r#"data: {"a":1}"#);
        assert_eq!(events, vec![json!({"a": 1})]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_decode_frame_multiple_data_lines() {
        // Each data line is its own event, not a joined payload
        let (events, _) = decode_frame("data: {\"a\":1}\ndata: {\"b\":2}");
        assert_eq!(events, vec![json!({"a": 1}), json!({"b": 2})]);
    }

    #[test]
    fn test_decode_frame_ignores_other_lines() {
        let (events, diags) = decode_frame("event: content\n: comment\nid: 3\ndata: {\"a\":1}");
        assert_eq!(events, vec![json!({"a": 1})]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_decode_frame_blank_payload_skipped() {
        let (events, diags) = decode_frame("data: \ndata:    ");
        assert!(events.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_decode_frame_malformed_then_valid() {
        let (events, diags) = decode_frame("data: not-json\ndata: {\"a\":1}");
        assert_eq!(events, vec![json!({"a": 1})]);
        assert_eq!(diags.len(), 1);
        match &diags[0] {
            DecodeDiagnostic::MalformedEvent { payload, .. } => assert_eq!(payload, "not-json"),
        }
    }

    #[test]
    fn test_decode_frame_non_object_json() {
        let (events, _) = decode_frame("data: 42\ndata: \"hi\"\ndata: [1,2]");
        assert_eq!(events, vec![json!(42), json!("hi"), json!([1, 2])]);
    }
}
