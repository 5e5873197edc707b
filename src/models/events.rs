use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed view of a decoded chat event
///
/// The backend tags every event with a `type` field. The decoder itself
/// yields raw JSON; this is an optional layer for consumers that want to
/// match on known kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Model reasoning text
    Thinking { text: String },
    /// Answer text chunk
    Content { text: String },
    /// Agent started a tool
    ToolCall {
        tool: String,
        #[serde(default)]
        input: Value,
    },
    /// Tool finished
    ToolResponse {
        tool: String,
        #[serde(default)]
        output: String,
    },
    /// Backend failure reported in-band
    Error { text: String },
}

impl ChatEvent {
    /// Interpret a decoded event. Unknown or incomplete events yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }

    /// Returns the event type name as a string for debugging purposes.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            ChatEvent::Thinking { .. } => "thinking",
            ChatEvent::Content { .. } => "content",
            ChatEvent::ToolCall { .. } => "tool_call",
            ChatEvent::ToolResponse { .. } => "tool_response",
            ChatEvent::Error { .. } => "error",
        }
    }
}
