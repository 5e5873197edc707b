use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for the streaming chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// The user's message
    pub content: String,
    /// Conversation thread the message belongs to
    pub thread_id: String,
}

impl ChatRequest {
    /// Create a request for an existing thread
    pub fn new(content: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            thread_id: thread_id.into(),
        }
    }

    /// Create a request that starts a fresh thread with a random id
    pub fn new_thread(content: impl Into<String>) -> Self {
        Self::new(content, Uuid::new_v4().to_string())
    }
}
