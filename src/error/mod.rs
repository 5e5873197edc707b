//! Error types for the chat client.
//!
//! Errors fall into three groups:
//!
//! | Kind | Type | Effect |
//! |------|------|--------|
//! | Transport | `ApiError::Status`, `ApiError::Transport` | Fails the call |
//! | Malformed event | `sse::DecodeDiagnostic` | Logged and skipped |
//! | Resource release | handled by `Drop` | Never surfaced |
//!
//! Upload and scrape additionally fail with `ApiError::Decode` when a
//! success body is not the expected JSON, and `ApiError::Io` when a file
//! cannot be read.

mod api_error;
mod result;

pub use api_error::ApiError;
pub use result::ApiResult;
