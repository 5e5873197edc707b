//! Errors surfaced by the chat API client.

use thiserror::Error;

use crate::traits::HttpError;

/// Error returned by [`crate::api::ApiClient`] operations.
///
/// Transport failures are fatal to the call. Malformed stream events are not
/// errors at all; they are reported as [`crate::sse::DecodeDiagnostic`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Server answered with a non-success status
    #[error("API error: {status}")]
    Status {
        /// Numeric HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Request could not be sent, or the byte stream failed mid-way
    #[error("Transport error: {0}")]
    Transport(HttpError),

    /// A success response body was not the expected JSON
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A file selected for upload could not be read
    #[error("Failed to read upload file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => ApiError::Status { status, message },
            other => ApiError::Transport(other),
        }
    }
}

impl ApiError {
    /// HTTP status code, when the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error is likely transient.
    ///
    /// The client never retries on its own; this only informs callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => *status >= 500 || *status == 429 || *status == 408,
            ApiError::Transport(e) => matches!(
                e,
                HttpError::ConnectionFailed(_) | HttpError::Timeout(_) | HttpError::Io(_)
            ),
            ApiError::Decode(_) | ApiError::Io(_) => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { status, .. } => match *status {
                400 | 422 => "The request was rejected by the server.".to_string(),
                404 => "The requested endpoint was not found.".to_string(),
                413 => "The upload is too large.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => "The server is experiencing issues. Please try again later.".to_string(),
                _ => format!("The server returned an error (HTTP {}).", status),
            },
            ApiError::Transport(HttpError::Timeout(_)) => {
                "The request timed out. The server may be slow or unreachable.".to_string()
            }
            ApiError::Transport(HttpError::ConnectionFailed(_)) => {
                "Unable to connect to the server.".to_string()
            }
            ApiError::Transport(e) => format!("Network error: {}", e),
            ApiError::Decode(_) => "Received an invalid response from the server.".to_string(),
            ApiError::Io(e) => format!("Could not read file: {}", e),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Status { .. } => "E_API_STATUS",
            ApiError::Transport(_) => "E_API_TRANSPORT",
            ApiError::Decode(_) => "E_API_DECODE",
            ApiError::Io(_) => "E_API_IO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_carries_code() {
        let err = ApiError::Status {
            status: 503,
            message: "down".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503");
        assert_eq!(err.status(), Some(503));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_from_http_server_error() {
        let err: ApiError = HttpError::ServerError {
            status: 404,
            message: "nope".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_from_http_transport_error() {
        let err: ApiError = HttpError::ConnectionFailed("refused".to_string()).into();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.status(), None);
        assert!(err.is_retryable());
        assert_eq!(err.user_message(), "Unable to connect to the server.");
    }

    #[test]
    fn test_decode_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ApiError = json_err.into();
        assert_eq!(err.error_code(), "E_API_DECODE");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_user_messages() {
        let err = ApiError::Status {
            status: 500,
            message: String::new(),
        };
        assert!(err.user_message().contains("server"));

        let err = ApiError::Status {
            status: 418,
            message: String::new(),
        };
        assert!(err.user_message().contains("418"));

        let err = ApiError::Transport(HttpError::Timeout("30s".to_string()));
        assert!(err.user_message().contains("timed out"));
    }
}
