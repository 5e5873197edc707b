//! Result type alias for client operations.

use super::api_error::ApiError;

/// Type alias for Results using ApiError.
///
/// # Example
///
/// ```ignore
/// use ragchat::error::ApiResult;
///
/// async fn scrape(client: &ApiClient) -> ApiResult<ScrapeResponse> {
///     client.trigger_scrape().await
/// }
/// ```
pub type ApiResult<T> = Result<T, ApiError>;
