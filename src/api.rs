//! Chat backend API client.
//!
//! This module provides the client for the chat backend: streaming chat
//! responses via Server-Sent Events (SSE), multipart file upload and the
//! scrape trigger.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::adapters::ReqwestHttpClient;
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{ChatRequest, ScrapeRequest, ScrapeResponse, UploadFile, UploadResponse};
use crate::sse::{decode_event_stream, DecodeDiagnostic, EventStream};
use crate::traits::{FormPart, Headers, HttpClient, Response};

const CHAT_PATH: &str = "/chat";
const UPLOAD_PATH: &str = "/chat/upload";
const SCRAPE_PATH: &str = "/scrape";

/// Client for the chat backend.
///
/// Cheap to clone; clones share the underlying HTTP client. Each streaming
/// call owns its own decoder, so concurrent streams never share state.
#[derive(Clone)]
pub struct ApiClient {
    /// Base URL for the backend, without a trailing slash
    pub base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the local development backend.
    pub fn new() -> Self {
        Self::with_http_client(ApiConfig::default().base_url(), Arc::new(ReqwestHttpClient::new()))
    }

    /// Create a client from configuration.
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        let http = match config.timeout {
            Some(timeout) => ReqwestHttpClient::with_timeout(timeout)?,
            None => ReqwestHttpClient::new(),
        };
        Ok(Self::with_http_client(config.base_url(), Arc::new(http)))
    }

    /// Create a client over any transport.
    pub fn with_http_client(base_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Stream a chat response.
    ///
    /// Sends a POST request to `/chat` with `{content, thread_id}` and
    /// returns the lazy sequence of decoded events. A non-success status
    /// fails here, before any event is produced.
    pub async fn stream_message(&self, request: &ChatRequest) -> ApiResult<EventStream> {
        self.open_stream(request, None).await
    }

    /// Like [`ApiClient::stream_message`], also reporting every skipped
    /// malformed event on `diagnostics`.
    pub async fn stream_message_with_diagnostics(
        &self,
        request: &ChatRequest,
        diagnostics: UnboundedSender<DecodeDiagnostic>,
    ) -> ApiResult<EventStream> {
        self.open_stream(request, Some(diagnostics)).await
    }

    async fn open_stream(
        &self,
        request: &ChatRequest,
        diagnostics: Option<UnboundedSender<DecodeDiagnostic>>,
    ) -> ApiResult<EventStream> {
        let url = self.url(CHAT_PATH);
        let body = serde_json::to_string(request)?;

        let mut headers = json_headers();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        tracing::info!(
            "Chat request | thread_id={} | content_length={}",
            request.thread_id,
            request.content.len()
        );

        let source = self.http.post_stream(&url, &body, &headers).await.map_err(|e| {
            let err = ApiError::from(e);
            log_failure("chat", &url, &err);
            err
        })?;

        Ok(decode_event_stream(source, diagnostics))
    }

    /// Upload files to `/chat/upload` and return the typed response.
    pub async fn upload_files(&self, files: &[UploadFile]) -> ApiResult<UploadResponse> {
        self.upload_files_as(files).await
    }

    /// Upload files and return the response body as raw JSON.
    pub async fn upload_files_raw(&self, files: &[UploadFile]) -> ApiResult<Value> {
        self.upload_files_as(files).await
    }

    /// Read files from disk, then upload them.
    pub async fn upload_paths<P: AsRef<Path>>(&self, paths: &[P]) -> ApiResult<UploadResponse> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let file = UploadFile::from_path(path).await.map_err(|e| {
                tracing::error!("Error reading {}: {}", path.as_ref().display(), e);
                ApiError::Io(e)
            })?;
            files.push(file);
        }
        self.upload_files(&files).await
    }

    async fn upload_files_as<T: DeserializeOwned>(&self, files: &[UploadFile]) -> ApiResult<T> {
        let url = self.url(UPLOAD_PATH);
        tracing::info!("Uploading {} files", files.len());

        let parts: Vec<FormPart> = files.iter().cloned().map(UploadFile::into_form_part).collect();

        let result: ApiResult<T> = async {
            let response = self.http.post_multipart(&url, parts, &Headers::new()).await?;
            parse_json(check_status(response)?)
        }
        .await;

        result.map_err(|err| {
            log_failure("upload", &url, &err);
            err
        })
    }

    /// Trigger a scrape of the backend's default page.
    pub async fn trigger_scrape(&self) -> ApiResult<ScrapeResponse> {
        self.scrape_as(&ScrapeRequest::default()).await
    }

    /// Trigger a scrape of `url`, or of the default page when `None`.
    pub async fn trigger_scrape_url(&self, url: Option<&str>) -> ApiResult<ScrapeResponse> {
        let request = ScrapeRequest {
            url: url.map(str::to_string),
        };
        self.scrape_as(&request).await
    }

    /// Trigger a scrape and return the response body as raw JSON.
    pub async fn trigger_scrape_raw(&self) -> ApiResult<Value> {
        self.scrape_as(&ScrapeRequest::default()).await
    }

    async fn scrape_as<T: DeserializeOwned>(&self, request: &ScrapeRequest) -> ApiResult<T> {
        let url = self.url(SCRAPE_PATH);
        let body = serde_json::to_string(request)?;
        tracing::info!("Triggering scrape | url={}", request.url.as_deref().unwrap_or("<default>"));

        let result: ApiResult<T> = async {
            let response = self.http.post(&url, &body, &json_headers()).await?;
            parse_json(check_status(response)?)
        }
        .await;

        result.map_err(|err| {
            log_failure("scrape", &url, &err);
            err
        })
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

fn json_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers
}

/// Turn a non-success response into [`ApiError::Status`].
fn check_status(response: Response) -> ApiResult<Response> {
    if response.is_success() {
        return Ok(response);
    }
    let message = response.text().unwrap_or_default();
    Err(ApiError::Status {
        status: response.status,
        message,
    })
}

fn parse_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    Ok(response.json()?)
}

fn log_failure(operation: &str, url: &str, err: &ApiError) {
    tracing::error!(
        "Error in {} | url={} | code={} | error={}",
        operation,
        url,
        err.error_code(),
        err
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::traits::HttpError;
    use bytes::Bytes;
    use futures_util::StreamExt;
    use serde_json::json;

    const BASE: &str = "http://backend.test";

    fn client_with(mock: &MockHttpClient) -> ApiClient {
        ApiClient::with_http_client(BASE, Arc::new(mock.clone()))
    }

    #[test]
    fn test_api_client_default_url() {
        let client = ApiClient::default();
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_with_http_client_trims_slash() {
        let client = ApiClient::with_http_client("http://x/api/", Arc::new(MockHttpClient::new()));
        assert_eq!(client.base_url, "http://x/api");
        assert_eq!(client.url(CHAT_PATH), "http://x/api/chat");
    }

    #[test]
    fn test_from_config_proxied() {
        let config = ApiConfig::new()
            .with_mode(crate::config::DeployMode::Proxied)
            .with_origin("https://chat.example.com");
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url, "https://chat.example.com/api");
    }

    #[tokio::test]
    async fn test_stream_message_sends_request_and_decodes() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://backend.test/chat",
            MockResponse::Stream(vec![
                Bytes::from("data: {\"type\":\"content\",\"text\":\"Hel\"}\r\n\r\ndata: {\"type\":"),
                Bytes::from("\"content\",\"text\":\"lo\"}\r\n\r\n"),
            ]),
        );

        let client = client_with(&mock);
        let events: Vec<Value> = client
            .stream_message(&ChatRequest::new("hi", "t-1"))
            .await
            .unwrap()
            .map(|e| e.unwrap())
            .collect()
            .await;

        assert_eq!(
            events,
            vec![
                json!({"type": "content", "text": "Hel"}),
                json!({"type": "content", "text": "lo"}),
            ]
        );

        let requests = mock.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://backend.test/chat");
        let body: Value = serde_json::from_str(requests[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({"content": "hi", "thread_id": "t-1"}));
        assert_eq!(
            requests[0].headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(
            requests[0].headers.get("Accept"),
            Some(&"text/event-stream".to_string())
        );
    }

    #[tokio::test]
    async fn test_stream_message_error_status_fails_fast() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(
            500,
            Bytes::from("data: {\"a\":1}\n\n"),
        )));

        let result = client_with(&mock)
            .stream_message(&ChatRequest::new("hi", "t-1"))
            .await;

        match result {
            Err(err) => {
                assert_eq!(err.status(), Some(500));
                assert!(err.to_string().contains("500"));
            }
            Ok(_) => panic!("Expected status error"),
        }
    }

    #[tokio::test]
    async fn test_stream_message_with_diagnostics() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Stream(vec![Bytes::from(
            "data: not-json\n\ndata: {\"a\":1}\n\n",
        )]));

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let events: Vec<_> = client_with(&mock)
            .stream_message_with_diagnostics(&ChatRequest::new("hi", "t"), tx)
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(events.len(), 1);
        assert!(matches!(
            rx.recv().await,
            Some(DecodeDiagnostic::MalformedEvent { .. })
        ));
    }

    #[tokio::test]
    async fn test_stream_message_transport_error_mid_stream() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::StreamWithError(
            vec![Bytes::from("data: {\"a\":1}\n\ndata: {\"b\"")],
            HttpError::Io("connection reset".to_string()),
        ));

        let mut events = client_with(&mock)
            .stream_message(&ChatRequest::new("hi", "t"))
            .await
            .unwrap();

        assert_eq!(events.next().await.unwrap().unwrap(), json!({"a": 1}));
        match events.next().await {
            Some(Err(ApiError::Transport(HttpError::Io(message)))) => {
                assert_eq!(message, "connection reset");
            }
            other => panic!("Expected transport error, got {:?}", other),
        }
        assert!(events.next().await.is_none());
        assert!(events.next().await.is_none());
    }

    #[tokio::test]
    async fn test_upload_files_multipart_fields() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(
            201,
            Bytes::from(r#"{"filename":"a.txt, b.csv","chunks_generated":3,"status":"ok"}"#),
        )));

        let files = vec![
            UploadFile::new("a.txt", "alpha"),
            UploadFile::new("b.csv", "x,y\n1,2"),
        ];
        let response = client_with(&mock).upload_files(&files).await.unwrap();
        assert_eq!(response.chunks_generated, 3);

        let requests = mock.get_requests();
        assert_eq!(requests[0].url, "http://backend.test/chat/upload");
        let names: Vec<_> = requests[0].parts.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.csv"]);
        assert!(requests[0].parts.iter().all(|p| p.field_name == "data"));
    }

    #[tokio::test]
    async fn test_upload_zero_files_still_sends() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(200, Bytes::from("{}"))));

        let value = client_with(&mock).upload_files_raw(&[]).await.unwrap();
        assert_eq!(value, json!({}));

        let requests = mock.get_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].parts.is_empty());
    }

    #[tokio::test]
    async fn test_upload_error_status() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(413, Bytes::from("too big"))));

        let err = client_with(&mock)
            .upload_files(&[UploadFile::new("a.txt", "x")])
            .await
            .unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 413);
                assert_eq!(message, "too big");
            }
            other => panic!("Expected Status, got {:?}", other),
        }
        // No retry
        assert_eq!(mock.get_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_network_error() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Error(HttpError::ConnectionFailed(
            "refused".to_string(),
        )));

        let err = client_with(&mock).upload_files(&[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(HttpError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn test_trigger_scrape_sends_empty_object() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(
            201,
            Bytes::from(r#"{"status":"success","message":"done","chunks_added":7,"source":"https://x"}"#),
        )));

        let response = client_with(&mock).trigger_scrape().await.unwrap();
        assert_eq!(response.chunks_added, Some(7));

        let requests = mock.get_requests();
        assert_eq!(requests[0].url, "http://backend.test/scrape");
        assert_eq!(requests[0].body.as_deref(), Some("{}"));
        assert_eq!(
            requests[0].headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
    }

    #[tokio::test]
    async fn test_trigger_scrape_url() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(
            200,
            Bytes::from(r#"{"status":"success","message":"already"}"#),
        )));

        let client = client_with(&mock);
        client
            .trigger_scrape_url(Some("https://pt.wikipedia.org/wiki/Rust"))
            .await
            .unwrap();

        let requests = mock.get_requests();
        let body: Value = serde_json::from_str(requests[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({"url": "https://pt.wikipedia.org/wiki/Rust"}));
    }

    #[tokio::test]
    async fn test_trigger_scrape_invalid_body() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(200, Bytes::from("<html>"))));

        let err = client_with(&mock).trigger_scrape_raw().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_upload_paths_missing_file() {
        let mock = MockHttpClient::new();
        let err = client_with(&mock)
            .upload_paths(&["/definitely/not/here.pdf"])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Io(_)));
        assert!(mock.get_requests().is_empty());
    }
}
