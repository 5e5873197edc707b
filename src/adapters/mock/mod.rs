//! Test doubles for the trait abstractions.
//!
//! - [`MockHttpClient`] - Configurable HTTP responses and request recording

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
