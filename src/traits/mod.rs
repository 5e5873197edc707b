//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP operations used by the chat client (POST, streaming POST, multipart POST)

pub mod http;

pub use http::{ByteStream, FormPart, Headers, HttpClient, HttpError, Response};
