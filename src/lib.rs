//! ragchat - client for a retrieval-augmented chat backend
//!
//! Streams chat replies over Server-Sent Events, uploads documents and
//! triggers scrapes. The library is also used by the integration tests.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod notifications;
pub mod sse;
pub mod traits;
