use serde::{Deserialize, Serialize};

/// Request body for the scrape endpoint
///
/// Without a URL the body is `{}` and the backend scrapes its default page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScrapeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ScrapeRequest {
    /// Scrape a specific page
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }
}

/// Response body of the scrape endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScrapeResponse {
    pub status: String,
    pub message: String,
    /// Absent when the page had already been scraped
    #[serde(default)]
    pub chunks_added: Option<u64>,
    #[serde(default)]
    pub source: Option<String>,
}
