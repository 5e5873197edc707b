//! Request, response and event types exchanged with the chat backend.

mod chat;
mod events;
mod scrape;
mod upload;

pub use chat::ChatRequest;
pub use events::ChatEvent;
pub use scrape::{ScrapeRequest, ScrapeResponse};
pub use upload::{UploadFile, UploadResponse, UPLOAD_FIELD};
