//! Handlers for the chat, upload and scrape subcommands.
//!
//! Answer text goes to stdout as it arrives; everything else (reasoning,
//! tool activity, diagnostics) goes to stderr so the answer can be piped.

use color_eyre::Result;
use futures_util::StreamExt;
use serde_json::Value;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{ChatEvent, ChatRequest};
use crate::notifications::{NotificationCenter, NotificationKind, DEFAULT_DURATION};

/// Writes decoded chat events to an answer sink and a status sink.
pub struct EventPrinter<O: Write, E: Write> {
    out: O,
    err: E,
    /// Answer text received so far
    answer: String,
    in_thinking: bool,
}

impl<O: Write, E: Write> EventPrinter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            answer: String::new(),
            in_thinking: false,
        }
    }

    /// Print one event. Backend-reported errors are also posted to
    /// `notifications`. Unknown event types are logged and skipped.
    pub fn print(&mut self, value: &Value, notifications: &NotificationCenter) -> io::Result<()> {
        let Some(event) = ChatEvent::from_value(value) else {
            tracing::debug!("Skipping unrecognized event: {}", value);
            return Ok(());
        };

        if self.in_thinking && !matches!(event, ChatEvent::Thinking { .. }) {
            writeln!(self.err)?;
            self.in_thinking = false;
        }

        match event {
            ChatEvent::Thinking { text } => {
                if !self.in_thinking {
                    write!(self.err, "[thinking] ")?;
                    self.in_thinking = true;
                }
                write!(self.err, "{}", text)?;
                self.err.flush()?;
            }
            ChatEvent::Content { text } => {
                self.answer.push_str(&text);
                write!(self.out, "{}", text)?;
                self.out.flush()?;
            }
            ChatEvent::ToolCall { tool, input } => {
                writeln!(self.err, "[tool] {} {}", tool, input)?;
            }
            ChatEvent::ToolResponse { tool, output } => {
                writeln!(self.err, "[tool] {} returned {} chars", tool, output.chars().count())?;
            }
            ChatEvent::Error { text } => {
                writeln!(self.err, "[error] {}", text)?;
                notifications.add(text, NotificationKind::Error, DEFAULT_DURATION);
            }
        }
        Ok(())
    }

    /// Terminate the output and return the accumulated answer.
    pub fn finish(mut self) -> io::Result<String> {
        if self.in_thinking {
            writeln!(self.err)?;
        }
        if !self.answer.is_empty() && !self.answer.ends_with('\n') {
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(self.answer)
    }
}

fn report(notifications: &NotificationCenter, err: ApiError) -> color_eyre::Report {
    notifications.notify_error(&err);
    err.into()
}

/// Send a message and print the streamed reply.
pub async fn handle_chat_command(
    client: &ApiClient,
    notifications: &NotificationCenter,
    thread_id: Option<String>,
    content: String,
) -> Result<()> {
    let request = match thread_id {
        Some(id) => ChatRequest::new(content, id),
        None => ChatRequest::new_thread(content),
    };

    let (diag_tx, mut diag_rx) = mpsc::unbounded_channel();
    let mut events = client
        .stream_message_with_diagnostics(&request, diag_tx)
        .await
        .map_err(|e| report(notifications, e))?;

    let mut printer = EventPrinter::new(io::stdout(), io::stderr());
    let mut failure = None;

    while let Some(item) = events.next().await {
        match item {
            Ok(value) => printer.print(&value, notifications)?,
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }
    drop(events);

    let answer = printer.finish()?;
    tracing::debug!("Thread {} | answer_length={}", request.thread_id, answer.len());

    let mut skipped = 0;
    while diag_rx.try_recv().is_ok() {
        skipped += 1;
    }
    if skipped > 0 {
        notifications.add(
            format!("Skipped {} malformed events", skipped),
            NotificationKind::Warning,
            DEFAULT_DURATION,
        );
    }

    match failure {
        Some(err) => Err(report(notifications, err)),
        None => Ok(()),
    }
}

/// Upload the given files.
pub async fn handle_upload_command(
    client: &ApiClient,
    notifications: &NotificationCenter,
    paths: Vec<PathBuf>,
) -> Result<()> {
    let response = client
        .upload_paths(&paths)
        .await
        .map_err(|e| report(notifications, e))?;

    println!(
        "{}: {} ({} chunks)",
        response.status, response.filename, response.chunks_generated
    );
    notifications.success(format!("Uploaded {}", response.filename));
    Ok(())
}

/// Ask the backend to scrape a page into the knowledge base.
pub async fn handle_scrape_command(
    client: &ApiClient,
    notifications: &NotificationCenter,
    url: Option<String>,
) -> Result<()> {
    let response = client
        .trigger_scrape_url(url.as_deref())
        .await
        .map_err(|e| report(notifications, e))?;

    match response.chunks_added {
        Some(chunks) => println!("{}: {} ({} chunks)", response.status, response.message, chunks),
        None => println!("{}: {}", response.status, response.message),
    }
    notifications.success(response.message);
    Ok(())
}
