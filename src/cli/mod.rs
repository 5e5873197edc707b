//! CLI module for ragchat.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - The chat, upload and scrape commands
//!
//! # Usage
//!
//! ```ignore
//! use ragchat::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command, &client, &notifications).await?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use commands::{handle_chat_command, handle_scrape_command, handle_upload_command, EventPrinter};
pub use version::{handle_version_command, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::api::ApiClient;
use crate::notifications::NotificationCenter;

/// Run a parsed CLI command.
///
/// # Note
///
/// The `Version` command never returns as it calls `std::process::exit(0)`.
pub async fn run_cli_command(
    command: CliCommand,
    client: &ApiClient,
    notifications: &NotificationCenter,
) -> Result<()> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Invalid(message) => Err(eyre!("{}\n\n{}", message, USAGE)),
        CliCommand::Chat { thread_id, content } => {
            handle_chat_command(client, notifications, thread_id, content).await
        }
        CliCommand::Upload { paths } => handle_upload_command(client, notifications, paths).await,
        CliCommand::Scrape { url } => handle_scrape_command(client, notifications, url).await,
    }
}
