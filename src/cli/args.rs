//! Command-line argument parsing for the ragchat CLI.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use std::path::PathBuf;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Send a message and stream the reply
    Chat {
        /// Existing thread; a new one is started when absent
        thread_id: Option<String>,
        content: String,
    },
    /// Upload files into the knowledge base
    Upload { paths: Vec<PathBuf> },
    /// Scrape a page (or the backend's default page) into the knowledge base
    Scrape { url: Option<String> },
    /// Arguments could not be parsed
    Invalid(String),
}

/// Usage text printed by `--help`.
pub const USAGE: &str = "\
Usage:
  ragchat chat [--thread <id>] <message...>
  ragchat upload <file>...
  ragchat scrape [url]
  ragchat --version | --help

Environment:
  RAGCHAT_API_URL       explicit backend base URL
  RAGCHAT_MODE          local (default) or proxied
  RAGCHAT_ORIGIN        origin used in proxied mode
  RAGCHAT_TIMEOUT_SECS  request timeout
  RUST_LOG              log filter (default: ragchat=info)";

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use ragchat::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["ragchat".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    if args.iter().any(|a| a == "--version" || a == "-V") {
        return CliCommand::Version;
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return CliCommand::Help;
    }

    let Some((subcommand, rest)) = args.split_first() else {
        return CliCommand::Help;
    };

    match subcommand.as_str() {
        "chat" => parse_chat(rest),
        "upload" => CliCommand::Upload {
            paths: rest.iter().map(PathBuf::from).collect(),
        },
        "scrape" => match rest {
            [] => CliCommand::Scrape { url: None },
            [url] => CliCommand::Scrape {
                url: Some(url.clone()),
            },
            _ => CliCommand::Invalid("scrape takes at most one URL".to_string()),
        },
        other => CliCommand::Invalid(format!("unknown command: {}", other)),
    }
}

fn parse_chat(rest: &[String]) -> CliCommand {
    let mut thread_id = None;
    let mut words = Vec::new();
    let mut iter = rest.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--thread" | "-t" => match iter.next() {
                Some(id) => thread_id = Some(id.clone()),
                None => return CliCommand::Invalid("--thread needs a value".to_string()),
            },
            _ => words.push(arg.as_str()),
        }
    }

    let content = words.join(" ");
    if content.trim().is_empty() {
        return CliCommand::Invalid("chat needs a message".to_string());
    }

    CliCommand::Chat { thread_id, content }
}
