use ragchat::api::ApiClient;
use ragchat::cli::{handle_version_command, parse_args, run_cli_command, CliCommand};
use ragchat::config::ApiConfig;
use ragchat::notifications::{NotificationCenter, NotificationKind};

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

/// Log filter used when RUST_LOG is unset.
const DEFAULT_LOG_FILTER: &str = "ragchat=info";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // stdout carries the answer text, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print whatever notifications are still queued. Returns true if any of
/// them was an error.
fn flush_notifications(notifications: &NotificationCenter) -> bool {
    let mut reported_error = false;
    for notification in notifications.list() {
        eprintln!("[{}] {}", notification.kind.as_str(), notification.message);
        reported_error |= notification.kind == NotificationKind::Error;
        notifications.remove(notification.id);
    }
    reported_error
}

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Handle --version before any initialization
    if command == CliCommand::Version {
        handle_version_command();
    }

    color_eyre::install()?;
    init_tracing();

    let config = ApiConfig::from_env();
    tracing::debug!("Using backend {}", config.base_url());

    let runtime = tokio::runtime::Runtime::new()?;
    let notifications = NotificationCenter::new();

    let result = runtime.block_on(async {
        let client = ApiClient::from_config(&config)?;
        run_cli_command(command, &client, &notifications).await
    });

    let reported_error = flush_notifications(&notifications);

    if let Err(e) = result {
        if reported_error {
            tracing::debug!("Command failed: {:?}", e);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
    Ok(())
}
