//! Carryover - carry chat context from one assistant page into another.
//!
//! Main entry point for the Carryover CLI.

mod cli;
mod commands;

use std::path::PathBuf;

use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;

/// Get the .carryover directory path.
fn carryover_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".carryover"))
        .unwrap_or_else(|| PathBuf::from(".carryover"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.carryover/logs/ with daily rotation. The
/// console layer writes to stderr so command output stays parseable.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = carryover_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("carryover")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the background writer alive for the whole run.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = commands::load_config(&cli.config)?;
    commands::run(cli.command, config).await
}
