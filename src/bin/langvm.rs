//! langvm CLI binary
//!
//! Without a subcommand the interactive UI starts; otherwise one command runs
//! and the process exits.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use langvm_lib::cli::{Cli, CliContext, CommandRunner, Commands, format_cli_error};
use langvm_lib::config::{BridgeMode, Settings};

#[cfg(not(target_env = "msvc"))]
use mimalloc::MiMalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("{}", format_cli_error(&err));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load()?;
    if let Some(socket) = cli.socket {
        settings.socket_path = socket;
    }
    if cli.no_daemon {
        settings.bridge.mode = BridgeMode::Local;
    }

    let command = cli.command.unwrap_or(Commands::Ui { route: None });

    // The full-screen UI owns the terminal, so its logs go to a file
    let log_file = matches!(command, Commands::Ui { .. }).then(|| settings.log_path());
    init_tracing(cli.verbose, log_file.as_deref())?;

    let ctx = CliContext { settings };
    command.execute(&ctx).await
}

fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
