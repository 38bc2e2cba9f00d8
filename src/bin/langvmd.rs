//! langvmd - langvm backend daemon
//!
//! Serves the command bridge over a Unix socket.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use langvm_lib::config::Settings;
use langvm_lib::daemon::handlers::DaemonState;
use langvm_lib::daemon::server;

#[cfg(not(target_env = "msvc"))]
use mimalloc::MiMalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// langvmd - background service for langvm
#[derive(Parser, Debug)]
#[command(name = "langvmd")]
#[command(version)]
#[command(about = "langvm daemon: lists, installs and switches runtime versions")]
struct Args {
    /// Socket path (default: $`XDG_RUNTIME_DIR/langvm.sock`)
    #[arg(short, long)]
    socket: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .init();

    let mut settings = Settings::load()?;
    if let Some(socket) = args.socket {
        settings.socket_path = socket;
    }
    let socket_path = settings.socket_path.clone();

    tracing::info!("Starting langvmd v{}", env!("CARGO_PKG_VERSION"));

    let listener = server::bind(&socket_path)?;
    tracing::info!("Listening on {}", socket_path.display());

    let state = Arc::new(DaemonState::new(&settings));
    let result = server::run(listener, state).await;

    if socket_path.exists() {
        let _ = std::fs::remove_file(&socket_path);
    }

    result
}
