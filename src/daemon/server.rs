//! Daemon server implementation with Unix socket IPC
//!
//! Uses `LengthDelimitedCodec` with one JSON document per frame.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::sink::SinkExt;
use futures::stream::StreamExt;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast;
use tokio_util::bytes::Bytes;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use super::handlers::{DaemonState, handle_request};
use super::protocol::{Request, Response, error_codes};

/// Bind the socket at `path`, replacing a stale one, readable by the owner only
pub fn bind(path: &Path) -> Result<UnixListener> {
    if path.exists() {
        tracing::debug!("Removing existing socket at {}", path.display());
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove stale socket {}", path.display()))?;
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let listener = UnixListener::bind(path)
        .with_context(|| format!("Failed to bind {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }

    Ok(listener)
}

/// Run the daemon server until Ctrl-C
pub async fn run(listener: UnixListener, state: Arc<DaemonState>) -> Result<()> {
    serve(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown signal received, cleaning up...");
    })
    .await
}

/// Accept clients until `shutdown` completes
pub async fn serve(
    listener: UnixListener,
    state: Arc<DaemonState>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    tokio::pin!(shutdown);

    tracing::info!("Daemon ready");

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, _addr) = result?;
                let state = Arc::clone(&state);
                let mut shutdown_rx = shutdown_tx.subscribe();

                tokio::spawn(async move {
                    tokio::select! {
                        result = handle_client(stream, state) => {
                            if let Err(e) = result {
                                tracing::error!("Client error: {}", e);
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            tracing::debug!("Client connection closed due to shutdown");
                        }
                    }
                });
            }

            () = &mut shutdown => {
                let _ = shutdown_tx.send(());
                break;
            }
        }
    }

    Ok(())
}

/// Handle a single client connection
async fn handle_client(stream: UnixStream, state: Arc<DaemonState>) -> Result<()> {
    let mut framed = Framed::new(stream, LengthDelimitedCodec::new());

    tracing::debug!("New client connected");

    while let Some(frame) = framed.next().await {
        let bytes = frame?;

        let response = match serde_json::from_slice::<Request>(&bytes) {
            Ok(request) => handle_request(Arc::clone(&state), request).await,
            Err(e) => Response::error(0, error_codes::PARSE_ERROR, format!("Parse error: {e}")),
        };

        let response_bytes = serde_json::to_vec(&response)?;
        framed.send(Bytes::from(response_bytes)).await?;
    }

    tracing::debug!("Client disconnected");
    Ok(())
}
