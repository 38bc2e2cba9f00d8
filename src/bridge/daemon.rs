//! Bridge to `langvmd` over its Unix socket
//!
//! One framed connection per call; the daemon serializes mutations itself.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::sink::SinkExt;
use futures::stream::StreamExt;
use serde_json::Value;
use tokio::net::UnixStream;
use tokio_util::bytes::Bytes;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use super::{BridgeCommand, BridgeError, CommandBridge, call};
use crate::daemon::protocol::{Request, Response};

/// IPC client for daemon communication
pub struct DaemonBridge {
    socket_path: PathBuf,
    timeout: Option<Duration>,
    request_id: AtomicU64,
}

impl DaemonBridge {
    #[must_use]
    pub const fn new(socket_path: PathBuf, timeout: Option<Duration>) -> Self {
        Self {
            socket_path,
            timeout,
            request_id: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub const fn socket_path(&self) -> &PathBuf {
        &self.socket_path
    }

    /// Ping the daemon
    pub async fn ping(&self) -> Result<String, BridgeError> {
        call(self, &BridgeCommand::Ping).await
    }

    async fn exchange(&self, request: Request) -> Result<Value, BridgeError> {
        let id = request.id;

        tracing::debug!("Connecting to daemon at {}", self.socket_path.display());
        let stream = UnixStream::connect(&self.socket_path).await.map_err(|e| {
            BridgeError::Unavailable(format!(
                "cannot connect to {}: {e}",
                self.socket_path.display()
            ))
        })?;
        let mut framed = Framed::new(stream, LengthDelimitedCodec::new());

        let request_bytes =
            serde_json::to_vec(&request).map_err(|e| BridgeError::Protocol(e.to_string()))?;
        framed
            .send(Bytes::from(request_bytes))
            .await
            .map_err(|e| BridgeError::Unavailable(e.to_string()))?;

        let response_bytes = framed
            .next()
            .await
            .ok_or_else(|| BridgeError::Unavailable("daemon disconnected".to_string()))?
            .map_err(|e| BridgeError::Unavailable(e.to_string()))?;

        let response: Response = serde_json::from_slice(&response_bytes)
            .map_err(|e| BridgeError::Protocol(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(error.into());
        }
        if response.id != id {
            return Err(BridgeError::Protocol(format!(
                "request ID mismatch: sent {id}, got {}",
                response.id
            )));
        }

        Ok(response.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl CommandBridge for DaemonBridge {
    async fn invoke(&self, command: &str, params: Value) -> Result<Value, BridgeError> {
        let request = Request {
            id: self.request_id.fetch_add(1, Ordering::SeqCst),
            method: command.to_string(),
            params,
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(request))
                .await
                .map_err(|_| BridgeError::Timeout(limit))?,
            None => self.exchange(request).await,
        }
    }

    fn describe(&self) -> String {
        format!("daemon {}", self.socket_path.display())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_socket_is_unavailable() {
        let temp = tempfile::tempdir().unwrap();
        let bridge = DaemonBridge::new(temp.path().join("nobody.sock"), None);
        let err = bridge.ping().await.unwrap_err();
        assert!(matches!(err, BridgeError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_silent_daemon_times_out() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("silent.sock");
        let listener = tokio::net::UnixListener::bind(&path).unwrap();
        // accept and hold the connection without answering
        let holder = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(stream);
        });

        let limit = Duration::from_millis(50);
        let bridge = DaemonBridge::new(path, Some(limit));
        assert_eq!(bridge.ping().await.unwrap_err(), BridgeError::Timeout(limit));
        holder.abort();
    }
}
