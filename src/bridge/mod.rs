//! Command bridge between the frontend and the backend
//!
//! Every piece of real work (listing, installing, switching versions) is a
//! named command with a JSON parameter object. The frontend never touches the
//! filesystem or the network itself; it only calls [`CommandBridge::invoke`].

mod daemon;
mod local;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use daemon::DaemonBridge;
pub use local::LocalBridge;

use crate::config::{BridgeMode, Settings};
use crate::core::{Language, SearchPayload, suggestion_for_code};
use crate::daemon::protocol::{ListVersionsParams, RpcError, VersionParams, methods};

/// Why a bridge call did not produce a result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The backend could not be reached or hung up
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The backend ran the command and reported a failure
    #[error("{reason}")]
    CommandRejected { code: i32, reason: String },

    /// The configured per-call timeout expired
    #[error("Backend did not answer within {0:?}")]
    Timeout(Duration),

    /// The reply could not be decoded
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl BridgeError {
    /// Get a helpful suggestion for how to fix this error
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Unavailable(_) => Some(
                "Start the daemon with: langvmd\nOr run the backend in-process with: langvm --no-daemon",
            ),
            Self::Timeout(_) => {
                Some("Raise bridge.timeout_secs in the config, or remove it to wait for the backend")
            }
            Self::CommandRejected { code, .. } => suggestion_for_code(*code),
            Self::Protocol(_) => Some("The daemon may be from another langvm release; restart langvmd"),
        }
    }
}

impl From<RpcError> for BridgeError {
    fn from(err: RpcError) -> Self {
        Self::CommandRejected {
            code: err.code,
            reason: err.message,
        }
    }
}

/// Opaque request/response call to the backend
#[async_trait]
pub trait CommandBridge: Send + Sync {
    /// Run `command` with `params` and return its raw result
    async fn invoke(&self, command: &str, params: Value) -> Result<Value, BridgeError>;

    /// Short description for status lines and logs
    fn describe(&self) -> String;

    /// Whether the backend draws its own progress bars on this terminal
    fn draws_progress(&self) -> bool {
        false
    }
}

/// A typed backend command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCommand {
    ListVersions(ListVersionsParams),
    Install(VersionParams),
    Uninstall(VersionParams),
    UseVersion(VersionParams),
    Ping,
}

impl BridgeCommand {
    /// Paged, filtered listing for the version manager page
    #[must_use]
    pub fn list_page(payload: &SearchPayload) -> Self {
        Self::ListVersions(payload.into())
    }

    /// Flat listing for the classic page
    #[must_use]
    pub fn list_all(language: Language) -> Self {
        Self::ListVersions(ListVersionsParams::all(language))
    }

    #[must_use]
    pub fn install(language: Language, version: &str) -> Self {
        Self::Install(VersionParams::new(language, version))
    }

    #[must_use]
    pub fn uninstall(language: Language, version: &str) -> Self {
        Self::Uninstall(VersionParams::new(language, version))
    }

    #[must_use]
    pub fn use_version(language: Language, version: &str) -> Self {
        Self::UseVersion(VersionParams::new(language, version))
    }

    /// Wire command name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ListVersions(_) => methods::LIST_VERSIONS,
            Self::Install(_) => methods::INSTALL,
            Self::Uninstall(_) => methods::UNINSTALL,
            Self::UseVersion(_) => methods::USE_VERSION,
            Self::Ping => methods::PING,
        }
    }

    /// Wire parameter object
    #[must_use]
    pub fn params(&self) -> Value {
        let encoded = match self {
            Self::ListVersions(p) => serde_json::to_value(p),
            Self::Install(p) | Self::Uninstall(p) | Self::UseVersion(p) => serde_json::to_value(p),
            Self::Ping => return Value::Object(serde_json::Map::new()),
        };
        // plain structs of strings and integers always encode
        encoded.unwrap_or(Value::Null)
    }
}

/// Invoke `command` and decode its result as `T`
pub async fn call<T: DeserializeOwned>(
    bridge: &dyn CommandBridge,
    command: &BridgeCommand,
) -> Result<T, BridgeError> {
    let value = bridge.invoke(command.name(), command.params()).await?;
    decode(value)
}

/// Decode a raw command result
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, BridgeError> {
    serde_json::from_value(value).map_err(|e| BridgeError::Protocol(e.to_string()))
}

/// Pick a bridge according to `bridge.mode`
pub async fn connect(settings: &Settings) -> Arc<dyn CommandBridge> {
    let daemon = DaemonBridge::new(settings.socket_path.clone(), settings.bridge_timeout());

    match settings.bridge.mode {
        BridgeMode::Daemon => Arc::new(daemon),
        BridgeMode::Local => Arc::new(LocalBridge::new(settings)),
        BridgeMode::Auto => match daemon.ping().await {
            Ok(pong) => {
                tracing::debug!("Daemon answered: {pong}");
                Arc::new(daemon)
            }
            Err(e) => {
                tracing::debug!("Daemon not reachable ({e}), running backend in-process");
                Arc::new(LocalBridge::new(settings))
            }
        },
    }
}
