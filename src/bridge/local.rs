//! In-process bridge, used with `--no-daemon` or when no daemon answers

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{BridgeError, CommandBridge};
use crate::config::Settings;
use crate::daemon::handlers::{DaemonState, dispatch};

pub struct LocalBridge {
    state: Arc<DaemonState>,
}

impl LocalBridge {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self::with_state(Arc::new(DaemonState::new(settings)))
    }

    #[must_use]
    pub const fn with_state(state: Arc<DaemonState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl CommandBridge for LocalBridge {
    async fn invoke(&self, command: &str, params: Value) -> Result<Value, BridgeError> {
        tracing::debug!("local {command} {params}");
        dispatch(&self.state, command, params)
            .await
            .map_err(BridgeError::from)
    }

    fn describe(&self) -> String {
        "in-process".to_string()
    }

    fn draws_progress(&self) -> bool {
        crate::cli::style::progress_enabled()
    }
}
