//! Request handlers for the daemon
//!
//! `dispatch` is shared by the socket server and the in-process bridge.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use super::protocol::{
    ListVersionsParams, Request, Response, RpcError, VersionParams, error_codes, methods,
};
use crate::config::Settings;
use crate::core::{Language, ListVersionsReply, SearchPayload, validation::validate_version};
use crate::runtimes::{LanguageManager, common::normalize_version};

/// Daemon state shared across handlers
pub struct DaemonState {
    pub manager: LanguageManager,
    /// Held for the duration of install/uninstall/use
    mutations: Mutex<()>,
}

impl DaemonState {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self::with_manager(LanguageManager::new(settings))
    }

    #[must_use]
    pub fn with_manager(manager: LanguageManager) -> Self {
        Self {
            manager,
            mutations: Mutex::new(()),
        }
    }
}

/// Handle an incoming request
pub async fn handle_request(state: Arc<DaemonState>, request: Request) -> Response {
    let Request { id, method, params } = request;
    tracing::debug!("request {id}: {method} {params}");

    match dispatch(&state, &method, params).await {
        Ok(Value::Null) => Response {
            id,
            result: None,
            error: None,
        },
        Ok(value) => Response {
            id,
            result: Some(value),
            error: None,
        },
        Err(err) => {
            tracing::warn!("request {id} ({method}) failed: {}", err.message);
            Response {
                id,
                result: None,
                error: Some(err),
            }
        }
    }
}

/// Run one named command against the backend state
pub async fn dispatch(state: &DaemonState, method: &str, params: Value) -> Result<Value, RpcError> {
    match method {
        methods::LIST_VERSIONS => handle_list_versions(state, parse_params(params)?).await,
        methods::INSTALL => {
            let (language, version) = version_target(parse_params(params)?)?;
            let _guard = state.mutations.lock().await;
            tracing::info!("Installing {language} {version}");
            state.manager.install(language, &version).await?;
            Ok(Value::Null)
        }
        methods::UNINSTALL => {
            let (language, version) = version_target(parse_params(params)?)?;
            let _guard = state.mutations.lock().await;
            tracing::info!("Uninstalling {language} {version}");
            state.manager.uninstall(language, &version).await?;
            Ok(Value::Null)
        }
        methods::USE_VERSION => {
            let (language, version) = version_target(parse_params(params)?)?;
            let _guard = state.mutations.lock().await;
            tracing::info!("Switching {language} to {version}");
            state.manager.use_version(language, &version).await?;
            Ok(Value::Null)
        }
        methods::PING => Ok(Value::String(format!(
            "pong {}",
            env!("CARGO_PKG_VERSION")
        ))),
        other => Err(RpcError {
            code: error_codes::METHOD_NOT_FOUND,
            message: format!("Unknown command: {other}"),
        }),
    }
}

async fn handle_list_versions(
    state: &DaemonState,
    params: ListVersionsParams,
) -> Result<Value, RpcError> {
    let language: Language = params.language.parse()?;

    let reply = if params.is_paged() {
        let result = state
            .manager
            .list_versions(
                language,
                params.page.unwrap_or(0),
                params.page_size.unwrap_or(SearchPayload::DEFAULT_PAGE_SIZE),
                params.key_word.as_deref(),
            )
            .await?;
        ListVersionsReply::Page(result)
    } else {
        ListVersionsReply::Flat(state.manager.list_all(language).await?)
    };

    serde_json::to_value(reply).map_err(|e| RpcError {
        code: error_codes::INTERNAL_ERROR,
        message: e.to_string(),
    })
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, RpcError> {
    serde_json::from_value(params).map_err(|e| RpcError {
        code: error_codes::INVALID_PARAMS,
        message: format!("Invalid params: {e}"),
    })
}

/// Parse the language and clean up the version before anything touches disk
fn version_target(params: VersionParams) -> Result<(Language, String), RpcError> {
    let language: Language = params.language.parse()?;
    let version = normalize_version(&params.version);
    validate_version(&version)?;
    Ok((language, version))
}
