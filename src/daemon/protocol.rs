//! IPC Protocol Types
//!
//! JSON-RPC style protocol between the frontend bridge and the backend.
//! Each length-delimited frame carries one JSON object.

use serde::{Deserialize, Serialize};

use crate::core::{Language, LvmError, SearchPayload};

/// Request ID type
pub type RequestId = u64;

/// IPC Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Unique request ID for correlation
    pub id: RequestId,
    /// Command name
    pub method: String,
    /// Parameters (JSON value)
    #[serde(default)]
    pub params: serde_json::Value,
}

/// IPC Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Request ID this responds to
    pub id: RequestId,
    /// Result if successful (absent for commands that return nothing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error if failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// RPC Error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

impl Response {
    /// Create a successful response
    pub fn success<T: Serialize>(id: RequestId, result: T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                id,
                result: Some(value),
                error: None,
            },
            Err(e) => Self::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
        }
    }

    /// Create an error response
    pub fn error(id: RequestId, code: i32, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

impl From<LvmError> for RpcError {
    fn from(err: LvmError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Command names understood by the backend
pub mod methods {
    pub const LIST_VERSIONS: &str = "list_versions";
    pub const INSTALL: &str = "install";
    pub const UNINSTALL: &str = "uninstall";
    pub const USE_VERSION: &str = "use_version";
    pub const PING: &str = "ping";
}

// Standard error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const VERSION_NOT_FOUND: i32 = -1001;
    pub const INSTALL_FAILED: i32 = -1002;
    pub const NOT_INSTALLED: i32 = -1003;
    pub const UNSUPPORTED_LANGUAGE: i32 = -1004;
    pub const NETWORK_ERROR: i32 = -1005;
}

/// `list_versions` parameters
///
/// Without `page` and `pageSize` the backend answers with a bare list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVersionsParams {
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_word: Option<String>,
}

impl ListVersionsParams {
    /// Unpaged query for every version of `language`
    #[must_use]
    pub fn all(language: Language) -> Self {
        Self {
            language: language.to_string(),
            page: None,
            page_size: None,
            key_word: None,
        }
    }

    #[must_use]
    pub const fn is_paged(&self) -> bool {
        self.page.is_some() || self.page_size.is_some()
    }
}

impl From<&SearchPayload> for ListVersionsParams {
    fn from(payload: &SearchPayload) -> Self {
        Self {
            language: payload.language.to_string(),
            page: Some(payload.page),
            page_size: Some(payload.page_size),
            key_word: Some(payload.key_word.clone()),
        }
    }
}

/// `install` / `uninstall` / `use_version` parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionParams {
    pub language: String,
    pub version: String,
}

impl VersionParams {
    #[must_use]
    pub fn new(language: Language, version: impl Into<String>) -> Self {
        Self {
            language: language.to_string(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_result_is_omitted() {
        let response = Response::success(7, ());
        let text = serde_json::to_string(&response).unwrap();
        let back: Response = serde_json::from_str(&text).unwrap();
        assert_eq!(back.id, 7);
        assert!(back.result.is_none());
        assert!(back.error.is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let response = Response::error(3, error_codes::NOT_INSTALLED, "nope");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"id": 3, "error": {"code": -1003, "message": "nope"}})
        );
    }

    #[test]
    fn test_list_params_from_payload() {
        let mut payload = SearchPayload::new(Language::Python);
        payload.key_word = "3.12".into();
        let params = ListVersionsParams::from(&payload);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"language": "python", "page": 0, "pageSize": 10, "keyWord": "3.12"})
        );
        assert!(params.is_paged());
    }

    #[test]
    fn test_unpaged_params_only_carry_language() {
        let params = ListVersionsParams::all(Language::Python);
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({"language": "python"}));
        assert!(!params.is_paged());
    }

    #[test]
    fn test_request_params_default_to_null() {
        let request: Request = serde_json::from_str(r#"{"id":1,"method":"ping"}"#).unwrap();
        assert!(request.params.is_null());
    }
}
