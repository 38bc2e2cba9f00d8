//! Error types for langvm with helpful suggestions

use thiserror::Error;

use crate::daemon::protocol::error_codes;

/// Convenience Result type for backend operations
pub type Result<T> = std::result::Result<T, LvmError>;

#[derive(Error, Debug)]
pub enum LvmError {
    #[error("Version not found: {language} {version}")]
    VersionNotFound { language: String, version: String },

    #[error("{language} {version} is not installed")]
    NotInstalled { language: String, version: String },

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("Install failed: {0}")]
    InstallFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Other(String),
}

impl LvmError {
    /// Wire error code reported to bridge clients
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::VersionNotFound { .. } => error_codes::VERSION_NOT_FOUND,
            Self::NotInstalled { .. } => error_codes::NOT_INSTALLED,
            Self::UnsupportedLanguage(_) => error_codes::UNSUPPORTED_LANGUAGE,
            Self::InvalidVersion { .. } => error_codes::INVALID_PARAMS,
            Self::InstallFailed(_) => error_codes::INSTALL_FAILED,
            Self::NetworkError(_) => error_codes::NETWORK_ERROR,
            Self::IoError(_) | Self::ConfigError(_) | Self::Other(_) => {
                error_codes::INTERNAL_ERROR
            }
        }
    }

    /// Get a helpful suggestion for how to fix this error
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidVersion { .. } => Some("Versions look like 3.12.1"),
            Self::ConfigError(_) => Some(
                "Check ~/.config/langvm/config.toml for syntax errors.\nPrint the effective settings with: langvm config",
            ),
            other => suggestion_for_code(other.code()),
        }
    }
}

/// Suggestion for an error reported by the backend as a wire code
#[must_use]
pub const fn suggestion_for_code(code: i32) -> Option<&'static str> {
    match code {
        error_codes::VERSION_NOT_FOUND => {
            Some("Try: langvm list <language> --search <prefix> to see available versions")
        }
        error_codes::NOT_INSTALLED => Some("Install it first with: langvm install <language> <version>"),
        error_codes::UNSUPPORTED_LANGUAGE => Some("Supported languages: python"),
        error_codes::NETWORK_ERROR => Some(
            "Check your internet connection and try again.\nIf behind a proxy, set HTTP_PROXY/HTTPS_PROXY",
        ),
        _ => None,
    }
}

impl From<anyhow::Error> for LvmError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<Self>() {
            Ok(inner) => inner,
            Err(err) => Self::Other(format!("{err:#}")),
        }
    }
}

/// Format an error with its suggestion for display
pub fn format_error_with_suggestion(err: &LvmError) -> String {
    let mut msg = format!("Error: {err}");
    if let Some(suggestion) = err.suggestion() {
        msg.push_str("\n\n💡 ");
        msg.push_str(suggestion);
    }
    msg
}
