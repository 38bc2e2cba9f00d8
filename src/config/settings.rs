//! langvm settings and configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::core::{Language, SearchPayload, paths};

/// langvm configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of all installations (`<base_dir>/<language>/<version>`)
    pub base_dir: PathBuf,

    /// Daemon socket path
    pub socket_path: PathBuf,

    /// How the frontend reaches the backend
    pub bridge: BridgeSettings,

    /// Frontend defaults
    pub frontend: FrontendSettings,

    /// Backend caches
    pub cache: CacheSettings,

    /// Python download sources
    pub python: PythonSettings,
}

/// Command bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Which backend the frontend talks to
    pub mode: BridgeMode,
    /// Per-call timeout; unset means wait for as long as the backend takes
    pub timeout_secs: Option<u64>,
}

/// Bridge selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BridgeMode {
    /// Use the daemon when its socket answers, otherwise run in-process
    #[default]
    Auto,
    /// Always use the daemon
    Daemon,
    /// Always run the backend in-process
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendSettings {
    /// Rows per page on the version manager page
    pub page_size: usize,
    /// Route mounted when the UI starts
    pub start_route: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// How long the remote list of available versions is reused
    pub available_ttl_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonSettings {
    /// python.org FTP index used to discover versions
    pub index_url: String,
    /// python-build-standalone GitHub releases API used for prebuilt archives
    pub releases_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: paths::base_dir(),
            socket_path: paths::socket_path(),
            bridge: BridgeSettings::default(),
            frontend: FrontendSettings::default(),
            cache: CacheSettings::default(),
            python: PythonSettings::default(),
        }
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            mode: BridgeMode::Auto,
            timeout_secs: None,
        }
    }
}

impl Default for FrontendSettings {
    fn default() -> Self {
        Self {
            page_size: SearchPayload::DEFAULT_PAGE_SIZE,
            start_route: "/".to_string(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            available_ttl_secs: 600,
        }
    }
}

impl Default for PythonSettings {
    fn default() -> Self {
        Self {
            index_url: "https://www.python.org/ftp/python/".to_string(),
            releases_url:
                "https://api.github.com/repos/astral-sh/python-build-standalone/releases"
                    .to_string(),
        }
    }
}

impl Settings {
    /// Load settings from config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::from_toml(&content)
                .with_context(|| format!("Invalid config file {}", config_path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Parse settings from TOML text; missing keys take their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut settings: Self = toml::from_str(content)?;
        settings.frontend.page_size = settings.frontend.page_size.max(1);
        Ok(settings)
    }

    /// Save settings to config file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the config file path
    #[must_use]
    pub fn config_path() -> PathBuf {
        paths::config_dir().join("config.toml")
    }

    /// Directory holding every installed version of `language`
    #[must_use]
    pub fn language_dir(&self, language: Language) -> PathBuf {
        self.base_dir.join(language.as_str())
    }

    /// Directory for downloaded archives
    #[must_use]
    pub fn downloads_dir(&self) -> PathBuf {
        self.base_dir.join("downloads")
    }

    /// Log file used by the interactive UI
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.base_dir.join("langvm.log")
    }

    #[must_use]
    pub fn bridge_timeout(&self) -> Option<Duration> {
        self.bridge.timeout_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub fn available_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.available_ttl_secs)
    }
}
