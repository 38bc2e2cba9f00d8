//! Read-only pages: effective settings and unknown routes

use crate::cli::style;
use crate::config::Settings;

pub struct SettingsPage {
    settings: Settings,
}

impl SettingsPage {
    #[must_use]
    pub const fn new(settings: Settings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings as TOML, or the serialization error
    #[must_use]
    pub fn body(&self) -> String {
        self.settings
            .to_toml()
            .unwrap_or_else(|e| format!("cannot display settings: {e}"))
    }

    #[must_use]
    pub fn view(&self) -> String {
        format!(
            "{}\n{}\n{}",
            style::header("Settings"),
            style::dim(&Settings::config_path().display().to_string()),
            self.body()
        )
    }
}

pub struct NotFoundPage {
    path: String,
}

impl NotFoundPage {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn view(&self) -> String {
        format!(
            "{}\n{}",
            style::error(&format!("No page at {}", self.path)),
            style::arrow("Try /python, /python/classic or /settings")
        )
    }
}
