//! Language installers and the manager that pages over them

pub mod common;
mod manager;
pub mod python;

use async_trait::async_trait;

use crate::config::Settings;
use crate::core::{Language, Result};

pub use manager::{LanguageManager, paginate};
pub use python::PythonInstaller;

/// Backend operations for one language
///
/// Version strings handed to these methods are already normalized and validated.
#[async_trait]
pub trait LanguageInstaller: Send + Sync {
    /// The language this installer manages
    fn language(&self) -> Language;

    /// Versions that can be installed, newest first
    async fn list_available(&self) -> Result<Vec<String>>;

    /// Versions present on disk, newest first
    async fn list_installed(&self) -> Result<Vec<String>>;

    /// The active version, if one is selected
    async fn current(&self) -> Result<Option<String>>;

    /// Download and install a version
    async fn install(&self, version: &str) -> Result<()>;

    /// Remove an installed version
    async fn uninstall(&self, version: &str) -> Result<()>;

    /// Make an installed version the active one
    async fn use_version(&self, version: &str) -> Result<()>;
}

/// Build the installer for `language` from settings
pub fn installer_for(language: Language, settings: &Settings) -> Box<dyn LanguageInstaller> {
    match language {
        Language::Python => Box::new(PythonInstaller::new(settings)),
    }
}
