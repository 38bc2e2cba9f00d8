//! Page controllers mounted by the router
//!
//! Each page owns its state and talks to the backend only through `Cmd::Invoke`.

mod legacy;
mod settings;
mod version_manager;

pub use legacy::{LegacyMsg, LegacyPage};
pub use settings::{NotFoundPage, SettingsPage};
pub use version_manager::{VersionManagerMsg, VersionManagerPage};

use crate::bridge::BridgeCommand;
use crate::core::{Language, VersionItem};

/// A state-changing backend call triggered from a table toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Install,
    Uninstall,
    Use,
}

impl Mutation {
    /// Install when the record is not installed, uninstall otherwise
    #[must_use]
    pub const fn for_install_toggle(item: &VersionItem) -> Self {
        if item.install_status {
            Self::Uninstall
        } else {
            Self::Install
        }
    }

    #[must_use]
    pub fn command(self, language: Language, version: &str) -> BridgeCommand {
        match self {
            Self::Install => BridgeCommand::install(language, version),
            Self::Uninstall => BridgeCommand::uninstall(language, version),
            Self::Use => BridgeCommand::use_version(language, version),
        }
    }

    /// Message shown while the call runs
    #[must_use]
    pub fn progress_text(self, language: Language, version: &str) -> String {
        let verb = match self {
            Self::Install => "Installing",
            Self::Uninstall => "Uninstalling",
            Self::Use => "Switching to",
        };
        format!("{verb} {} {version}…", language.display_name())
    }

    /// Message shown after the call succeeded
    #[must_use]
    pub fn done_text(self, language: Language, version: &str) -> String {
        let name = language.display_name();
        match self {
            Self::Install => format!("Installed {name} {version}"),
            Self::Uninstall => format!("Uninstalled {name} {version}"),
            Self::Use => format!("Now using {name} {version}"),
        }
    }
}
