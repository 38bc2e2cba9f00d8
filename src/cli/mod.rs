//! CLI module for langvm
//!
//! Argument parsing, one-shot commands, the page models and the terminal UI.

use anyhow::Result;
use async_trait::async_trait;

use crate::bridge::BridgeError;
use crate::config::Settings;
use crate::core::{LvmError, format_error_with_suggestion};

mod args;
pub mod commands;
pub mod components;
pub mod pages;
pub mod router;
pub mod style;
pub mod tables;
pub mod tea;
pub mod tui;

pub use args::{Cli, Commands};

/// Global context for CLI command execution
pub struct CliContext {
    pub settings: Settings,
}

/// A trait for modular CLI command execution
#[async_trait]
pub trait CommandRunner {
    /// Execute the command
    async fn execute(&self, ctx: &CliContext) -> Result<()>;
}

#[async_trait]
impl CommandRunner for Commands {
    async fn execute(&self, ctx: &CliContext) -> Result<()> {
        match self {
            Self::Ui { route } => commands::ui(&ctx.settings, route.as_deref()).await,
            Self::List {
                language,
                page,
                page_size,
                search,
                classic,
                json,
            } => {
                let opts = commands::ListOptions {
                    page: *page,
                    page_size: *page_size,
                    search: search.clone(),
                    classic: *classic,
                    json: *json,
                };
                commands::list(&ctx.settings, language, &opts).await
            }
            Self::Install { language, version } => {
                commands::mutate(&ctx.settings, pages::Mutation::Install, language, version).await
            }
            Self::Uninstall { language, version } => {
                commands::mutate(&ctx.settings, pages::Mutation::Uninstall, language, version)
                    .await
            }
            Self::Use { language, version } => {
                commands::mutate(&ctx.settings, pages::Mutation::Use, language, version).await
            }
            Self::Completions { shell } => {
                commands::completions(*shell);
                Ok(())
            }
            Self::Config { init } => commands::config(&ctx.settings, *init),
        }
    }
}

/// Render a top-level error with a suggestion when one is known
#[must_use]
pub fn format_cli_error(err: &anyhow::Error) -> String {
    if let Some(e) = err.downcast_ref::<LvmError>() {
        return format_error_with_suggestion(e);
    }

    if let Some(e) = err.downcast_ref::<BridgeError>() {
        let mut msg = format!("Error: {e}");
        if let Some(suggestion) = e.suggestion() {
            msg.push_str("\n\n💡 ");
            msg.push_str(suggestion);
        }
        return msg;
    }

    format!("Error: {err:#}")
}
