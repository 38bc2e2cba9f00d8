//! One-shot command implementations for the langvm CLI
//!
//! `list` drives the same page models as the interactive UI to completion and
//! prints their final view. The mutating commands validate input locally and
//! then make a single bridge call.

use std::sync::Arc;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use indicatif::ProgressBar;

use crate::bridge::{self, CommandBridge};
use crate::cli::Cli;
use crate::cli::pages::{LegacyPage, Mutation, VersionManagerPage};
use crate::cli::style;
use crate::cli::tea::{Model, Program, Renderer};
use crate::cli::tui;
use crate::config::Settings;
use crate::core::validation::validate_version;
use crate::core::{Language, SearchPayload};
use crate::runtimes::common::normalize_version;

/// Flags of `langvm list`
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// 1-based page number as typed by the user
    pub page: usize,
    pub page_size: Option<usize>,
    pub search: Option<String>,
    pub classic: bool,
    pub json: bool,
}

impl ListOptions {
    /// Search payload for the version manager page
    #[must_use]
    pub fn payload(&self, language: Language, settings: &Settings) -> SearchPayload {
        SearchPayload {
            page: self.page.saturating_sub(1),
            key_word: self.search.clone().unwrap_or_default(),
            ..SearchPayload::new(language)
        }
        .with_page_size(self.page_size.unwrap_or(settings.frontend.page_size))
    }
}

/// Start the interactive UI
pub async fn ui(settings: &Settings, route: Option<&str>) -> Result<()> {
    let route = route.unwrap_or(&settings.frontend.start_route).to_string();
    let bridge = bridge::connect(settings).await;
    tracing::info!("UI starting at {route} ({})", bridge.describe());
    tui::run(settings.clone(), bridge, &route).await
}

/// List versions, paged or classic
pub async fn list(settings: &Settings, language: &str, opts: &ListOptions) -> Result<()> {
    let language: Language = language.parse()?;
    let bridge = bridge::connect(settings).await;

    if opts.classic {
        let page = settle(LegacyPage::new(language), bridge).await;
        if let Some(err) = page.error() {
            return Err(err.clone().into());
        }
        if opts.json {
            println!("{}", serde_json::to_string_pretty(page.list())?);
        } else {
            Renderer::new().render(&page.view())?;
        }
        return Ok(());
    }

    let page = settle(
        VersionManagerPage::with_payload(opts.payload(language, settings)),
        bridge,
    )
    .await;
    if let Some(err) = page.error() {
        return Err(err.clone().into());
    }
    if opts.json {
        println!("{}", serde_json::to_string_pretty(page.data())?);
    } else {
        Renderer::new().render(&page.view())?;
    }
    Ok(())
}

/// Install, uninstall or switch to a version
pub async fn mutate(
    settings: &Settings,
    mutation: Mutation,
    language: &str,
    version: &str,
) -> Result<()> {
    let language: Language = language.parse()?;
    let version = normalize_version(version);
    validate_version(&version)?;

    let bridge = bridge::connect(settings).await;
    let progress = mutation.progress_text(language, &version);
    let pb = if bridge.draws_progress() {
        println!("{}", style::info(&progress));
        ProgressBar::hidden()
    } else {
        style::spinner(&progress)
    };

    let result = bridge::call::<()>(bridge.as_ref(), &mutation.command(language, &version)).await;
    pb.finish_and_clear();
    result?;

    println!("{}", style::success(&mutation.done_text(language, &version)));
    Ok(())
}

/// Print the effective configuration, optionally writing it out first
pub fn config(settings: &Settings, init: bool) -> Result<()> {
    if init {
        let path = Settings::config_path();
        if path.exists() {
            println!("{}", style::warning(&format!("{} already exists", path.display())));
        } else {
            settings.save()?;
            println!("{}", style::success(&format!("Wrote {}", path.display())));
        }
    }
    print!("{}", settings.to_toml()?);
    Ok(())
}

/// Print completions for `shell`
pub fn completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "langvm", &mut std::io::stdout());
}

/// Run a page from mount until every bridge call has answered
///
/// Pages only raise notices for mutations, which `list` never sends.
async fn settle<M: Model>(model: M, bridge: Arc<dyn CommandBridge>) -> M {
    let mut program = Program::new(model, bridge);
    program.start();
    program.run_until_idle().await;
    program.into_model()
}
