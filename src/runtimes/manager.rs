//! Language manager responsible for orchestration
//!
//! Joins the remote version list with on-disk state and pages the result.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use super::{LanguageInstaller, installer_for};
use crate::config::Settings;
use crate::core::{Language, LvmError, Result, VersionItem, VersionResult};

pub struct LanguageManager {
    installers: HashMap<Language, Box<dyn LanguageInstaller>>,
    available: Option<Cache<Language, Arc<Vec<String>>>>,
}

impl LanguageManager {
    /// Build installers for every supported language
    pub fn new(settings: &Settings) -> Self {
        let installers = Language::all()
            .iter()
            .map(|lang| installer_for(*lang, settings))
            .collect();
        Self::with_installers(installers, settings.available_ttl())
    }

    /// Use explicit installers; a zero `ttl` disables the available-version cache
    pub fn with_installers(installers: Vec<Box<dyn LanguageInstaller>>, ttl: Duration) -> Self {
        let available = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(Language::all().len() as u64)
                .time_to_live(ttl)
                .build()
        });

        Self {
            installers: installers
                .into_iter()
                .map(|installer| (installer.language(), installer))
                .collect(),
            available,
        }
    }

    fn installer(&self, language: Language) -> Result<&dyn LanguageInstaller> {
        self.installers
            .get(&language)
            .map(|installer| &**installer)
            .ok_or_else(|| LvmError::UnsupportedLanguage(language.to_string()))
    }

    async fn available(&self, language: Language) -> Result<Arc<Vec<String>>> {
        if let Some(cache) = &self.available
            && let Some(hit) = cache.get(&language)
        {
            return Ok(hit);
        }

        let versions = Arc::new(self.installer(language)?.list_available().await?);
        tracing::debug!("{} available {} versions", versions.len(), language);

        if let Some(cache) = &self.available {
            cache.insert(language, Arc::clone(&versions));
        }
        Ok(versions)
    }

    /// Filtered, paged list of versions with install/use status
    pub async fn list_versions(
        &self,
        language: Language,
        page: usize,
        page_size: usize,
        key_word: Option<&str>,
    ) -> Result<VersionResult> {
        let installer = self.installer(language)?;
        let all = self.available(language).await?;
        let installed = installer.list_installed().await?;
        let current = installer.current().await?;

        Ok(paginate(
            &all,
            &installed,
            current.as_deref(),
            page,
            page_size,
            key_word,
        ))
    }

    /// Every available version with status, unpaged and unfiltered
    pub async fn list_all(&self, language: Language) -> Result<Vec<VersionItem>> {
        let installer = self.installer(language)?;
        let all = self.available(language).await?;
        let installed: HashSet<String> = installer.list_installed().await?.into_iter().collect();
        let current = installer.current().await?;

        Ok(all
            .iter()
            .map(|v| to_item(v, &installed, current.as_deref()))
            .collect())
    }

    pub async fn install(&self, language: Language, version: &str) -> Result<()> {
        self.installer(language)?.install(version).await
    }

    pub async fn uninstall(&self, language: Language, version: &str) -> Result<()> {
        self.installer(language)?.uninstall(version).await
    }

    pub async fn use_version(&self, language: Language, version: &str) -> Result<()> {
        self.installer(language)?.use_version(version).await
    }
}

fn to_item(version: &str, installed: &HashSet<String>, current: Option<&str>) -> VersionItem {
    VersionItem {
        version: version.to_string(),
        install_status: installed.contains(version),
        use_status: current == Some(version),
    }
}

/// Filter `all` by substring `key_word` and cut page `page` of size `page_size`
///
/// `total` is the filtered count; pages past the end are empty.
pub fn paginate(
    all: &[String],
    installed: &[String],
    current: Option<&str>,
    page: usize,
    page_size: usize,
    key_word: Option<&str>,
) -> VersionResult {
    let installed: HashSet<String> = installed.iter().cloned().collect();

    let filtered: Vec<&String> = match key_word.map(str::trim) {
        Some(key) if !key.is_empty() => all.iter().filter(|v| v.contains(key)).collect(),
        _ => all.iter().collect(),
    };

    let total = filtered.len();
    let start = page.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);

    VersionResult {
        total,
        list: filtered[start..end]
            .iter()
            .map(|v| to_item(v, &installed, current))
            .collect(),
    }
}
