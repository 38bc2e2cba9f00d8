//! Native Python installer
//!
//! Versions are discovered from the python.org FTP index; installs use the
//! prebuilt `install_only` archives from python-build-standalone.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use super::LanguageInstaller;
use super::common;
use crate::config::Settings;
use crate::core::http::{download_client, shared_client};
use crate::core::{Language, LvmError, Result};

/// Release pages searched before giving up on a version
const MAX_RELEASE_PAGES: usize = 5;
const RELEASES_PER_PAGE: usize = 30;

#[allow(clippy::expect_used)] // Static pattern
static INDEX_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="(\d+\.\d+\.\d+)/""#).expect("valid regex"));

#[derive(Debug, Deserialize)]
struct GithubRelease {
    tag_name: String,
    assets: Vec<GithubAsset>,
}

#[derive(Debug, Clone, Deserialize)]
struct GithubAsset {
    name: String,
    browser_download_url: String,
}

pub struct PythonInstaller {
    language_dir: PathBuf,
    downloads_dir: PathBuf,
    index_url: String,
    releases_url: String,
}

impl PythonInstaller {
    pub fn new(settings: &Settings) -> Self {
        Self {
            language_dir: settings.language_dir(Language::Python),
            downloads_dir: settings.downloads_dir(),
            index_url: settings.python.index_url.clone(),
            releases_url: settings.python.releases_url.clone(),
        }
    }

    fn version_dir(&self, version: &str) -> PathBuf {
        self.language_dir.join(version)
    }

    fn not_installed(version: &str) -> LvmError {
        LvmError::NotInstalled {
            language: Language::Python.to_string(),
            version: version.to_string(),
        }
    }

    /// Extract `3.x.y` directory names from the FTP index HTML, newest first
    pub fn parse_index(html: &str) -> Vec<String> {
        let versions: BTreeSet<String> = INDEX_VERSION_RE
            .captures_iter(html)
            .map(|cap| cap[1].to_string())
            .filter(|v| v.starts_with("3."))
            .collect();

        let mut versions: Vec<String> = versions.into_iter().collect();
        common::sort_versions_desc(&mut versions);
        versions
    }

    /// Target triple used in python-build-standalone asset names
    fn target_triple() -> Result<&'static str> {
        match (std::env::consts::OS, std::env::consts::ARCH) {
            ("linux", "x86_64") => Ok("x86_64-unknown-linux-gnu"),
            ("linux", "aarch64") => Ok("aarch64-unknown-linux-gnu"),
            ("macos", "x86_64") => Ok("x86_64-apple-darwin"),
            ("macos", "aarch64") => Ok("aarch64-apple-darwin"),
            ("windows", "x86_64") => Ok("x86_64-pc-windows-msvc"),
            (os, arch) => Err(LvmError::InstallFailed(format!(
                "No prebuilt Python for {os}/{arch}"
            ))),
        }
    }

    /// Whether `name` is the install-only archive of `version` for `triple`
    fn is_install_asset(name: &str, version: &str, triple: &str) -> bool {
        name.starts_with(&format!("cpython-{version}+"))
            && name.ends_with(&format!("-{triple}-install_only.tar.gz"))
    }

    /// Find the archive for `version`, plus the release's other assets for checksums
    async fn find_release_asset(
        &self,
        version: &str,
    ) -> Result<Option<(GithubAsset, Vec<GithubAsset>)>> {
        let triple = Self::target_triple()?;

        for page in 1..=MAX_RELEASE_PAGES {
            let url = format!(
                "{}?per_page={RELEASES_PER_PAGE}&page={page}",
                self.releases_url
            );
            let releases: Vec<GithubRelease> = shared_client()
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if releases.is_empty() {
                break;
            }

            for release in releases {
                if let Some(asset) = release
                    .assets
                    .iter()
                    .find(|a| Self::is_install_asset(&a.name, version, triple))
                    .cloned()
                {
                    tracing::debug!("Found {} in release {}", asset.name, release.tag_name);
                    return Ok(Some((asset, release.assets)));
                }
            }
        }

        Ok(None)
    }

    /// Look up the published SHA-256 for `asset`
    ///
    /// `Ok(None)` only when the release carries no checksum file. A checksum
    /// file that cannot be fetched, or that does not list the asset, is an error.
    async fn expected_checksum(
        asset: &GithubAsset,
        siblings: &[GithubAsset],
    ) -> Result<Option<String>> {
        let per_asset = format!("{}.sha256", asset.name);
        if let Some(sum) = siblings.iter().find(|a| a.name == per_asset) {
            let text = fetch_text(&sum.browser_download_url).await?;
            return text
                .split_whitespace()
                .next()
                .map(|hash| Some(hash.to_string()))
                .ok_or_else(|| LvmError::InstallFailed(format!("{per_asset} is empty")));
        }

        let Some(sums) = siblings.iter().find(|a| a.name == "SHA256SUMS") else {
            return Ok(None);
        };
        let text = fetch_text(&sums.browser_download_url).await?;
        Self::parse_sha256sums(&text, &asset.name)
            .map(Some)
            .ok_or_else(|| LvmError::InstallFailed(format!("SHA256SUMS does not list {}", asset.name)))
    }

    /// Find the hash of `file_name` in a `SHA256SUMS` listing
    pub fn parse_sha256sums(text: &str, file_name: &str) -> Option<String> {
        text.lines().find_map(|line| {
            let mut parts = line.split_whitespace();
            let hash = parts.next()?;
            let name = parts.next()?.trim_start_matches('*');
            (name == file_name).then(|| hash.to_string())
        })
    }

    async fn download(&self, version: &str) -> anyhow::Result<PathBuf> {
        let (asset, siblings) = self
            .find_release_asset(version)
            .await?
            .ok_or_else(|| LvmError::VersionNotFound {
                language: Language::Python.to_string(),
                version: version.to_string(),
            })?;

        let checksum = Self::expected_checksum(&asset, &siblings).await?;
        if checksum.is_none() {
            tracing::warn!("No published checksum for {}", asset.name);
        }

        let archive_path = self.downloads_dir.join(&asset.name);
        tracing::info!("Downloading {}", asset.name);
        common::download_with_progress(
            download_client(),
            &asset.browser_download_url,
            &archive_path,
            checksum.as_deref(),
        )
        .await?;

        Ok(archive_path)
    }

    /// Unpack a downloaded archive into place and activate it if nothing is active
    ///
    /// Extraction goes to `.{version}.partial` first so a failure never leaves a
    /// version directory behind.
    async fn install_archive(&self, version: &str, archive_path: &Path) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.language_dir).await?;

        let staging = self.language_dir.join(format!(".{version}.partial"));
        if staging.exists() {
            tokio::fs::remove_dir_all(&staging).await?;
        }

        tracing::info!("Extracting Python {version}");
        if let Err(err) = common::extract_tar_gz(archive_path, &staging, 1).await {
            let _ = tokio::fs::remove_dir_all(&staging).await;
            return Err(err);
        }

        tokio::fs::rename(&staging, self.version_dir(version))
            .await
            .with_context(|| format!("Failed to move Python {version} into place"))?;
        let _ = tokio::fs::remove_file(archive_path).await;

        if common::get_current_version(&self.language_dir).is_none() {
            common::set_current_version(&self.language_dir, version)?;
        }
        Ok(())
    }

    fn install_error(err: anyhow::Error) -> LvmError {
        match err.downcast::<LvmError>() {
            Ok(domain) => domain,
            Err(other) => LvmError::InstallFailed(format!("{other:#}")),
        }
    }
}

async fn fetch_text(url: &str) -> reqwest::Result<String> {
    shared_client()
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

#[async_trait]
impl LanguageInstaller for PythonInstaller {
    fn language(&self) -> Language {
        Language::Python
    }

    async fn list_available(&self) -> Result<Vec<String>> {
        tracing::debug!("Fetching Python index from {}", self.index_url);
        let html = fetch_text(&self.index_url).await?;
        Ok(Self::parse_index(&html))
    }

    async fn list_installed(&self) -> Result<Vec<String>> {
        Ok(common::list_installed_versions(&self.language_dir)?)
    }

    async fn current(&self) -> Result<Option<String>> {
        Ok(common::get_current_version(&self.language_dir))
    }

    async fn install(&self, version: &str) -> Result<()> {
        if self.version_dir(version).is_dir() {
            tracing::info!("Python {version} is already installed");
            return Ok(());
        }

        let archive_path = self.download(version).await.map_err(Self::install_error)?;
        self.install_archive(version, &archive_path)
            .await
            .map_err(Self::install_error)?;

        tracing::info!("Python {version} installed");
        Ok(())
    }

    async fn uninstall(&self, version: &str) -> Result<()> {
        let version_dir = self.version_dir(version);
        if !version_dir.is_dir() {
            return Err(Self::not_installed(version));
        }

        if common::get_current_version(&self.language_dir).as_deref() == Some(version) {
            common::clear_current_version(&self.language_dir)?;
        }

        tokio::fs::remove_dir_all(&version_dir).await?;
        tracing::info!("Python {version} uninstalled");
        Ok(())
    }

    async fn use_version(&self, version: &str) -> Result<()> {
        if !self.version_dir(version).is_dir() {
            return Err(Self::not_installed(version));
        }

        common::set_current_version(&self.language_dir, version)?;
        tracing::info!("Now using Python {version}");
        Ok(())
    }
}
