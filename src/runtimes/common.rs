//! Common utilities for language installers
//!
//! Shared functionality for downloading, extracting, and tracking installed versions.

use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};

/// Name of the pointer to the active version inside a language directory
pub const CURRENT_LINK: &str = "current";
/// Fallback pointer file for platforms without symlinks
pub const CURRENT_FILE: &str = "current_version";

/// Progress bar style for downloads
#[allow(clippy::expect_used)] // Static template string
pub fn download_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        )
        .expect("valid template")
        .progress_chars("█▓▒░")
}

/// Download a file with progress bar and optional checksum verification
pub async fn download_with_progress(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    expected_sha256: Option<&str>,
) -> Result<()> {
    use futures::StreamExt;
    use tokio::io::AsyncWriteExt;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to connect to {}", extract_domain(url)))?;

    if !response.status().is_success() {
        let status = response.status();
        if status.as_u16() == 404 {
            anyhow::bail!("Archive not found (404): {url}");
        }
        anyhow::bail!("Download failed: HTTP {status}");
    }

    let total_size = response.content_length().unwrap_or(0);
    let pb = if crate::cli::style::progress_enabled() {
        ProgressBar::new(total_size)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(download_progress_style());

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create parent directory: {}", parent.display()))?;
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("Failed to create file: {}", dest.display()))?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    let mut hasher = Sha256::new();

    while let Some(item) = stream.next().await {
        let chunk = item.context("Error downloading chunk")?;
        file.write_all(&chunk)
            .await
            .context("Error writing to file")?;
        hasher.update(&chunk);

        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()
        .await
        .with_context(|| format!("Failed to flush download to: {}", dest.display()))?;
    pb.finish_and_clear();

    if let Some(expected) = expected_sha256 {
        let actual = format!("{:x}", hasher.finalize());
        if actual != expected.to_lowercase() {
            let _ = tokio::fs::remove_file(dest).await;
            anyhow::bail!(
                "Checksum mismatch!\n  Expected: {expected}\n  Got: {actual}\n\nThis could indicate a corrupted download."
            );
        }
        tracing::debug!("Checksum verified for {}", dest.display());
    }

    Ok(())
}

/// Extract a .tar.gz archive, dropping the first `strip_components` path components
///
/// Entries that would land outside `dest_dir`, through `..`, an absolute path
/// or a symlink unpacked earlier, abort the extraction.
pub async fn extract_tar_gz(
    archive_path: &Path,
    dest_dir: &Path,
    strip_components: usize,
) -> Result<()> {
    let archive_path = archive_path.to_path_buf();
    let dest_dir = dest_dir.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let file = File::open(&archive_path)
            .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;

        let decoder = flate2::read::GzDecoder::new(BufReader::new(file));
        let mut archive = tar::Archive::new(decoder);

        fs::create_dir_all(&dest_dir)?;
        let root = dest_dir.canonicalize()?;

        for entry in archive.entries()? {
            let mut entry = entry?;
            let path = entry.path()?.into_owned();

            let Some(stripped) = contained_path(&path, strip_components)? else {
                continue;
            };
            let dest_path = root.join(&stripped);

            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)?;
                if !parent.canonicalize()?.starts_with(&root) {
                    anyhow::bail!("Archive entry escapes the install directory: {}", path.display());
                }
            }

            let entry_type = entry.header().entry_type();
            if entry_type.is_dir() {
                fs::create_dir_all(&dest_path)?;
            } else if entry_type.is_hard_link() {
                let target = entry
                    .link_name()?
                    .map(|link| link.into_owned())
                    .context("Hard link entry without a target")?;
                let target = contained_path(&target, strip_components)?.with_context(|| {
                    format!("Hard link target escapes the archive: {}", target.display())
                })?;
                fs::hard_link(root.join(target), &dest_path)?;
            } else {
                if fs::symlink_metadata(&dest_path).is_ok_and(|m| m.file_type().is_symlink()) {
                    fs::remove_file(&dest_path)?;
                }
                entry.unpack(&dest_path)?;
            }
        }

        Ok(())
    })
    .await?
}

/// Strip leading components from an archive path, rejecting anything but plain names
///
/// Returns `None` when nothing is left after stripping.
fn contained_path(path: &Path, strip_components: usize) -> Result<Option<PathBuf>> {
    let mut stripped = PathBuf::new();
    for component in path.components().skip(strip_components) {
        match component {
            Component::Normal(part) => stripped.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                anyhow::bail!("Archive entry escapes the install directory: {}", path.display());
            }
        }
    }
    Ok((!stripped.as_os_str().is_empty()).then_some(stripped))
}

/// Point the language's active version at `version`
pub fn set_current_version(language_dir: &Path, version: &str) -> Result<()> {
    let version_dir = language_dir.join(version);
    if !version_dir.is_dir() {
        anyhow::bail!("Version {version} is not installed");
    }

    clear_current_version(language_dir)?;

    #[cfg(unix)]
    std::os::unix::fs::symlink(&version_dir, language_dir.join(CURRENT_LINK))?;

    #[cfg(not(unix))]
    fs::write(language_dir.join(CURRENT_FILE), version)?;

    Ok(())
}

/// Remove the active version pointer, if any
pub fn clear_current_version(language_dir: &Path) -> Result<()> {
    let current_link = language_dir.join(CURRENT_LINK);
    if current_link.is_symlink() || current_link.exists() {
        fs::remove_file(&current_link)
            .with_context(|| format!("Failed to remove {}", current_link.display()))?;
    }

    let current_file = language_dir.join(CURRENT_FILE);
    if current_file.exists() {
        fs::remove_file(&current_file)?;
    }

    Ok(())
}

/// Get the active version from the "current" symlink (or pointer file)
pub fn get_current_version(language_dir: &Path) -> Option<String> {
    if let Ok(target) = fs::read_link(language_dir.join(CURRENT_LINK)) {
        return target.file_name().map(|n| n.to_string_lossy().to_string());
    }

    fs::read_to_string(language_dir.join(CURRENT_FILE))
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// List installed versions in a directory, newest first
pub fn list_installed_versions(language_dir: &Path) -> Result<Vec<String>> {
    if !language_dir.exists() {
        return Ok(Vec::new());
    }

    let mut versions = Vec::new();
    for entry in fs::read_dir(language_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        // dot-prefixed directories are partial installs
        if name != CURRENT_LINK && !name.starts_with('.') && entry.file_type()?.is_dir() {
            versions.push(name);
        }
    }

    sort_versions_desc(&mut versions);
    Ok(versions)
}

/// Compare version strings by their numeric components
pub fn version_cmp(a: &str, b: &str) -> Ordering {
    let a_parts: Vec<u32> = a
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|p| p.parse().ok())
        .collect();
    let b_parts: Vec<u32> = b
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|p| p.parse().ok())
        .collect();

    for i in 0..a_parts.len().max(b_parts.len()) {
        let a_part = a_parts.get(i).unwrap_or(&0);
        let b_part = b_parts.get(i).unwrap_or(&0);
        if a_part != b_part {
            return a_part.cmp(b_part);
        }
    }

    Ordering::Equal
}

/// Sort newest first
pub fn sort_versions_desc(versions: &mut [String]) {
    versions.sort_by(|a, b| version_cmp(b, a));
}

/// Normalize version string (remove leading 'v' if present)
pub fn normalize_version(version: &str) -> String {
    version.trim().trim_start_matches('v').to_string()
}

/// Extract domain from URL for error messages
fn extract_domain(url: &str) -> &str {
    url.split("://")
        .nth(1)
        .and_then(|s| s.split('/').next())
        .unwrap_or(url)
}
