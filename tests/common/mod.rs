//! langvm test infrastructure
//!
//! A fake installer that keeps "disk" state in memory and a bridge that
//! records every command before handing it to the real dispatcher.

#![allow(dead_code)] // Test utilities may not all be used in every test file

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use langvm_lib::bridge::{BridgeError, CommandBridge, LocalBridge};
use langvm_lib::core::{Language, LvmError, Result};
use langvm_lib::daemon::handlers::DaemonState;
use langvm_lib::runtimes::common::sort_versions_desc;
use langvm_lib::runtimes::{LanguageInstaller, LanguageManager};

// ═══════════════════════════════════════════════════════════════════════════════
// FAKE INSTALLER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct Disk {
    installed: BTreeSet<String>,
    current: Option<String>,
}

/// In-memory installer with the same status rules as the real one
pub struct FakeInstaller {
    available: Vec<String>,
    disk: Mutex<Disk>,
    fail_installs: bool,
    available_calls: Arc<AtomicUsize>,
}

impl FakeInstaller {
    pub fn new(available: &[&str]) -> Self {
        let mut available: Vec<String> = available.iter().map(ToString::to_string).collect();
        sort_versions_desc(&mut available);
        Self {
            available,
            disk: Mutex::new(Disk::default()),
            fail_installs: false,
            available_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mark versions as already on disk; the first one becomes active
    pub fn with_installed(self, installed: &[&str]) -> Self {
        {
            let mut disk = self.disk.lock().unwrap();
            disk.installed = installed.iter().map(ToString::to_string).collect();
            disk.current = installed.first().map(ToString::to_string);
        }
        self
    }

    /// Every install fails with `InstallFailed`
    pub fn failing_installs(mut self) -> Self {
        self.fail_installs = true;
        self
    }

    /// Counter of remote list fetches, readable after the installer is boxed
    pub fn available_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.available_calls)
    }

    fn not_installed(version: &str) -> LvmError {
        LvmError::NotInstalled {
            language: "python".into(),
            version: version.into(),
        }
    }
}

#[async_trait]
impl LanguageInstaller for FakeInstaller {
    fn language(&self) -> Language {
        Language::Python
    }

    async fn list_available(&self) -> Result<Vec<String>> {
        self.available_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.available.clone())
    }

    async fn list_installed(&self) -> Result<Vec<String>> {
        let mut installed: Vec<String> =
            self.disk.lock().unwrap().installed.iter().cloned().collect();
        sort_versions_desc(&mut installed);
        Ok(installed)
    }

    async fn current(&self) -> Result<Option<String>> {
        Ok(self.disk.lock().unwrap().current.clone())
    }

    async fn install(&self, version: &str) -> Result<()> {
        if !self.available.iter().any(|v| v == version) {
            return Err(LvmError::VersionNotFound {
                language: "python".into(),
                version: version.into(),
            });
        }
        if self.fail_installs {
            return Err(LvmError::InstallFailed("archive truncated".into()));
        }
        let mut disk = self.disk.lock().unwrap();
        disk.installed.insert(version.to_string());
        if disk.current.is_none() {
            disk.current = Some(version.to_string());
        }
        Ok(())
    }

    async fn uninstall(&self, version: &str) -> Result<()> {
        let mut disk = self.disk.lock().unwrap();
        if !disk.installed.remove(version) {
            return Err(Self::not_installed(version));
        }
        if disk.current.as_deref() == Some(version) {
            disk.current = None;
        }
        Ok(())
    }

    async fn use_version(&self, version: &str) -> Result<()> {
        let mut disk = self.disk.lock().unwrap();
        if !disk.installed.contains(version) {
            return Err(Self::not_installed(version));
        }
        disk.current = Some(version.to_string());
        Ok(())
    }
}

/// Daemon state backed by `installer`, without the available-version cache
pub fn fake_state(installer: FakeInstaller) -> Arc<DaemonState> {
    Arc::new(DaemonState::with_manager(LanguageManager::with_installers(
        vec![Box::new(installer)],
        Duration::ZERO,
    )))
}

/// The versions most tests work with, newest first
pub const PYTHONS: &[&str] = &["3.12.2", "3.12.1", "3.12.0", "3.11.8", "3.11.7", "3.10.13"];

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDING BRIDGE
// ═══════════════════════════════════════════════════════════════════════════════

/// Forwards to an in-process backend and remembers every call
pub struct RecordingBridge {
    inner: LocalBridge,
    calls: Mutex<Vec<(String, Value)>>,
}

impl RecordingBridge {
    pub fn new(state: Arc<DaemonState>) -> Arc<Self> {
        Arc::new(Self {
            inner: LocalBridge::with_state(state),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    /// Names of the commands issued so far
    pub fn names(&self) -> Vec<String> {
        self.calls().into_iter().map(|(name, _)| name).collect()
    }

    pub fn count(&self, command: &str) -> usize {
        self.calls().iter().filter(|(name, _)| name == command).count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl CommandBridge for RecordingBridge {
    async fn invoke(&self, command: &str, params: Value) -> std::result::Result<Value, BridgeError> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), params.clone()));
        self.inner.invoke(command, params).await
    }

    fn describe(&self) -> String {
        "recording".to_string()
    }
}
