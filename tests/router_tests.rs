//! Router and layout integration tests

#![allow(clippy::unwrap_used)]

mod common;

use common::{FakeInstaller, PYTHONS, RecordingBridge, fake_state};

use langvm_lib::cli::pages::VersionManagerMsg;
use langvm_lib::cli::router::{Layout, LayoutMsg, Page, Route, resolve};
use langvm_lib::cli::tea::{Model, Program};
use langvm_lib::config::Settings;
use langvm_lib::core::Language;

#[test]
fn test_root_resolves_to_python_version_manager() {
    for path in ["/", "", "  /  ", "/python", "/python/"] {
        assert_eq!(
            resolve(path),
            Route::VersionManager(Language::Python),
            "path {path:?}"
        );
    }
}

#[test]
fn test_not_found_keeps_requested_path() {
    let route = resolve("/nope/");
    assert_eq!(route, Route::NotFound("/nope".into()));
    let layout = Layout::new(Settings::default(), "/nope");
    assert!(layout.view().contains("/nope"));
}

#[tokio::test]
async fn test_root_mounts_version_manager_and_fetches() {
    let bridge = RecordingBridge::new(fake_state(FakeInstaller::new(PYTHONS)));
    let mut program = Program::new(Layout::new(Settings::default(), "/"), bridge.clone());
    program.start();
    program.run_until_idle().await;

    assert_eq!(program.model().route().path(), "/python");
    assert_eq!(bridge.names(), vec!["list_versions"]);
    let Page::VersionManager(page) = program.model().page() else {
        panic!("expected the version manager");
    };
    assert_eq!(page.data().total, PYTHONS.len());
}

#[tokio::test]
async fn test_settings_page_makes_no_calls() {
    let bridge = RecordingBridge::new(fake_state(FakeInstaller::new(PYTHONS)));
    let mut program = Program::new(
        Layout::new(Settings::default(), "/settings"),
        bridge.clone(),
    );
    program.start();
    program.run_until_idle().await;

    assert!(bridge.calls().is_empty());
    assert!(program.model().view().contains("page_size"));
}

#[tokio::test]
async fn test_reply_for_unmounted_page_is_ignored() {
    let bridge = RecordingBridge::new(fake_state(FakeInstaller::new(PYTHONS)));
    let mut program = Program::new(Layout::new(Settings::default(), "/python"), bridge.clone());
    program.start();
    program.run_until_idle().await;

    // a search is in flight when the user leaves and comes back
    let search = program
        .model()
        .version_manager(VersionManagerMsg::Search("3.11".into()));
    program.send(search);
    program.send(LayoutMsg::Navigate("/python/classic".into()));
    program.send(LayoutMsg::Navigate("/python".into()));
    program.run_until_idle().await;

    let Page::VersionManager(page) = program.model().page() else {
        panic!("expected the version manager");
    };
    assert!(page.payload().key_word.is_empty());
    assert_eq!(page.data().total, PYTHONS.len());
}
