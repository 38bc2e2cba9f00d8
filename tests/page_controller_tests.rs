//! Page controller behavior against an in-memory backend
//!
//! Every test drives a real `Program` so bridge calls run on tokio tasks and
//! come back as messages, the same path the terminal UI takes.

#![allow(clippy::unwrap_used)]

mod common;

use common::{FakeInstaller, PYTHONS, RecordingBridge, fake_state};
use serde_json::json;

use langvm_lib::bridge::BridgeError;
use langvm_lib::cli::pages::{
    LegacyMsg, LegacyPage, VersionManagerMsg, VersionManagerPage,
};
use langvm_lib::cli::tea::{Model, NoticeLevel, Program};
use langvm_lib::core::{Language, VersionItem};
use langvm_lib::daemon::protocol::error_codes;

async fn mounted(
    installer: FakeInstaller,
    page_size: usize,
) -> (
    Program<VersionManagerPage>,
    std::sync::Arc<RecordingBridge>,
) {
    let bridge = RecordingBridge::new(fake_state(installer));
    let mut program = Program::new(
        VersionManagerPage::new(Language::Python, page_size),
        bridge.clone(),
    );
    program.start();
    program.run_until_idle().await;
    (program, bridge)
}

fn item(version: &str, installed: bool, active: bool) -> VersionItem {
    VersionItem {
        version: version.into(),
        install_status: installed,
        use_status: active,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FETCHING
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_mount_fetches_once_with_payload() {
    let (program, bridge) = mounted(FakeInstaller::new(PYTHONS), 2).await;

    assert_eq!(
        bridge.calls(),
        vec![(
            "list_versions".to_string(),
            json!({"language": "python", "page": 0, "pageSize": 2, "keyWord": ""})
        )]
    );

    let page = program.model();
    assert_eq!(page.data().total, PYTHONS.len());
    assert_eq!(page.table().len(), 2);
    assert_eq!(page.page_count(), 3);
    assert!(!page.is_loading());
}

#[tokio::test]
async fn test_equal_payload_is_not_refetched() {
    let (mut program, bridge) = mounted(FakeInstaller::new(PYTHONS), 2).await;
    bridge.clear();

    program.send(VersionManagerMsg::Search("3.11".into()));
    program.send(VersionManagerMsg::Search("3.11".into()));
    program.run_until_idle().await;
    assert_eq!(bridge.count("list_versions"), 1);

    // already on the first page
    program.send(VersionManagerMsg::GoToPage(0));
    program.run_until_idle().await;
    assert_eq!(bridge.count("list_versions"), 1);
}

#[tokio::test]
async fn test_keyword_change_resets_page() {
    let (mut program, bridge) = mounted(FakeInstaller::new(PYTHONS), 2).await;

    program.send(VersionManagerMsg::NextPage);
    program.run_until_idle().await;
    assert_eq!(program.model().payload().page, 1);
    assert_eq!(program.model().data().list[0].version, "3.12.0");

    program.send(VersionManagerMsg::Search("3.12".into()));
    program.run_until_idle().await;

    let (_, params) = bridge.calls().pop().unwrap();
    assert_eq!(params["page"], 0);
    assert_eq!(params["keyWord"], "3.12");
    assert_eq!(program.model().data().total, 3);
}

#[tokio::test]
async fn test_only_latest_query_is_applied() {
    let (mut program, bridge) = mounted(FakeInstaller::new(PYTHONS), 10).await;
    bridge.clear();

    // both calls are in flight at once; replies may land in either order
    program.send(VersionManagerMsg::Search("3.11".into()));
    program.send(VersionManagerMsg::Search("3.10".into()));
    assert_eq!(program.in_flight(), 2);
    program.run_until_idle().await;

    assert_eq!(bridge.count("list_versions"), 2);
    let page = program.model();
    assert_eq!(page.payload().key_word, "3.10");
    assert_eq!(page.data().total, 1);
    assert_eq!(page.data().list[0].version, "3.10.13");
}

#[tokio::test]
async fn test_empty_result_renders_no_rows() {
    let (mut program, _bridge) = mounted(FakeInstaller::new(PYTHONS), 10).await;

    program.send(VersionManagerMsg::Search("9.9".into()));
    program.run_until_idle().await;

    let page = program.model();
    assert_eq!(page.data().total, 0);
    assert!(page.table().is_empty());
    assert!(page.table().toggle_install(0).is_none());
    assert!(page.view().contains("No versions found"));
}

#[tokio::test]
async fn test_empty_backend_list() {
    let (program, _bridge) = mounted(FakeInstaller::new(&[]), 10).await;
    assert_eq!(program.model().data().total, 0);
    assert_eq!(program.model().page_count(), 0);
    assert!(program.model().table().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════════
// TOGGLES
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_rows_mirror_install_and_use_status() {
    let installer = FakeInstaller::new(PYTHONS).with_installed(&["3.12.1"]);
    let (mut program, _bridge) = mounted(installer, 2).await;
    program.send(VersionManagerMsg::Search("3.12".into()));
    program.run_until_idle().await;

    let table = program.model().table();
    let rows = table.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].item, item("3.12.2", false, false));
    assert!(!rows[0].install_toggle && !rows[0].use_toggle);
    assert_eq!(rows[1].item, item("3.12.1", true, true));
    assert!(rows[1].install_toggle && rows[1].use_toggle);
}

#[tokio::test]
async fn test_install_toggle_installs_and_refetches_once() {
    let (mut program, bridge) = mounted(FakeInstaller::new(PYTHONS), 10).await;
    bridge.clear();

    let action = program.model().table().toggle_install(1).unwrap();
    program.send(action.into());
    program.run_until_idle().await;

    assert_eq!(bridge.names(), vec!["install", "list_versions"]);
    assert_eq!(
        bridge.calls()[0].1,
        json!({"language": "python", "version": "3.12.1"})
    );

    let page = program.model();
    assert_eq!(page.data().list[1], item("3.12.1", true, true));
    assert_eq!(page.notice(), Some("Installed Python 3.12.1"));
    let notices = program.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_install_toggle_on_installed_row_uninstalls() {
    let installer = FakeInstaller::new(PYTHONS).with_installed(&["3.11.8"]);
    let (mut program, bridge) = mounted(installer, 10).await;
    bridge.clear();

    let index = program
        .model()
        .data()
        .list
        .iter()
        .position(|v| v.version == "3.11.8")
        .unwrap();
    let action = program.model().table().toggle_install(index).unwrap();
    program.send(action.into());
    program.run_until_idle().await;

    assert_eq!(bridge.names(), vec!["uninstall", "list_versions"]);
    assert_eq!(bridge.calls()[0].1["version"], "3.11.8");
    assert!(program.model().data().list.iter().all(|v| !v.install_status));
}

#[tokio::test]
async fn test_use_toggle_switches_active_version() {
    let installer = FakeInstaller::new(PYTHONS).with_installed(&["3.12.2", "3.11.7"]);
    let (mut program, bridge) = mounted(installer, 10).await;
    bridge.clear();

    program.send(VersionManagerMsg::ToggleUse(item("3.11.7", true, false)));
    program.run_until_idle().await;

    assert_eq!(bridge.names(), vec!["use_version", "list_versions"]);
    let active: Vec<&str> = program
        .model()
        .data()
        .list
        .iter()
        .filter(|v| v.use_status)
        .map(|v| v.version.as_str())
        .collect();
    assert_eq!(active, vec!["3.11.7"]);
}

#[tokio::test]
async fn test_failed_install_still_refetches_once() {
    let installer = FakeInstaller::new(PYTHONS).failing_installs();
    let (mut program, bridge) = mounted(installer, 10).await;
    bridge.clear();

    program.send(VersionManagerMsg::ToggleInstall(item("3.12.2", false, false)));
    program.run_until_idle().await;

    assert_eq!(bridge.names(), vec!["install", "list_versions"]);
    let page = program.model();
    assert!(matches!(
        page.error(),
        Some(BridgeError::CommandRejected { code, .. }) if *code == error_codes::INSTALL_FAILED
    ));
    assert!(page.view().contains("archive truncated"));
    assert_eq!(program.take_notices()[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_use_of_missing_version_reports_not_installed() {
    let (mut program, bridge) = mounted(FakeInstaller::new(PYTHONS), 10).await;
    bridge.clear();

    program.send(VersionManagerMsg::ToggleUse(item("3.10.13", false, false)));
    program.run_until_idle().await;

    assert_eq!(bridge.count("list_versions"), 1);
    assert!(matches!(
        program.model().error(),
        Some(BridgeError::CommandRejected { code, .. }) if *code == error_codes::NOT_INSTALLED
    ));
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIC PAGE
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_classic_page_lists_everything_flat() {
    let installer = FakeInstaller::new(PYTHONS).with_installed(&["3.10.13"]);
    let bridge = RecordingBridge::new(fake_state(installer));
    let mut program = Program::new(LegacyPage::new(Language::Python), bridge.clone());
    program.start();
    program.run_until_idle().await;

    assert_eq!(bridge.calls()[0].1, json!({"language": "python"}));
    let page = program.model();
    assert_eq!(page.list().len(), PYTHONS.len());
    assert_eq!(page.list().last().unwrap(), &item("3.10.13", true, true));

    program.send(LegacyMsg::ToggleInstall(item("3.12.2", false, false)));
    program.run_until_idle().await;
    assert_eq!(bridge.names(), vec!["list_versions", "install", "list_versions"]);
    assert!(program.model().view().contains("2 installed"));
}
