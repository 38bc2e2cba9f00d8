//! Version manager page
//!
//! Owns the search payload (language, page, page size, keyword) and the last
//! accepted list result. Rules:
//!
//! - every change of the payload issues exactly one `list_versions` call and
//!   setting an equal payload issues none;
//! - each list call carries a sequence number and only the latest one is
//!   accepted, older replies are dropped;
//! - every install/uninstall/use call is followed by exactly one refetch,
//!   whether it succeeded or not;
//! - failures end up in `error` and are shown by the view until the user
//!   acts again; the automatic refetch after a mutation keeps them.

use std::collections::HashSet;

use serde_json::Value;

use super::Mutation;
use crate::bridge::{BridgeCommand, BridgeError, decode};
use crate::cli::components::{TableAction, VersionTable};
use crate::cli::style;
use crate::cli::tea::{Cmd, Model};
use crate::core::{Language, SearchPayload, VersionItem, VersionResult, page_count};

#[derive(Debug)]
pub enum VersionManagerMsg {
    /// First load after the page is mounted
    Mount,
    /// Replace the keyword; goes back to the first page
    Search(String),
    NextPage,
    PrevPage,
    GoToPage(usize),
    SetPageSize(usize),
    /// Refetch with the unchanged payload
    Refresh,
    ToggleInstall(VersionItem),
    ToggleUse(VersionItem),
    SelectNext,
    SelectPrev,
    Listed {
        seq: u64,
        result: Result<Value, BridgeError>,
    },
    Mutated {
        mutation: Mutation,
        version: String,
        result: Result<Value, BridgeError>,
    },
}

impl From<TableAction> for VersionManagerMsg {
    fn from(action: TableAction) -> Self {
        match action {
            TableAction::Search(keyword) => Self::Search(keyword),
            TableAction::ToggleInstall(item) => Self::ToggleInstall(item),
            TableAction::ToggleUse(item) => Self::ToggleUse(item),
        }
    }
}

#[derive(Debug)]
pub struct VersionManagerPage {
    payload: SearchPayload,
    data: VersionResult,
    latest_seq: u64,
    loading: bool,
    error: Option<BridgeError>,
    notice: Option<String>,
    pending: HashSet<String>,
    selected: usize,
}

impl VersionManagerPage {
    #[must_use]
    pub fn new(language: Language, page_size: usize) -> Self {
        Self {
            payload: SearchPayload::new(language).with_page_size(page_size),
            data: VersionResult::default(),
            latest_seq: 0,
            loading: false,
            error: None,
            notice: None,
            pending: HashSet::new(),
            selected: 0,
        }
    }

    /// Start from an explicit payload (CLI `list` with flags)
    #[must_use]
    pub fn with_payload(payload: SearchPayload) -> Self {
        let page_size = payload.page_size;
        let mut page = Self::new(payload.language, page_size);
        page.payload = payload;
        page
    }

    #[must_use]
    pub const fn payload(&self) -> &SearchPayload {
        &self.payload
    }

    #[must_use]
    pub const fn data(&self) -> &VersionResult {
        &self.data
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn error(&self) -> Option<&BridgeError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Sequence number of the most recent list call
    #[must_use]
    pub const fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Number of pages for the current result
    #[must_use]
    pub fn page_count(&self) -> usize {
        page_count(self.data.total, self.payload.page_size)
    }

    #[must_use]
    pub fn table(&self) -> VersionTable {
        VersionTable::new(&self.data.list, &self.pending)
    }

    fn fetch(&mut self) -> Cmd<VersionManagerMsg> {
        self.latest_seq += 1;
        self.loading = true;
        let seq = self.latest_seq;
        Cmd::invoke(BridgeCommand::list_page(&self.payload), move |result| {
            VersionManagerMsg::Listed { seq, result }
        })
    }

    fn set_payload(&mut self, next: SearchPayload) -> Cmd<VersionManagerMsg> {
        if next == self.payload {
            return Cmd::none();
        }
        self.payload = next;
        self.error = None;
        self.fetch()
    }

    fn with_page(&self, page: usize) -> SearchPayload {
        let last = self.page_count().saturating_sub(1);
        SearchPayload {
            page: page.min(last),
            ..self.payload.clone()
        }
    }

    fn mutate(&mut self, mutation: Mutation, item: &VersionItem) -> Cmd<VersionManagerMsg> {
        let version = item.version.clone();
        if self.pending.contains(&version) {
            return Cmd::warning(format!("{version} is already being updated"));
        }

        let language = self.payload.language;
        self.pending.insert(version.clone());
        self.error = None;
        self.notice = Some(mutation.progress_text(language, &version));

        Cmd::invoke(mutation.command(language, &version), move |result| {
            VersionManagerMsg::Mutated {
                mutation,
                version,
                result,
            }
        })
    }

    fn on_listed(&mut self, seq: u64, result: Result<Value, BridgeError>) -> Cmd<VersionManagerMsg> {
        if seq != self.latest_seq {
            tracing::debug!("dropping stale list reply {seq} (latest {})", self.latest_seq);
            return Cmd::none();
        }

        self.loading = false;
        match result.and_then(decode::<VersionResult>) {
            Ok(data) => {
                self.data = data;
                self.selected = self.selected.min(self.data.list.len().saturating_sub(1));
            }
            Err(e) => {
                tracing::warn!("list_versions failed: {e}");
                self.error = Some(e);
            }
        }
        Cmd::none()
    }

    fn on_mutated(
        &mut self,
        mutation: Mutation,
        version: &str,
        result: Result<Value, BridgeError>,
    ) -> Cmd<VersionManagerMsg> {
        self.pending.remove(version);
        let language = self.payload.language;

        let report = match result {
            Ok(_) => {
                let text = mutation.done_text(language, version);
                self.notice = Some(text.clone());
                self.error = None;
                Cmd::success(text)
            }
            Err(e) => {
                self.notice = None;
                let text = e.to_string();
                self.error = Some(e);
                Cmd::error(text)
            }
        };

        Cmd::batch([report, self.fetch()])
    }
}

impl Model for VersionManagerPage {
    type Msg = VersionManagerMsg;

    fn init(&self) -> Cmd<VersionManagerMsg> {
        Cmd::msg(VersionManagerMsg::Mount)
    }

    fn update(&mut self, msg: VersionManagerMsg) -> Cmd<VersionManagerMsg> {
        match msg {
            VersionManagerMsg::Mount | VersionManagerMsg::Refresh => {
                self.error = None;
                self.fetch()
            }
            VersionManagerMsg::Search(keyword) => {
                if keyword == self.payload.key_word {
                    return Cmd::none();
                }
                self.selected = 0;
                self.set_payload(SearchPayload {
                    key_word: keyword,
                    page: 0,
                    ..self.payload.clone()
                })
            }
            VersionManagerMsg::NextPage => {
                let next = self.with_page(self.payload.page.saturating_add(1));
                self.set_payload(next)
            }
            VersionManagerMsg::PrevPage => {
                let prev = self.with_page(self.payload.page.saturating_sub(1));
                self.set_payload(prev)
            }
            VersionManagerMsg::GoToPage(page) => {
                let next = self.with_page(page);
                self.set_payload(next)
            }
            VersionManagerMsg::SetPageSize(size) => {
                let next = SearchPayload {
                    page: 0,
                    ..self.payload.clone()
                }
                .with_page_size(size);
                self.set_payload(next)
            }
            VersionManagerMsg::ToggleInstall(item) => {
                self.mutate(Mutation::for_install_toggle(&item), &item)
            }
            VersionManagerMsg::ToggleUse(item) => self.mutate(Mutation::Use, &item),
            VersionManagerMsg::SelectNext => {
                if self.selected + 1 < self.data.list.len() {
                    self.selected += 1;
                }
                Cmd::none()
            }
            VersionManagerMsg::SelectPrev => {
                self.selected = self.selected.saturating_sub(1);
                Cmd::none()
            }
            VersionManagerMsg::Listed { seq, result } => self.on_listed(seq, result),
            VersionManagerMsg::Mutated {
                mutation,
                version,
                result,
            } => self.on_mutated(mutation, &version, result),
        }
    }

    fn view(&self) -> String {
        let mut out = vec![style::header(&format!(
            "{} versions",
            self.payload.language.display_name()
        ))];

        if let Some(error) = &self.error {
            out.push(style::error(&error.to_string()));
        }

        out.push(self.table().render_text());

        let mut footer = format!(
            "Page {}/{} · {} versions",
            self.payload.page + 1,
            self.page_count().max(1),
            self.data.total
        );
        if !self.payload.key_word.is_empty() {
            footer.push_str(&format!(" · search: {}", self.payload.key_word));
        }
        if self.loading {
            footer.push_str(" · loading…");
        }
        out.push(style::dim(&footer));

        out.join("\n")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page() -> VersionManagerPage {
        VersionManagerPage::new(Language::Python, 2)
    }

    fn listed(seq: u64, total: usize, versions: &[&str]) -> VersionManagerMsg {
        let list: Vec<Value> = versions
            .iter()
            .map(|v| json!({"version": v, "install_status": false}))
            .collect();
        VersionManagerMsg::Listed {
            seq,
            result: Ok(json!({"total": total, "list": list})),
        }
    }

    #[test]
    fn test_mount_fetches_current_payload() {
        let mut page = page();
        let cmd = page.update(VersionManagerMsg::Mount);
        let calls = cmd.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].params(),
            json!({"language": "python", "page": 0, "pageSize": 2, "keyWord": ""})
        );
        assert!(page.is_loading());
    }

    #[test]
    fn test_same_keyword_is_not_refetched() {
        let mut page = page();
        assert_eq!(page.update(VersionManagerMsg::Search("3.12".into())).invocations().len(), 1);
        assert!(page.update(VersionManagerMsg::Search("3.12".into())).invocations().is_empty());
    }

    #[test]
    fn test_search_resets_page() {
        let mut page = page();
        let _ = page.update(VersionManagerMsg::Mount);
        let _ = page.update(listed(1, 6, &["3.12.2", "3.12.1"]));
        let _ = page.update(VersionManagerMsg::NextPage);
        assert_eq!(page.payload().page, 1);

        let _ = page.update(VersionManagerMsg::Search("3.11".into()));
        assert_eq!(page.payload().page, 0);
        assert_eq!(page.payload().key_word, "3.11");
    }

    #[test]
    fn test_stale_reply_is_dropped() {
        let mut page = page();
        let _ = page.update(VersionManagerMsg::Search("3".into()));
        let _ = page.update(VersionManagerMsg::Search("3.1".into()));
        assert_eq!(page.latest_seq(), 2);

        let _ = page.update(listed(2, 1, &["3.1.5"]));
        let _ = page.update(listed(1, 3, &["3.12.0", "3.11.0"]));
        assert_eq!(page.data().total, 1);
        assert_eq!(page.data().list[0].version, "3.1.5");
        assert!(!page.is_loading());
    }

    #[test]
    fn test_paging_is_clamped() {
        let mut page = page();
        let _ = page.update(VersionManagerMsg::Mount);
        let _ = page.update(listed(1, 3, &["3.12.1", "3.12.0"]));
        assert_eq!(page.page_count(), 2);

        assert!(page.update(VersionManagerMsg::PrevPage).invocations().is_empty());
        assert_eq!(page.update(VersionManagerMsg::NextPage).invocations().len(), 1);
        assert!(page.update(VersionManagerMsg::NextPage).invocations().is_empty());
        assert!(page.update(VersionManagerMsg::GoToPage(99)).invocations().is_empty());
        assert_eq!(page.payload().page, 1);
    }

    #[test]
    fn test_failed_fetch_keeps_last_result_and_shows_error() {
        let mut page = page();
        let _ = page.update(VersionManagerMsg::Mount);
        let _ = page.update(listed(1, 1, &["3.12.0"]));
        let _ = page.update(VersionManagerMsg::Refresh);
        let _ = page.update(VersionManagerMsg::Listed {
            seq: 2,
            result: Err(BridgeError::Unavailable("socket closed".into())),
        });

        assert_eq!(page.data().list.len(), 1);
        assert!(page.error().unwrap().to_string().contains("socket closed"));
        assert!(page.view().contains("socket closed"));
    }

    #[test]
    fn test_mutation_failure_still_refetches_once() {
        let mut page = page();
        let item = VersionItem {
            version: "3.12.0".into(),
            install_status: true,
            use_status: false,
        };
        let cmd = page.update(VersionManagerMsg::ToggleInstall(item));
        assert_eq!(cmd.invocations()[0].name(), "uninstall");

        let cmd = page.update(VersionManagerMsg::Mutated {
            mutation: Mutation::Uninstall,
            version: "3.12.0".into(),
            result: Err(BridgeError::CommandRejected {
                code: -1003,
                reason: "not installed".into(),
            }),
        });
        let calls = cmd.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name(), "list_versions");
        assert_eq!(page.error().unwrap().to_string(), "not installed");
    }

    #[test]
    fn test_two_rows_mirror_install_status() {
        let mut page = page();
        let _ = page.update(VersionManagerMsg::Mount);
        let _ = page.update(VersionManagerMsg::Listed {
            seq: 1,
            result: Ok(json!({"total": 2, "list": [
                {"version": "3.11.0", "install_status": false},
                {"version": "3.12.0", "install_status": true}
            ]})),
        });

        let table = page.table();
        let toggles: Vec<bool> = table.rows().iter().map(|r| r.install_toggle).collect();
        assert_eq!(toggles, vec![false, true]);

        let Some(TableAction::ToggleInstall(record)) = table.toggle_install(0) else {
            panic!("expected an install toggle");
        };
        let cmd = page.update(VersionManagerMsg::ToggleInstall(record));
        let calls = cmd.invocations();
        assert_eq!(calls[0].name(), "install");
        assert_eq!(calls[0].params(), json!({"language": "python", "version": "3.11.0"}));
    }

    #[test]
    fn test_double_toggle_while_pending_is_ignored() {
        let mut page = page();
        let item = VersionItem {
            version: "3.12.0".into(),
            install_status: false,
            use_status: false,
        };
        assert_eq!(page.update(VersionManagerMsg::ToggleInstall(item.clone())).invocations().len(), 1);
        assert!(page.update(VersionManagerMsg::ToggleInstall(item)).invocations().is_empty());
        assert!(page.table().is_empty());
    }
}
