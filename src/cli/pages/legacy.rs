//! Classic page: the full version list without paging or search

use std::collections::HashSet;

use serde_json::Value;

use super::Mutation;
use crate::bridge::{BridgeCommand, BridgeError, decode};
use crate::cli::components::VersionTable;
use crate::cli::style;
use crate::cli::tea::{Cmd, Model};
use crate::core::{Language, VersionItem};

#[derive(Debug)]
pub enum LegacyMsg {
    Mount,
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

#[derive(Debug)]
pub struct LegacyPage {
    language: Language,
    list: Vec<VersionItem>,
    latest_seq: u64,
    loading: bool,
    error: Option<BridgeError>,
    notice: Option<String>,
    pending: HashSet<String>,
    selected: usize,
}

impl LegacyPage {
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            list: Vec::new(),
            latest_seq: 0,
            loading: false,
            error: None,
            notice: None,
            pending: HashSet::new(),
            selected: 0,
        }
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn list(&self) -> &[VersionItem] {
        &self.list
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

    #[must_use]
    pub fn table(&self) -> VersionTable {
        VersionTable::new(&self.list, &self.pending)
    }

    fn fetch(&mut self) -> Cmd<LegacyMsg> {
        self.latest_seq += 1;
        self.loading = true;
        let seq = self.latest_seq;
        Cmd::invoke(BridgeCommand::list_all(self.language), move |result| {
            LegacyMsg::Listed { seq, result }
        })
    }

    fn mutate(&mut self, mutation: Mutation, version: String) -> Cmd<LegacyMsg> {
        if !self.pending.insert(version.clone()) {
            return Cmd::warning(format!("{version} is already being updated"));
        }
        self.error = None;
        self.notice = Some(mutation.progress_text(self.language, &version));
        Cmd::invoke(mutation.command(self.language, &version), move |result| {
            LegacyMsg::Mutated {
                mutation,
                version,
                result,
            }
        })
    }
}

impl Model for LegacyPage {
    type Msg = LegacyMsg;

    fn init(&self) -> Cmd<LegacyMsg> {
        Cmd::msg(LegacyMsg::Mount)
    }

    fn update(&mut self, msg: LegacyMsg) -> Cmd<LegacyMsg> {
        match msg {
            LegacyMsg::Mount | LegacyMsg::Refresh => {
                self.error = None;
                self.fetch()
            }
            LegacyMsg::ToggleInstall(item) => {
                self.mutate(Mutation::for_install_toggle(&item), item.version)
            }
            LegacyMsg::ToggleUse(item) => self.mutate(Mutation::Use, item.version),
            LegacyMsg::SelectNext => {
                if self.selected + 1 < self.list.len() {
                    self.selected += 1;
                }
                Cmd::none()
            }
            LegacyMsg::SelectPrev => {
                self.selected = self.selected.saturating_sub(1);
                Cmd::none()
            }
            LegacyMsg::Listed { seq, result } => {
                if seq != self.latest_seq {
                    return Cmd::none();
                }
                self.loading = false;
                match result.and_then(decode::<Vec<VersionItem>>) {
                    Ok(list) => {
                        self.list = list;
                        self.selected = self.selected.min(self.list.len().saturating_sub(1));
                    }
                    Err(e) => self.error = Some(e),
                }
                Cmd::none()
            }
            LegacyMsg::Mutated {
                mutation,
                version,
                result,
            } => {
                self.pending.remove(&version);
                let report = match result {
                    Ok(_) => {
                        let text = mutation.done_text(self.language, &version);
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
    }

    fn view(&self) -> String {
        let mut out = vec![style::header(&format!(
            "{} versions (classic)",
            self.language.display_name()
        ))];
        if let Some(error) = &self.error {
            out.push(style::error(&error.to_string()));
        }
        out.push(self.table().render_text());
        let installed = self.list.iter().filter(|v| v.install_status).count();
        out.push(style::dim(&format!(
            "{} versions · {installed} installed",
            self.list.len()
        )));
        out.join("\n")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mount_requests_flat_list() {
        let mut page = LegacyPage::new(Language::Python);
        let cmd = page.update(LegacyMsg::Mount);
        assert_eq!(cmd.invocations()[0].params(), json!({"language": "python"}));
    }

    #[test]
    fn test_flat_reply_replaces_list() {
        let mut page = LegacyPage::new(Language::Python);
        let _ = page.update(LegacyMsg::Mount);
        let _ = page.update(LegacyMsg::Listed {
            seq: 1,
            result: Ok(json!([
                {"version": "3.12.0", "install_status": true, "use_status": true},
                {"version": "3.11.0", "install_status": false}
            ])),
        });
        assert_eq!(page.list().len(), 2);
        assert!(page.view().contains("1 installed"));
    }

    #[test]
    fn test_use_toggle_refetches_once() {
        let mut page = LegacyPage::new(Language::Python);
        let item = VersionItem {
            version: "3.11.0".into(),
            install_status: true,
            use_status: false,
        };
        assert_eq!(page.update(LegacyMsg::ToggleUse(item)).invocations()[0].name(), "use_version");
        let cmd = page.update(LegacyMsg::Mutated {
            mutation: Mutation::Use,
            version: "3.11.0".into(),
            result: Ok(Value::Null),
        });
        assert_eq!(cmd.invocations().len(), 1);
        assert_eq!(page.notice(), Some("Now using Python 3.11.0"));
    }
}
