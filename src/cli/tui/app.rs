use std::sync::Arc;

use crossterm::event::KeyCode;

use crate::bridge::CommandBridge;
use crate::cli::components::TableAction;
use crate::cli::pages::{LegacyMsg, VersionManagerMsg};
use crate::cli::router::{Layout, LayoutMsg, Page, Route};
use crate::cli::tea::{Notice, NoticeLevel, Program};
use crate::config::Settings;
use crate::core::Language;

/// Route shortcuts on the number keys
const ROUTE_KEYS: [(char, &str); 3] = [('1', "/python"), ('2', "/python/classic"), ('3', "/settings")];

pub struct App {
    program: Program<Layout>,
    /// Search line being edited, `None` when not in search mode
    pub input: Option<String>,
    /// Last notice from a page
    pub status: Option<Notice>,
    pub should_quit: bool,
    bridge_label: String,
}

impl App {
    /// Mount `path` and start its first fetch; needs a tokio runtime
    pub fn new(settings: Settings, bridge: Arc<dyn CommandBridge>, path: &str) -> Self {
        let bridge_label = bridge.describe();
        let mut program = Program::new(Layout::new(settings, path), bridge);
        program.start();
        Self {
            program,
            input: None,
            status: None,
            should_quit: false,
            bridge_label,
        }
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        self.program.model()
    }

    #[must_use]
    pub fn bridge_label(&self) -> &str {
        &self.bridge_label
    }

    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.program.in_flight()
    }

    /// Apply finished bridge calls
    pub fn tick(&mut self) {
        self.program.pump();
        self.collect_notices();
    }

    fn collect_notices(&mut self) {
        if let Some(last) = self.program.take_notices().pop() {
            if last.level == NoticeLevel::Error {
                tracing::warn!("{}", last.text);
            }
            self.status = Some(last);
        }
    }

    fn send(&mut self, msg: LayoutMsg) {
        self.program.send(msg);
        self.collect_notices();
    }

    fn navigate(&mut self, path: &str) {
        self.input = None;
        self.send(LayoutMsg::Navigate(path.to_string()));
    }

    /// Send a message to whichever page is mounted
    fn page_msg(&mut self, vm: VersionManagerMsg, legacy: Option<LegacyMsg>) {
        let layout = self.program.model();
        let msg = match layout.page() {
            Page::VersionManager(_) => Some(layout.version_manager(vm)),
            Page::Legacy(_) => legacy.map(|msg| layout.legacy(msg)),
            Page::Settings(_) | Page::NotFound(_) => None,
        };
        if let Some(msg) = msg {
            self.send(msg);
        }
    }

    /// Table action for the selected row of the mounted page
    fn selected_action(&self, use_toggle: bool) -> Option<TableAction> {
        let (table, selected) = match self.layout().page() {
            Page::VersionManager(page) => (page.table(), page.selected()),
            Page::Legacy(page) => (page.table(), page.selected()),
            Page::Settings(_) | Page::NotFound(_) => return None,
        };
        if use_toggle {
            table.toggle_use(selected)
        } else {
            table.toggle_install(selected)
        }
    }

    fn apply_action(&mut self, action: TableAction) {
        let legacy = match &action {
            TableAction::ToggleInstall(item) => Some(LegacyMsg::ToggleInstall(item.clone())),
            TableAction::ToggleUse(item) => Some(LegacyMsg::ToggleUse(item.clone())),
            TableAction::Search(_) => None,
        };
        self.page_msg(action.into(), legacy);
    }

    fn current_keyword(&self) -> Option<String> {
        match self.layout().page() {
            Page::VersionManager(page) => Some(page.payload().key_word.clone()),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        if let Some(input) = self.input.as_mut() {
            match key {
                KeyCode::Esc => self.input = None,
                KeyCode::Enter => {
                    let keyword = input.trim().to_string();
                    self.input = None;
                    self.apply_action(TableAction::Search(keyword));
                }
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) if ROUTE_KEYS.iter().any(|(k, _)| *k == c) => {
                if let Some((_, path)) = ROUTE_KEYS.iter().find(|(k, _)| *k == c) {
                    self.navigate(path);
                }
            }
            KeyCode::Char('/') => self.input = self.current_keyword(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.page_msg(VersionManagerMsg::SelectPrev, Some(LegacyMsg::SelectPrev));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.page_msg(VersionManagerMsg::SelectNext, Some(LegacyMsg::SelectNext));
            }
            KeyCode::Char('n') | KeyCode::Right => self.page_msg(VersionManagerMsg::NextPage, None),
            KeyCode::Char('p') | KeyCode::Left => self.page_msg(VersionManagerMsg::PrevPage, None),
            KeyCode::Char('r') => self.page_msg(VersionManagerMsg::Refresh, Some(LegacyMsg::Refresh)),
            KeyCode::Enter => {
                if let Some(action) = self.selected_action(false) {
                    self.apply_action(action);
                }
            }
            KeyCode::Char('u') => {
                if let Some(action) = self.selected_action(true) {
                    self.apply_action(action);
                }
            }
            _ => {}
        }
    }

    /// Title for the tab bar
    #[must_use]
    pub fn tabs(&self) -> (Vec<String>, Option<usize>) {
        let titles = vec![
            format!("1 {}", Language::Python.display_name()),
            "2 Classic".to_string(),
            "3 Settings".to_string(),
        ];
        let selected = match self.layout().route() {
            Route::VersionManager(_) => Some(0),
            Route::Legacy(_) => Some(1),
            Route::Settings => Some(2),
            Route::NotFound(_) => None,
        };
        (titles, selected)
    }
}
