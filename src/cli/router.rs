//! Router and root layout
//!
//! Maps a path to exactly one mounted page. `/` redirects to the first
//! language's version manager.

use crate::cli::pages::{
    LegacyMsg, LegacyPage, NotFoundPage, SettingsPage, VersionManagerMsg, VersionManagerPage,
};
use crate::cli::tea::{Cmd, Model};
use crate::config::Settings;
use crate::core::Language;

const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    VersionManager(Language),
    Legacy(Language),
    Settings,
    NotFound(String),
}

impl Route {
    /// Canonical path of this route
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::VersionManager(lang) => format!("/{lang}"),
            Self::Legacy(lang) => format!("/{lang}/classic"),
            Self::Settings => "/settings".to_string(),
            Self::NotFound(path) => path.clone(),
        }
    }
}

/// Redirect target for `path`, if any
fn redirect(path: &str) -> Option<String> {
    match path {
        "" | "/" => Some(format!("/{}", Language::Python)),
        _ if path.len() > 1 && path.ends_with('/') => Some(path.trim_end_matches('/').to_string()),
        _ => None,
    }
}

fn language_route(segment: &str) -> Option<Language> {
    Language::all()
        .iter()
        .copied()
        .find(|lang| lang.as_str() == segment)
}

/// Follow redirects to a fixed point and map the final path to a route
#[must_use]
pub fn resolve(path: &str) -> Route {
    let mut current = path.trim().to_string();
    for _ in 0..MAX_REDIRECTS {
        match redirect(&current) {
            Some(next) if next != current => current = next,
            _ => break,
        }
    }

    let segments: Vec<&str> = current.trim_start_matches('/').split('/').collect();
    match segments.as_slice() {
        ["settings"] => Route::Settings,
        [lang] => language_route(lang).map_or_else(|| Route::NotFound(current.clone()), Route::VersionManager),
        [lang, "classic"] => {
            language_route(lang).map_or_else(|| Route::NotFound(current.clone()), Route::Legacy)
        }
        _ => Route::NotFound(current.clone()),
    }
}

/// The mounted page
pub enum Page {
    VersionManager(VersionManagerPage),
    Legacy(LegacyPage),
    Settings(SettingsPage),
    NotFound(NotFoundPage),
}

#[derive(Debug)]
pub enum LayoutMsg {
    Navigate(String),
    /// Message for the version manager mounted as `mount`
    VersionManager(u64, VersionManagerMsg),
    /// Message for the classic page mounted as `mount`
    Legacy(u64, LegacyMsg),
}

/// Root model: the router plus whichever page it mounted
pub struct Layout {
    settings: Settings,
    route: Route,
    page: Page,
    /// Bumped on every navigation so replies for an unmounted page are dropped
    mount: u64,
}

impl Layout {
    #[must_use]
    pub fn new(settings: Settings, path: &str) -> Self {
        let route = resolve(path);
        let page = Self::build(&settings, &route);
        Self {
            settings,
            route,
            page,
            mount: 0,
        }
    }

    fn build(settings: &Settings, route: &Route) -> Page {
        match route {
            Route::VersionManager(lang) => {
                Page::VersionManager(VersionManagerPage::new(*lang, settings.frontend.page_size))
            }
            Route::Legacy(lang) => Page::Legacy(LegacyPage::new(*lang)),
            Route::Settings => Page::Settings(SettingsPage::new(settings.clone())),
            Route::NotFound(path) => Page::NotFound(NotFoundPage::new(path.clone())),
        }
    }

    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    fn mount_cmd(&self) -> Cmd<LayoutMsg> {
        let mount = self.mount;
        match &self.page {
            Page::VersionManager(page) => page
                .init()
                .map(move |msg| LayoutMsg::VersionManager(mount, msg)),
            Page::Legacy(page) => page.init().map(move |msg| LayoutMsg::Legacy(mount, msg)),
            Page::Settings(_) | Page::NotFound(_) => Cmd::none(),
        }
    }
}

impl Model for Layout {
    type Msg = LayoutMsg;

    fn init(&self) -> Cmd<LayoutMsg> {
        self.mount_cmd()
    }

    fn update(&mut self, msg: LayoutMsg) -> Cmd<LayoutMsg> {
        match msg {
            LayoutMsg::Navigate(path) => {
                let route = resolve(&path);
                if route == self.route {
                    return Cmd::none();
                }
                tracing::debug!("navigate {} -> {}", self.route.path(), route.path());
                self.mount += 1;
                self.page = Self::build(&self.settings, &route);
                self.route = route;
                self.mount_cmd()
            }
            LayoutMsg::VersionManager(mount, msg) => {
                let current = self.mount;
                match &mut self.page {
                    Page::VersionManager(page) if mount == current => page
                        .update(msg)
                        .map(move |msg| LayoutMsg::VersionManager(current, msg)),
                    _ => Cmd::none(),
                }
            }
            LayoutMsg::Legacy(mount, msg) => {
                let current = self.mount;
                match &mut self.page {
                    Page::Legacy(page) if mount == current => page
                        .update(msg)
                        .map(move |msg| LayoutMsg::Legacy(current, msg)),
                    _ => Cmd::none(),
                }
            }
        }
    }

    fn view(&self) -> String {
        match &self.page {
            Page::VersionManager(page) => page.view(),
            Page::Legacy(page) => page.view(),
            Page::Settings(page) => page.view(),
            Page::NotFound(page) => page.view(),
        }
    }
}

impl Layout {
    /// Wrap a message for the currently mounted version manager
    #[must_use]
    pub fn version_manager(&self, msg: VersionManagerMsg) -> LayoutMsg {
        LayoutMsg::VersionManager(self.mount, msg)
    }

    /// Wrap a message for the currently mounted classic page
    #[must_use]
    pub fn legacy(&self, msg: LegacyMsg) -> LayoutMsg {
        LayoutMsg::Legacy(self.mount, msg)
    }
}
