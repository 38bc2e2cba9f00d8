//! Version table: rows of version records with install and use toggles
//!
//! The same row model backs the `comfy-table` text output and the `ratatui`
//! widget. User intent leaves the component as a [`TableAction`].

use std::collections::HashSet;

use comfy_table::Color as TextColor;
use ratatui::layout::Constraint;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Cell, Row, Table};

use crate::cli::{style, tables};
use crate::core::VersionItem;

const HEADERS: [&str; 4] = ["Version", "Installed", "Active", "Action"];

/// What the user asked the table to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    Search(String),
    ToggleInstall(VersionItem),
    ToggleUse(VersionItem),
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRow {
    pub item: VersionItem,
    /// State of the install switch, mirrors `install_status`
    pub install_toggle: bool,
    /// State of the use switch, mirrors `use_status`
    pub use_toggle: bool,
    /// A mutation for this version is in flight
    pub busy: bool,
}

impl VersionRow {
    /// Label of the action the install switch would trigger
    #[must_use]
    pub const fn action_label(&self) -> &'static str {
        match (self.busy, self.install_toggle) {
            (true, _) => "working…",
            (false, true) => "uninstall",
            (false, false) => "install",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VersionTable {
    rows: Vec<VersionRow>,
}

impl VersionTable {
    #[must_use]
    pub fn new(items: &[VersionItem], busy: &HashSet<String>) -> Self {
        let rows = items
            .iter()
            .map(|item| VersionRow {
                item: item.clone(),
                install_toggle: item.install_status,
                use_toggle: item.use_status,
                busy: busy.contains(&item.version),
            })
            .collect();
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[VersionRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Flip the install switch of row `index`
    #[must_use]
    pub fn toggle_install(&self, index: usize) -> Option<TableAction> {
        self.rows
            .get(index)
            .filter(|row| !row.busy)
            .map(|row| TableAction::ToggleInstall(row.item.clone()))
    }

    /// Flip the use switch of row `index`
    #[must_use]
    pub fn toggle_use(&self, index: usize) -> Option<TableAction> {
        self.rows
            .get(index)
            .filter(|row| !row.busy)
            .map(|row| TableAction::ToggleUse(row.item.clone()))
    }

    /// Plain/colored text rendering for the CLI
    #[must_use]
    pub fn render_text(&self) -> String {
        if self.rows.is_empty() {
            return style::dim("No versions found");
        }

        let mut table = tables::table_with_columns(&HEADERS);
        for row in &self.rows {
            let installed = if row.install_toggle { "yes" } else { "no" };
            let active = if row.use_toggle { "●" } else { "" };
            tables::add_colored_row(
                &mut table,
                &[
                    (
                        row.item.version.as_str(),
                        row.install_toggle.then_some(TextColor::Green),
                    ),
                    (installed, None),
                    (active, Some(TextColor::Cyan)),
                    (row.action_label(), Some(TextColor::DarkGrey)),
                ],
            );
        }
        table.to_string()
    }

    /// Terminal widget for the TUI
    #[must_use]
    pub fn widget(&self) -> Table<'static> {
        let header = Row::new(HEADERS.map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().fg(Color::Cyan));

        let rows: Vec<Row<'static>> = self
            .rows
            .iter()
            .map(|row| {
                let switch = |on: bool| if on { "[x]" } else { "[ ]" };
                let version_style = if row.use_toggle {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(row.item.version.clone()).style(version_style),
                    Cell::from(switch(row.install_toggle)),
                    Cell::from(switch(row.use_toggle)),
                    Cell::from(row.action_label())
                        .style(Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();

        Table::new(
            rows,
            [
                Constraint::Min(14),
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .row_highlight_style(Style::default().bg(Color::Rgb(41, 46, 66)))
    }
}
