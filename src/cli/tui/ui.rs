//! Terminal drawing for the interactive UI

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, TableState, Tabs, Wrap},
};

use crate::bridge::BridgeError;
use crate::cli::router::Page;
use crate::cli::tea::NoticeLevel;
use crate::cli::tui::app::App;

mod colors {
    use ratatui::style::Color;

    pub const BG_DARK: Color = Color::Rgb(26, 27, 38);
    pub const FG_PRIMARY: Color = Color::Rgb(192, 202, 245);
    pub const FG_MUTED: Color = Color::Rgb(86, 95, 137);
    pub const ACCENT_BLUE: Color = Color::Rgb(122, 162, 247);
    pub const ACCENT_GREEN: Color = Color::Rgb(158, 206, 106);
    pub const ACCENT_YELLOW: Color = Color::Rgb(224, 175, 104);
    pub const ACCENT_RED: Color = Color::Rgb(247, 118, 142);
    pub const BORDER_NORMAL: Color = Color::Rgb(61, 66, 91);
}

fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors::BORDER_NORMAL))
        .title(Span::styled(
            title,
            Style::default()
                .fg(colors::ACCENT_BLUE)
                .add_modifier(Modifier::BOLD),
        ))
}

pub fn draw(f: &mut Frame, app: &App) {
    let bg_block = Block::default().style(Style::default().bg(colors::BG_DARK));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Page
            Constraint::Length(1), // Search line
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let [header, body, search, footer] = [chunks[0], chunks[1], chunks[2], chunks[3]];

    draw_tabs(f, header, app);
    draw_page(f, body, app);
    draw_search(f, search, app);
    draw_status_bar(f, footer, app);
}

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
    let (titles, selected) = app.tabs();
    let mut tabs = Tabs::new(titles)
        .style(Style::default().fg(colors::FG_MUTED))
        .highlight_style(
            Style::default()
                .fg(colors::ACCENT_BLUE)
                .add_modifier(Modifier::BOLD),
        )
        .block(styled_block(" langvm "));
    if let Some(index) = selected {
        tabs = tabs.select(index);
    }
    f.render_widget(tabs, area);
}

fn draw_page(f: &mut Frame, area: Rect, app: &App) {
    match app.layout().page() {
        Page::VersionManager(page) => {
            let title = format!(
                " {} · page {}/{} · {} versions ",
                page.payload().language.display_name(),
                page.payload().page + 1,
                page.page_count().max(1),
                page.data().total
            );
            draw_table(f, area, &title, &page.table(), page.selected(), page.error());
        }
        Page::Legacy(page) => {
            let title = format!(
                " {} (classic) · {} versions ",
                page.language().display_name(),
                page.list().len()
            );
            draw_table(f, area, &title, &page.table(), page.selected(), page.error());
        }
        Page::Settings(page) => {
            let text = Paragraph::new(page.body())
                .style(Style::default().fg(colors::FG_PRIMARY))
                .wrap(Wrap { trim: false })
                .block(styled_block(" Settings "));
            f.render_widget(text, area);
        }
        Page::NotFound(page) => {
            let text = Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("No page at {}", page.path()),
                    Style::default()
                        .fg(colors::ACCENT_RED)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from("Press 1, 2 or 3 to go somewhere else."),
            ])
            .block(styled_block(" Not found "));
            f.render_widget(text, area);
        }
    }
}

fn draw_table(
    f: &mut Frame,
    area: Rect,
    title: &str,
    table: &crate::cli::components::VersionTable,
    selected: usize,
    error: Option<&BridgeError>,
) {
    let (table_area, error_area) = if error.is_some() {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);
        (parts[1], Some(parts[0]))
    } else {
        (area, None)
    };

    if let (Some(error), Some(error_area)) = (error, error_area) {
        let line = Paragraph::new(Span::styled(
            format!(" ✗ {error}"),
            Style::default().fg(colors::ACCENT_RED),
        ));
        f.render_widget(line, error_area);
    }

    if table.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No versions found",
            Style::default().fg(colors::FG_MUTED),
        ))
        .block(styled_block(title));
        f.render_widget(empty, table_area);
        return;
    }

    let mut state = TableState::default().with_selected(Some(selected));
    f.render_stateful_widget(table.widget().block(styled_block(title)), table_area, &mut state);
}

fn draw_search(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.input {
        Some(input) => Line::from(vec![
            Span::styled(" / ", Style::default().fg(colors::ACCENT_YELLOW)),
            Span::styled(input.clone(), Style::default().fg(colors::FG_PRIMARY)),
            Span::styled("▏", Style::default().fg(colors::ACCENT_YELLOW)),
        ]),
        None => Line::from(Span::styled(
            " / search  ⏎ install/uninstall  u use  n/p page  r refresh  1-3 pages  q quit",
            Style::default().fg(colors::FG_MUTED),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" {} ", app.bridge_label()),
        Style::default().fg(colors::FG_MUTED),
    )];

    if app.in_flight() > 0 {
        spans.push(Span::styled(
            format!("⟳ {} running ", app.in_flight()),
            Style::default().fg(colors::ACCENT_YELLOW),
        ));
    }

    if let Some(notice) = &app.status {
        let color = match notice.level {
            NoticeLevel::Info => colors::ACCENT_BLUE,
            NoticeLevel::Success => colors::ACCENT_GREEN,
            NoticeLevel::Warning => colors::ACCENT_YELLOW,
            NoticeLevel::Error => colors::ACCENT_RED,
        };
        spans.push(Span::styled(notice.text.clone(), Style::default().fg(color)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
