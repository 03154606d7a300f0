//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into a frame.

mod dialogs;
mod form;
mod reveal;
mod status;

use keeper_app::Page;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::App;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const TITLE_HEIGHT: u16 = 1;
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [title_area, main_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_title(frame, app, *title_area);

    match app.page() {
        Page::NewSecret => form::render(frame, app.form(), *main_area),
        Page::ViewSecret(view) => {
            reveal::render(frame, view, app.config().distinguish_failures, *main_area);
        },
        Page::NotFound { location } => reveal::render_unknown(frame, location, *main_area),
    }

    status::render(frame, app, *status_area);

    if let Some(link) = app.share_dialog() {
        dialogs::render_share(frame, link, *main_area);
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let page = match app.page() {
        Page::NewSecret => "New secret",
        Page::ViewSecret(_) => "View secret",
        Page::NotFound { .. } => "Page not found",
    };

    let line = Line::from(vec![
        Span::styled(" Keeper ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(format!("| {page}"), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Cell offset for `count` characters, saturating at `u16::MAX`.
fn cells(count: usize) -> u16 {
    u16::try_from(count).unwrap_or(u16::MAX)
}

/// `count` mask characters for hidden input.
fn masked(count: usize) -> String {
    "*".repeat(count)
}
