//! Status bar
//!
//! Shows the transient status message, or key hints for the current page.

use keeper_app::Page;
use keeper_client::RevealPhase;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::App;

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let content = match app.status_message() {
        Some(message) => Span::styled(message.to_string(), Style::default().fg(Color::Yellow)),
        None => Span::raw(hints(app)),
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::raw(" "), content]))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn hints(app: &App) -> &'static str {
    if app.share_dialog().is_some() {
        return "Enter/Esc: close  Ctrl+C: quit";
    }
    match app.page() {
        Page::NewSecret => "Tab: next field  </>: change expiry  Enter: create  Esc: quit",
        Page::ViewSecret(view) if view.phase() == RevealPhase::Gated => {
            "Enter: unlock  Esc: back  Ctrl+C: quit"
        },
        Page::ViewSecret(_) | Page::NotFound { .. } => "Enter/Esc: back  Ctrl+C: quit",
    }
}
