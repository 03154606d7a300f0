//! Modal dialogs.

use keeper_app::RevealView;
use keeper_client::ShareLink;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{cells, masked};

const SHARE_HEIGHT: u16 = 9;
const PASSPHRASE_HEIGHT: u16 = 7;
const DIALOG_WIDTH: u16 = 64;

/// "Secret created" dialog with the share link.
pub fn render_share(frame: &mut Frame, link: &ShareLink, area: Rect) {
    let area = centered(area, DIALOG_WIDTH, SHARE_HEIGHT);
    let note = if link.requires_passphrase() {
        "The recipient will be asked for the passphrase."
    } else {
        "Anyone with the link can read it once."
    };

    let lines = vec![
        Line::from("Share this link:"),
        Line::from(Span::styled(
            link.url().to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(note, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(Span::styled("Enter/Esc: close", Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Secret created ");
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}

/// Passphrase prompt of a gated view. Cannot be dismissed empty; Esc leaves
/// the view instead.
pub fn render_passphrase(frame: &mut Frame, view: &RevealView, area: Rect) {
    let area = centered(area, DIALOG_WIDTH, PASSPHRASE_HEIGHT);
    let input = view.passphrase_input();

    let hint = view.hint().map_or_else(
        || Line::from(Span::styled("Enter: unlock  Esc: back", Style::default().fg(Color::DarkGray))),
        |hint| Line::from(Span::styled(hint.to_string(), Style::default().fg(Color::Red))),
    );
    let lines = vec![
        Line::from("This secret is protected by a passphrase."),
        Line::from(""),
        Line::from(format!("> {}", masked(input.char_count()))),
        Line::from(""),
        hint,
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Passphrase required ");
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);

    // Border, then "> " prefix.
    let cursor_x = area.x.saturating_add(3).saturating_add(cells(input.cursor()));
    let max_x = area.x.saturating_add(area.width).saturating_sub(2);
    frame.set_cursor_position((cursor_x.min(max_x), area.y.saturating_add(3)));
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
