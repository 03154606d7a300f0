//! Creation form
//!
//! Message, lifetime and passphrase fields with their validation errors and
//! the failure banner of the last submission.

use keeper_app::{FormField, SecretForm, TextInput};
use keeper_proto::limits::{MESSAGE_MAX_CHARS, PASSPHRASE_MAX_CHARS};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{cells, masked};

const FIELD_HEIGHT: u16 = 3;
const ERROR_HEIGHT: u16 = 1;
const BORDER: u16 = 1;

/// Render the creation form.
pub fn render(frame: &mut Frame, form: &SecretForm, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(ERROR_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(ERROR_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(ERROR_HEIGHT),
            Constraint::Min(1),
        ])
        .split(area);

    let [message_area, message_errors, ttl_area, ttl_errors, pass_area, pass_errors, banner_area] =
        chunks.as_ref()
    else {
        return;
    };

    let message_title =
        format!(" Message ({}/{MESSAGE_MAX_CHARS}) ", form.message().char_count());
    render_text(frame, form, FormField::Message, &message_title, *message_area);
    render_errors(frame, form, FormField::Message, *message_errors);

    render_ttl(frame, form, *ttl_area);
    render_errors(frame, form, FormField::Ttl, *ttl_errors);

    let pass_title = format!(
        " Passphrase, optional ({}/{PASSPHRASE_MAX_CHARS}) ",
        form.passphrase().char_count()
    );
    render_text(frame, form, FormField::Passphrase, &pass_title, *pass_area);
    render_errors(frame, form, FormField::Passphrase, *pass_errors);

    render_banner(frame, form, *banner_area);
}

fn field_block(form: &SecretForm, field: FormField, title: &str) -> Block<'static> {
    let border = if form.focus() == field {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default().borders(Borders::ALL).border_style(border).title(title.to_string())
}

fn render_text(frame: &mut Frame, form: &SecretForm, field: FormField, title: &str, area: Rect) {
    let input: &TextInput = match field {
        FormField::Passphrase => form.passphrase(),
        FormField::Message | FormField::Ttl => form.message(),
    };
    let shown = match field {
        FormField::Passphrase => masked(input.char_count()),
        FormField::Message | FormField::Ttl => input.text().to_string(),
    };

    // Keep the cursor in view for long messages.
    let inner_width = usize::from(area.width.saturating_sub(2 * BORDER).max(1));
    let scroll = input.cursor().saturating_sub(inner_width - 1);
    let visible: String = shown.chars().skip(scroll).collect();

    let paragraph = Paragraph::new(visible).block(field_block(form, field, title));
    frame.render_widget(paragraph, area);

    if form.focus() == field {
        let offset = cells(input.cursor() - scroll);
        let max_x = area.x.saturating_add(area.width).saturating_sub(2 * BORDER);
        let cursor_x = area.x.saturating_add(BORDER).saturating_add(offset).min(max_x);
        frame.set_cursor_position((cursor_x, area.y.saturating_add(BORDER)));
    }
}

fn render_ttl(frame: &mut Frame, form: &SecretForm, area: Rect) {
    let focused = form.focus() == FormField::Ttl;
    let arrow = if focused { Style::default().fg(Color::Yellow) } else { Style::default() };

    let line = Line::from(vec![
        Span::styled("< ", arrow),
        Span::styled(form.ttl().label(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" >", arrow),
    ]);
    let paragraph = Paragraph::new(line).block(field_block(form, FormField::Ttl, " Expires "));
    frame.render_widget(paragraph, area);
}

fn render_errors(frame: &mut Frame, form: &SecretForm, field: FormField, area: Rect) {
    let text = form.errors_for(field).map(ToString::to_string).collect::<Vec<_>>().join("; ");
    if text.is_empty() {
        return;
    }
    let paragraph = Paragraph::new(format!(" {text}")).style(Style::default().fg(Color::Red));
    frame.render_widget(paragraph, area);
}

fn render_banner(frame: &mut Frame, form: &SecretForm, area: Rect) {
    let Some(failure) = form.failure() else {
        return;
    };
    let paragraph = Paragraph::new(format!(" {failure}"))
        .style(Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD));
    frame.render_widget(paragraph, area);
}
