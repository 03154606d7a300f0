//! Secret view
//!
//! One screen per reveal phase. The gated phase is drawn as a passphrase
//! dialog over an empty view.

use keeper_app::RevealView;
use keeper_client::RevealPhase;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::dialogs;

/// Render a secret view.
pub fn render(frame: &mut Frame, view: &RevealView, distinguish_failures: bool, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(format!(" Secret {} ", view.flow().key()));

    match view.phase() {
        RevealPhase::Gated => {
            frame.render_widget(block, area);
            dialogs::render_passphrase(frame, view, area);
        },
        RevealPhase::Loading => {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "Loading secret...",
                Style::default().fg(Color::Yellow),
            )))
            .block(block);
            frame.render_widget(paragraph, area);
        },
        RevealPhase::Revealed => {
            let Some(secret) = view.flow().secret() else {
                return;
            };

            let mut lines: Vec<Line> = secret.message().lines().map(Line::from).collect();
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "This secret has been deleted and cannot be opened again.",
                Style::default().fg(Color::DarkGray),
            )));
            if let Some(created_at) = secret.created_at() {
                lines.push(meta_line("Created", created_at));
            }
            if let Some(expires_at) = secret.expires_at() {
                lines.push(meta_line("Expires", expires_at));
            }

            let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
            frame.render_widget(paragraph, area);
        },
        RevealPhase::NotFound => {
            let headline = view.failure_headline(distinguish_failures);
            let lines = vec![
                Line::from(Span::styled(
                    headline,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from("It may have expired, already been read, or the passphrase was wrong."),
            ];
            let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
            frame.render_widget(paragraph, area);
        },
    }
}

/// Render the page for a location that resolves to nothing.
pub fn render_unknown(frame: &mut Frame, location: &str, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Nothing here",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("{location} is not a page or a share link.")),
    ];
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

fn meta_line(label: &str, value: &str) -> Line<'static> {
    Line::from(Span::styled(format!("{label}: {value}"), Style::default().fg(Color::DarkGray)))
}

#[cfg(test)]
mod tests {
    use keeper_app::{App, AppConfig, AppEvent, KeyInput};
    use keeper_client::{GatewayError, RevealedSecret, SecretKey, ViewId};

    use crate::ui::test_support::{app, draw, type_text};

    fn fetched(app: &mut App, result: Result<RevealedSecret, GatewayError>) {
        app.handle(AppEvent::SecretFetched {
            view: ViewId(0),
            key: SecretKey::parse("abc123").unwrap(),
            result,
        });
    }

    #[test]
    fn loading_then_revealed() {
        let mut app = app();
        app.handle(AppEvent::Navigate { location: "/secrets/abc123".to_string() });
        assert!(draw(&app).contains("Loading secret..."));

        fetched(&mut app, Ok(RevealedSecret::new("hello world")));
        let screen = draw(&app);
        assert!(screen.contains("hello world"));
        assert!(screen.contains("cannot be opened again"));
    }

    #[test]
    fn gated_view_shows_prompt_not_secret() {
        let mut app = app();
        app.handle(AppEvent::Navigate {
            location: "https://host/secrets/abc123?withSecretPhrase=true".to_string(),
        });
        type_text(&mut app, "pw");

        let screen = draw(&app);
        assert!(screen.contains("Passphrase required"));
        assert!(screen.contains("**"));
        assert!(!screen.contains("Loading secret..."));
    }

    #[test]
    fn empty_passphrase_shows_hint() {
        let mut app = app();
        app.handle(AppEvent::Navigate {
            location: "/secrets/abc123?withSecretPhrase=true".to_string(),
        });
        app.handle(AppEvent::Key(KeyInput::Enter));

        assert!(draw(&app).contains("Enter the passphrase to continue"));
    }

    #[test]
    fn failures_collapse_unless_distinguished() {
        let failure = || GatewayError::RequestFailed { status: Some(502), reason: "bad gateway".into() };

        let mut plain = app();
        plain.handle(AppEvent::Navigate { location: "/secrets/abc123".to_string() });
        fetched(&mut plain, Err(failure()));
        let screen = draw(&plain);
        assert!(screen.contains("Secret not found"));
        assert!(!screen.contains("bad gateway"));

        let mut distinct =
            App::new(AppConfig { origin: "https://host".to_string(), distinguish_failures: true });
        distinct.handle(AppEvent::Navigate { location: "/secrets/abc123".to_string() });
        fetched(&mut distinct, Err(failure()));
        assert!(draw(&distinct).contains("Could not load the secret"));
    }
}
