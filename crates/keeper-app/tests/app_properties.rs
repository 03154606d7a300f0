//! Property-based tests for App state machine.
//!
//! Tests verify that invariants hold under arbitrary event sequences:
//! - at most one creation request is outstanding
//! - fetches are only requested for the view on screen, once per view
//! - a view exposes a secret exactly when it is revealed

use std::collections::HashSet;

use keeper_app::{App, AppAction, AppConfig, AppEvent, KeyInput, Page, Route};
use keeper_client::{
    CreatedSecret, GatewayError, RevealPhase, RevealedSecret, SecretKey, SubmissionId, ViewId,
};
use keeper_proto::link;
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        4 => "[a-zA-Z !]".prop_map(|s| KeyInput::Char(s.chars().next().unwrap_or('a'))),
        2 => Just(KeyInput::Enter),
        1 => Just(KeyInput::Tab),
        1 => Just(KeyInput::BackTab),
        1 => Just(KeyInput::Backspace),
        1 => Just(KeyInput::Left),
        1 => Just(KeyInput::Right),
        1 => Just(KeyInput::Esc),
    ]
}

/// Generate random app events.
fn event_strategy() -> impl Strategy<Value = AppEvent> {
    prop_oneof![
        1 => Just(AppEvent::Tick),
        1 => (1u16..200, 1u16..100).prop_map(|(c, r)| AppEvent::Resize(c, r)),
        8 => key_strategy().prop_map(AppEvent::Key),
        2 => prop_oneof![
            Just("/"),
            Just("/secrets/abc123"),
            Just("/secrets/abc123?withSecretPhrase=true"),
            Just("https://host/secrets/xyz"),
            Just("/unknown"),
        ]
        .prop_map(|location| AppEvent::Navigate { location: location.to_string() }),
        2 => (0u64..4, any::<bool>()).prop_map(|(id, ok)| AppEvent::SecretCreated {
            submission: SubmissionId(id),
            result: if ok {
                Ok(CreatedSecret { key: SecretKey::parse("k1").unwrap(), requires_passphrase: ok })
            } else {
                Err(GatewayError::unreachable("down"))
            },
        }),
        2 => (0u64..6, any::<bool>()).prop_map(|(id, ok)| AppEvent::SecretFetched {
            view: ViewId(id),
            key: SecretKey::parse("abc123").unwrap(),
            result: if ok { Ok(RevealedSecret::new("hello")) } else { Err(GatewayError::NotFound) },
        }),
    ]
}

fn current_view(app: &App) -> Option<ViewId> {
    match app.page() {
        Page::ViewSecret(view) => Some(view.flow().view()),
        Page::NewSecret | Page::NotFound { .. } => None,
    }
}

proptest! {
    #[test]
    fn prop_app_invariants_hold(events in prop::collection::vec(event_strategy(), 0..64)) {
        let mut app = App::new(AppConfig { origin: "https://host".into(), distinguish_failures: false });
        let mut fetched_views = HashSet::new();

        for event in events {
            let was_submitting = app.is_submitting();
            let actions = app.handle(event);

            let creates = actions.iter().filter(|a| matches!(a, AppAction::CreateSecret { .. })).count();
            prop_assert!(creates <= 1);
            if creates == 1 {
                prop_assert!(!was_submitting);
                prop_assert!(app.is_submitting());
            }

            for action in &actions {
                if let AppAction::FetchSecret { view, .. } = action {
                    prop_assert_eq!(Some(*view), current_view(&app));
                    prop_assert!(fetched_views.insert(*view), "view fetched twice");
                }
            }

            if let Page::ViewSecret(view) = app.page() {
                prop_assert_eq!(
                    view.flow().secret().is_some(),
                    view.phase() == RevealPhase::Revealed
                );
            }
        }
    }

    #[test]
    fn prop_interrupt_always_quits(events in prop::collection::vec(event_strategy(), 0..32)) {
        let mut app = App::new(AppConfig::default());
        for event in events {
            app.handle(event);
        }
        prop_assert_eq!(app.handle(AppEvent::Key(KeyInput::Interrupt)), vec![AppAction::Quit]);
    }

    #[test]
    fn prop_share_link_routes_to_its_key(
        raw in "[A-Za-z0-9._~-]{1,40}",
        requires_passphrase in any::<bool>(),
    ) {
        // Every key the parser accepts must survive the trip through a link.
        if let Ok(key) = SecretKey::parse(raw) {
            let url = link::compose("https://host", &key, requires_passphrase);
            prop_assert_eq!(Route::parse(&url), Route::ViewSecret { key, requires_passphrase });
        }
    }
}
