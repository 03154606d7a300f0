//! Bridge and Runtime tests against an in-memory gateway.
//!
//! The gateway answers from a fixed table. Tests drive the App by hand,
//! route its gateway actions through the Bridge and feed completions back.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use keeper_app::{App, AppAction, AppConfig, AppEvent, Bridge, KeyInput, Page};
use keeper_client::{
    CreateParams, CreatedSecret, GatewayError, Passphrase, RevealPhase, RevealedSecret,
    SecretGateway, SecretKey,
};

#[derive(Default)]
struct TableGateway {
    secrets: HashMap<String, String>,
    creates: AtomicUsize,
    fetches: AtomicUsize,
}

impl SecretGateway for TableGateway {
    async fn create_secret(&self, params: &CreateParams) -> Result<CreatedSecret, GatewayError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(CreatedSecret {
            key: SecretKey::parse("created1").unwrap(),
            requires_passphrase: params.passphrase().is_some(),
        })
    }

    async fn fetch_secret(
        &self,
        key: &SecretKey,
        _passphrase: Option<&Passphrase>,
    ) -> Result<RevealedSecret, GatewayError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.secrets
            .get(key.as_str())
            .map(|message| RevealedSecret::new(message.clone()))
            .ok_or(GatewayError::NotFound)
    }
}

/// Run gateway actions through the bridge and apply every completion.
async fn settle(app: &mut App, bridge: &mut Bridge<TableGateway>, actions: Vec<AppAction>) {
    let mut pending = actions;
    loop {
        for action in std::mem::take(&mut pending) {
            bridge.process_app_action(action);
        }
        if bridge.in_flight() == 0 {
            break;
        }
        if let Some(event) = bridge.next_event().await {
            pending = app.handle(event);
        }
    }
}

fn app() -> App {
    App::new(AppConfig { origin: "https://host".into(), distinguish_failures: false })
}

#[tokio::test]
async fn create_round_trip_opens_share_dialog() {
    let mut app = app();
    let mut bridge = Bridge::new(Arc::new(TableGateway::default()));

    for ch in "hello world".chars() {
        app.handle(AppEvent::Key(KeyInput::Char(ch)));
    }
    let actions = app.handle(AppEvent::Key(KeyInput::Enter));
    settle(&mut app, &mut bridge, actions).await;

    assert_eq!(
        app.share_dialog().map(|link| link.url().to_string()),
        Some("https://host/secrets/created1".to_string())
    );
    assert_eq!(bridge.gateway().creates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn view_reveals_stored_secret() {
    let gateway = TableGateway {
        secrets: HashMap::from([("abc123".to_string(), "hello world".to_string())]),
        ..TableGateway::default()
    };
    let mut app = app();
    let mut bridge = Bridge::new(Arc::new(gateway));

    let actions = app.navigate("/secrets/abc123");
    settle(&mut app, &mut bridge, actions).await;

    let Page::ViewSecret(view) = app.page() else { panic!("expected view page") };
    assert_eq!(view.phase(), RevealPhase::Revealed);
    assert_eq!(view.flow().secret().map(RevealedSecret::message), Some("hello world"));

    // Re-rendering never fetches again.
    let actions = app.handle(AppEvent::Resize(100, 40));
    assert_eq!(actions, vec![AppAction::Render]);
    assert_eq!(bridge.gateway().fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn switching_views_discards_old_result() {
    let gateway = TableGateway {
        secrets: HashMap::from([("first".to_string(), "one".to_string())]),
        ..TableGateway::default()
    };
    let mut app = app();
    let mut bridge = Bridge::new(Arc::new(gateway));

    let stale = app.navigate("/secrets/first");
    let current = app.navigate("/secrets/second");
    let mut actions = stale;
    actions.extend(current);
    settle(&mut app, &mut bridge, actions).await;

    let Page::ViewSecret(view) = app.page() else { panic!("expected view page") };
    assert_eq!(view.flow().key().as_str(), "second");
    assert_eq!(view.phase(), RevealPhase::NotFound);
    assert!(view.flow().secret().is_none());
}

/// Gateway whose first create call panics; later calls succeed.
#[derive(Default)]
struct PanickingGateway {
    creates: AtomicUsize,
}

impl SecretGateway for PanickingGateway {
    async fn create_secret(&self, _params: &CreateParams) -> Result<CreatedSecret, GatewayError> {
        if self.creates.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("gateway bug");
        }
        Ok(CreatedSecret { key: SecretKey::parse("created2").unwrap(), requires_passphrase: false })
    }

    async fn fetch_secret(
        &self,
        _key: &SecretKey,
        _passphrase: Option<&Passphrase>,
    ) -> Result<RevealedSecret, GatewayError> {
        panic!("gateway bug");
    }
}

#[tokio::test]
async fn panicked_request_still_completes() {
    let mut app = app();
    let mut bridge = Bridge::new(Arc::new(PanickingGateway::default()));

    for ch in "hello world".chars() {
        app.handle(AppEvent::Key(KeyInput::Char(ch)));
    }
    let actions = app.handle(AppEvent::Key(KeyInput::Enter));
    for action in actions {
        bridge.process_app_action(action);
    }

    let Some(event) = bridge.next_event().await else { panic!("bridge closed") };
    let AppEvent::SecretCreated { result: Err(err), .. } = &event else {
        panic!("expected failed creation, got {event:?}")
    };
    assert!(err.is_transient());
    app.handle(event);
    assert_eq!(bridge.in_flight(), 0);

    // The failed submission no longer blocks the next one.
    let actions = app.handle(AppEvent::Key(KeyInput::Enter));
    assert!(actions.iter().any(|a| matches!(a, AppAction::CreateSecret { .. })));
    for action in actions {
        bridge.process_app_action(action);
    }
    let Some(event) = bridge.next_event().await else { panic!("bridge closed") };
    app.handle(event);
    assert_eq!(
        app.share_dialog().map(|link| link.url().to_string()),
        Some("https://host/secrets/created2".to_string())
    );
}

#[tokio::test]
async fn panicked_fetch_reports_load_failure() {
    let mut app = app();
    let mut bridge = Bridge::new(Arc::new(PanickingGateway::default()));

    for action in app.navigate("/secrets/abc123") {
        bridge.process_app_action(action);
    }
    let Some(event) = bridge.next_event().await else { panic!("bridge closed") };
    app.handle(event);

    let Page::ViewSecret(view) = app.page() else { panic!("expected view page") };
    assert_eq!(view.phase(), RevealPhase::NotFound);
    assert_eq!(bridge.in_flight(), 0);
}
