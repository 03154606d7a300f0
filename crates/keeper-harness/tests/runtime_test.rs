//! Full runtime scenarios.
//!
//! Each test runs the production [`Runtime`] with a [`ScriptedDriver`] for
//! input and a [`SimBackend`] as the gateway, then inspects the App the
//! runtime hands back together with what the backend saw.

use std::{sync::Arc, time::Duration};

use keeper_app::{App, AppConfig, KeyInput, Page, Runtime};
use keeper_client::{FetchFailure, RevealPhase, Ttl};
use keeper_harness::{Fault, ScriptedDriver, SimBackend, SimRequest};

const ORIGIN: &str = "https://keeper.test";

fn config(distinguish_failures: bool) -> AppConfig {
    AppConfig { origin: ORIGIN.to_string(), distinguish_failures }
}

async fn run(driver: ScriptedDriver, backend: &SimBackend, config: AppConfig) -> App {
    let runtime = Runtime::new(driver, Arc::new(backend.clone()), config);
    tokio::time::timeout(Duration::from_secs(10), runtime.run())
        .await
        .expect("runtime finished in time")
        .expect("driver succeeded")
}

fn phase_of(app: &App) -> Option<RevealPhase> {
    match app.page() {
        Page::ViewSecret(view) => Some(view.phase()),
        _ => None,
    }
}

#[tokio::test]
async fn create_shows_share_link() {
    let backend = SimBackend::new(1);
    let driver = ScriptedDriver::new()
        .type_text("launch codes")
        .key(KeyInput::Tab)
        .key(KeyInput::Right)
        .key(KeyInput::Tab)
        .type_text("Open Sesame")
        .key(KeyInput::Enter)
        .wait_until("share dialog", |app| app.share_dialog().is_some());
    let handle = driver.handle();

    let app = run(driver, &backend, config(false)).await;

    let link = app.share_dialog().expect("dialog open");
    assert!(link.requires_passphrase());
    assert_eq!(link.url(), format!("{ORIGIN}/secrets/{}?withSecretPhrase=true", link.key()));
    assert!(app.form().message().is_empty(), "form resets after success");
    assert!(!app.is_submitting());

    assert_eq!(backend.requests(), vec![SimRequest::Create {
        ttl: Ttl::OneHour.hours(),
        secret_phrase: Some("open-sesame".to_string()),
        request_id: None,
    }]);
    assert!(handle.stopped());
    assert!(handle.render_count() > 1);
}

#[tokio::test]
async fn invalid_form_never_reaches_backend() {
    let backend = SimBackend::new(2);
    let driver = ScriptedDriver::new().type_text("hi").key(KeyInput::Enter);

    let app = run(driver, &backend, config(false)).await;

    assert!(!app.form().errors().is_empty());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn gated_link_reveals_with_passphrase() {
    let backend = SimBackend::new(3);
    let key = backend.insert("the eagle has landed", Ttl::Never, Some("open-sesame"));

    let driver = ScriptedDriver::new()
        .navigate(&format!("{ORIGIN}/secrets/{key}?withSecretPhrase=true"))
        .wait_until("gate", |app| phase_of(app) == Some(RevealPhase::Gated))
        .type_text("OPEN sesame")
        .key(KeyInput::Enter)
        .wait_until("revealed", |app| phase_of(app) == Some(RevealPhase::Revealed));

    let app = run(driver, &backend, config(false)).await;

    let Page::ViewSecret(view) = app.page() else {
        panic!("expected secret view, got {:?}", app.page());
    };
    assert_eq!(view.flow().secret().map(|s| s.message()), Some("the eagle has landed"));
    assert!(!backend.contains(key.as_str()), "secret burns on read");
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn gate_waits_for_input_before_fetching() {
    let backend = SimBackend::new(4);
    let key = backend.insert("patience", Ttl::Never, Some("pw-x"));

    let driver = ScriptedDriver::new()
        .navigate(&format!("/secrets/{key}?withSecretPhrase=true"))
        .wait_until("gate", |app| phase_of(app) == Some(RevealPhase::Gated))
        .key(KeyInput::Enter);

    let app = run(driver, &backend, config(false)).await;

    assert_eq!(phase_of(&app), Some(RevealPhase::Gated));
    assert!(backend.requests().is_empty());
    assert!(backend.contains(key.as_str()));
}

#[tokio::test]
async fn opened_link_is_gone_on_second_visit() {
    let backend = SimBackend::new(5);
    let key = backend.insert("once", Ttl::Never, None);
    let location = format!("/secrets/{key}");

    let driver = ScriptedDriver::new()
        .navigate(&location)
        .wait_until("revealed", |app| phase_of(app) == Some(RevealPhase::Revealed))
        .navigate(&location)
        .wait_until("second visit settled", |app| phase_of(app) == Some(RevealPhase::NotFound));

    let app = run(driver, &backend, config(false)).await;

    let Page::ViewSecret(view) = app.page() else {
        panic!("expected secret view");
    };
    assert_eq!(view.flow().failure(), Some(FetchFailure::Missing));
    assert_eq!(backend.requests().len(), 2);
}

#[tokio::test]
async fn transport_failure_headline_follows_config() {
    for (distinguish, headline) in
        [(false, "Secret not found"), (true, "Could not load the secret")]
    {
        let backend = SimBackend::new(6);
        let key = backend.insert("unlucky", Ttl::Never, None);
        backend.inject_fault(Fault::ServerError);

        let driver = ScriptedDriver::new()
            .navigate(&format!("/secrets/{key}"))
            .wait_until("failed", |app| phase_of(app) == Some(RevealPhase::NotFound));

        let app = run(driver, &backend, config(distinguish)).await;

        let Page::ViewSecret(view) = app.page() else {
            panic!("expected secret view");
        };
        assert_eq!(view.flow().failure(), Some(FetchFailure::RequestFailed));
        assert_eq!(view.failure_headline(app.config().distinguish_failures), headline);
        assert!(backend.contains(key.as_str()), "failed fetch leaves the secret");
    }
}

#[tokio::test]
async fn open_before_run_starts_at_link() {
    let backend = SimBackend::new(7);
    let key = backend.insert("from the command line", Ttl::Never, None);

    let driver = ScriptedDriver::new()
        .wait_until("revealed", |app| phase_of(app) == Some(RevealPhase::Revealed));
    let mut runtime = Runtime::new(driver, Arc::new(backend.clone()), config(false));
    assert!(!runtime.open(&format!("{ORIGIN}/secrets/{key}")).unwrap());

    let app = tokio::time::timeout(Duration::from_secs(10), runtime.run())
        .await
        .expect("runtime finished in time")
        .expect("driver succeeded");

    assert_eq!(phase_of(&app), Some(RevealPhase::Revealed));
}

#[tokio::test]
async fn unknown_location_goes_back_home() {
    let backend = SimBackend::new(8);
    let driver = ScriptedDriver::new()
        .navigate("/nowhere")
        .wait_until("not found page", |app| matches!(app.page(), Page::NotFound { .. }))
        .key(KeyInput::Esc)
        .wait_until("home", |app| matches!(app.page(), Page::NewSecret));

    let app = run(driver, &backend, config(false)).await;

    assert!(matches!(app.page(), Page::NewSecret));
}
