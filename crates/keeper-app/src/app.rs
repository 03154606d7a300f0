//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the interactive
//! state of the application completely decoupled from I/O.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Resolves locations to pages and starts a fresh reveal view per visit.
//! - Owns the creation form and its [`CreationFlow`].
//! - Shows the share link in a dialog once a secret is created.
//! - Stores terminal dimensions to handle resize events.

use keeper_client::{
    CreatedSecret, CreationAction, CreationError, CreationEvent, CreationFlow, GatewayError,
    RevealAction, RevealEvent, RevealFlow, RevealPhase, RevealedSecret, SecretKey, ShareLink,
    SubmissionId, ViewId,
};
use tracing::{debug, info, warn};

use crate::{AppAction, AppEvent, KeyInput, Page, RevealView, Route, SecretForm};

/// Origin used for share links when none is configured.
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// App settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Origin share links are composed under.
    pub origin: String,
    /// Render transport failures differently from missing secrets.
    pub distinguish_failures: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { origin: DEFAULT_ORIGIN.to_string(), distinguish_failures: false }
    }
}

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    config: AppConfig,
    /// Current page and its per-view state.
    page: Page,
    /// Creation form. Survives navigation.
    form: SecretForm,
    creation: CreationFlow,
    /// "Secret created" dialog. `None` when closed.
    share_dialog: Option<ShareLink>,
    next_view: u64,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a new App on the creation page.
    pub fn new(config: AppConfig) -> Self {
        let creation = CreationFlow::new(config.origin.clone());
        Self {
            config,
            page: Page::NewSecret,
            form: SecretForm::new(),
            creation,
            share_dialog: None,
            next_view: 0,
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Navigate { location } => self.navigate(&location),
            AppEvent::SecretCreated { submission, result } => {
                self.handle_created(submission, result)
            },
            AppEvent::SecretFetched { view, key, result } => self.handle_fetched(view, key, result),
        }
    }

    /// Go to `location`.
    ///
    /// Every visit to a secret starts a new view; results for earlier views
    /// are ignored from then on.
    pub fn navigate(&mut self, location: &str) -> Vec<AppAction> {
        self.status_message = None;
        let mut actions = Vec::new();

        match Route::parse(location) {
            Route::NewSecret => self.page = Page::NewSecret,
            Route::ViewSecret { key, requires_passphrase } => {
                let view = ViewId(self.next_view);
                self.next_view += 1;

                let mut flow = RevealFlow::new(view, key, requires_passphrase);
                actions.extend(flow.begin().into_iter().map(Self::fetch_action));
                debug!(%view, requires_passphrase, "opened secret view");
                self.page = Page::ViewSecret(RevealView::new(flow));
            },
            Route::NotFound { location } => {
                debug!(%location, "unknown location");
                self.page = Page::NotFound { location };
            },
        }

        actions.push(AppAction::Render);
        actions
    }

    /// Submit the creation form.
    pub fn submit(&mut self) -> Vec<AppAction> {
        match self.creation.handle(CreationEvent::Submit(self.form.draft())) {
            Ok(actions) => {
                self.form.clear_feedback();
                self.status_message = Some("Creating secret...".to_string());
                self.apply_creation(actions)
            },
            Err(CreationError::Invalid(errors)) => {
                debug!(count = errors.len(), "form rejected");
                self.form.set_errors(errors);
                vec![AppAction::Render]
            },
            Err(CreationError::InFlight { submission }) => {
                debug!(%submission, "submission already in flight");
                self.status_message = Some("Still creating the previous secret...".to_string());
                vec![AppAction::Render]
            },
        }
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if key == KeyInput::Interrupt {
            return self.quit();
        }

        if self.share_dialog.is_some() {
            return match key {
                KeyInput::Esc | KeyInput::Enter => {
                    self.share_dialog = None;
                    vec![AppAction::Render]
                },
                _ => vec![],
            };
        }

        match &mut self.page {
            Page::NewSecret => match key {
                KeyInput::Esc => self.quit(),
                KeyInput::Enter => self.submit(),
                _ if self.form.handle_key(key) => vec![AppAction::Render],
                _ => vec![],
            },
            Page::ViewSecret(view) => match (view.phase(), key) {
                (_, KeyInput::Esc) | (RevealPhase::Revealed | RevealPhase::NotFound, KeyInput::Enter) => {
                    self.navigate("/")
                },
                (RevealPhase::Gated, KeyInput::Enter) => {
                    let raw = view.passphrase.take();
                    let actions = view.flow.handle(RevealEvent::SubmitPassphrase(raw));
                    view.hint = if view.flow.phase() == RevealPhase::Gated {
                        Some("Enter the passphrase to continue".to_string())
                    } else {
                        None
                    };

                    let mut out: Vec<AppAction> = actions.into_iter().map(Self::fetch_action).collect();
                    out.push(AppAction::Render);
                    out
                },
                (RevealPhase::Gated, key) if view.passphrase.apply(key) => vec![AppAction::Render],
                _ => vec![],
            },
            Page::NotFound { .. } => match key {
                KeyInput::Esc | KeyInput::Enter => self.navigate("/"),
                _ => vec![],
            },
        }
    }

    fn handle_created(
        &mut self,
        submission: SubmissionId,
        result: Result<CreatedSecret, GatewayError>,
    ) -> Vec<AppAction> {
        match self.creation.handle(CreationEvent::Completed { submission, result }) {
            Ok(actions) => self.apply_creation(actions),
            Err(err) => {
                warn!(%err, "unexpected creation error");
                vec![]
            },
        }
    }

    fn apply_creation(&mut self, actions: Vec<CreationAction>) -> Vec<AppAction> {
        let mut out = Vec::new();
        for action in actions {
            match action {
                CreationAction::Create { submission, params } => {
                    out.push(AppAction::CreateSecret { submission, params });
                },
                CreationAction::Share(link) => {
                    info!(requires_passphrase = link.requires_passphrase(), "share link ready");
                    self.status_message = None;
                    self.share_dialog = Some(link);
                },
                CreationAction::ResetForm => self.form.reset(),
                CreationAction::Failed { error } => {
                    self.status_message = None;
                    self.form.set_failure(format!("Could not create the secret: {error}"));
                },
            }
        }
        out.push(AppAction::Render);
        out
    }

    fn handle_fetched(
        &mut self,
        view: ViewId,
        key: SecretKey,
        result: Result<RevealedSecret, GatewayError>,
    ) -> Vec<AppAction> {
        let Page::ViewSecret(current) = &mut self.page else {
            warn!(%view, "fetch result arrived after leaving the view");
            return vec![];
        };

        current.flow.handle(RevealEvent::FetchCompleted { view, key, result });
        vec![AppAction::Render]
    }

    fn fetch_action(action: RevealAction) -> AppAction {
        let RevealAction::Fetch { view, key, passphrase } = action;
        AppAction::FetchSecret { view, key, passphrase }
    }

    /// App settings.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Current page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Creation form.
    pub fn form(&self) -> &SecretForm {
        &self.form
    }

    /// Whether a creation request is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.creation.is_submitting()
    }

    /// Share link shown in the "secret created" dialog. `None` when closed.
    pub fn share_dialog(&self) -> Option<&ShareLink> {
        self.share_dialog.as_ref()
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
