//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: Gateway requests running as tasks
//! - [`Driver`]: Platform-specific I/O

use std::sync::Arc;

use keeper_client::SecretGateway;

use crate::{App, AppAction, AppConfig, AppEvent, Bridge, Driver};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `G`: Backend gateway
pub struct Runtime<D, G>
where
    D: Driver,
    G: SecretGateway + 'static,
{
    driver: D,
    app: App,
    bridge: Bridge<G>,
}

impl<D, G> Runtime<D, G>
where
    D: Driver,
    G: SecretGateway + 'static,
{
    /// Create a new runtime with the given driver and gateway.
    pub fn new(driver: D, gateway: Arc<G>, config: AppConfig) -> Self {
        let app = App::new(config);
        let bridge = Bridge::new(gateway);
        Self { driver, app, bridge }
    }

    /// Queue a navigation before the loop starts (e.g. a link passed on the
    /// command line).
    pub fn open(&mut self, location: &str) -> Result<bool, D::Error> {
        self.dispatch(AppEvent::Navigate { location: location.to_string() })
    }

    /// Run the main event loop.
    ///
    /// Each cycle waits for whichever comes first: an input event from the
    /// driver or a completed gateway request. The event goes through the App
    /// and the resulting actions are executed until the App asks to quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<App, D::Error> {
        self.driver.render(&self.app)?;

        loop {
            let event = tokio::select! {
                polled = self.driver.poll_event() => polled?,
                completion = self.bridge.next_event() => completion,
            };

            if let Some(event) = event
                && self.dispatch(event)?
            {
                break;
            }
        }

        self.driver.stop();
        Ok(self.app)
    }

    /// Feed one event through the App and execute its actions.
    ///
    /// Returns `true` if the application should quit.
    fn dispatch(&mut self, event: AppEvent) -> Result<bool, D::Error> {
        let actions = self.app.handle(event);
        self.process_actions(actions)
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => return Ok(true),
                AppAction::CreateSecret { .. } | AppAction::FetchSecret { .. } => {
                    self.bridge.process_app_action(action);
                },
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
