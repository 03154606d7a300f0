//! Gateway-to-Application translation layer.
//!
//! The [`Bridge`] executes the gateway-bound [`crate::AppAction`]s produced by
//! the [`crate::App`] and turns their results back into [`crate::AppEvent`]s.
//!
//! # Responsibilities
//!
//! - Spawns one task per request so the event loop never waits on the
//!   network.
//! - Tags every completion with the submission or view it was issued for;
//!   the App decides whether it is still relevant.
//! - Always delivers a completion. A request task that panics or is
//!   cancelled is reported as a failed request.

use std::sync::Arc;

use keeper_client::{GatewayError, SecretGateway};
use tokio::{sync::mpsc, task::JoinError};
use tracing::{debug, warn};

use crate::{AppAction, AppEvent};

/// Bridge between App actions and a [`SecretGateway`].
pub struct Bridge<G> {
    gateway: Arc<G>,
    completions_tx: mpsc::UnboundedSender<AppEvent>,
    completions_rx: mpsc::UnboundedReceiver<AppEvent>,
    in_flight: usize,
}

impl<G> Bridge<G>
where
    G: SecretGateway + 'static,
{
    /// Create a new Bridge over `gateway`.
    pub fn new(gateway: Arc<G>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self { gateway, completions_tx, completions_rx, in_flight: 0 }
    }

    /// Start the request for a gateway-bound action.
    ///
    /// Returns `false` for actions that do not involve the gateway. Must be
    /// called from within a tokio runtime.
    pub fn process_app_action(&mut self, action: AppAction) -> bool {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.completions_tx.clone();

        match action {
            AppAction::CreateSecret { submission, params } => {
                debug!(%submission, "dispatching create");
                tokio::spawn(async move {
                    let request =
                        tokio::spawn(async move { gateway.create_secret(&params).await });
                    let result = request.await.unwrap_or_else(|err| Err(task_failed(&err)));
                    let _ = tx.send(AppEvent::SecretCreated { submission, result });
                });
            },
            AppAction::FetchSecret { view, key, passphrase } => {
                debug!(%view, "dispatching fetch");
                let fetch_key = key.clone();
                tokio::spawn(async move {
                    let request = tokio::spawn(async move {
                        gateway.fetch_secret(&fetch_key, passphrase.as_ref()).await
                    });
                    let result = request.await.unwrap_or_else(|err| Err(task_failed(&err)));
                    let _ = tx.send(AppEvent::SecretFetched { view, key, result });
                });
            },
            AppAction::Render | AppAction::Quit => return false,
        }

        self.in_flight += 1;
        true
    }

    /// Wait for the next completed request.
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        let event = self.completions_rx.recv().await;
        if event.is_some() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        event
    }

    /// Number of requests whose results have not been collected yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// The gateway requests go to.
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }
}

fn task_failed(err: &JoinError) -> GatewayError {
    warn!(%err, "gateway request task failed");
    GatewayError::unreachable(format!("request task failed: {err}"))
}
