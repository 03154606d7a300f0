//! Reveal flow.
//!
//! One [`RevealFlow`] covers one page view of a shared secret:
//!
//! ```text
//!            passphrase required          fetch ok
//!   Gated ───────────────────────▶ Loading ─────────▶ Revealed
//!                                     │
//!   (no passphrase: starts here) ─────┤ fetch failed
//!                                     ▼
//!                                  NotFound
//! ```
//!
//! The backend consumes a secret on the first successful read, so a view
//! issues at most one fetch. `Revealed` and `NotFound` are final.

use keeper_proto::{Passphrase, SecretKey};
use tracing::{debug, info, warn};

use crate::{
    error::GatewayError,
    event::{RevealAction, RevealEvent, ViewId},
    secret::RevealedSecret,
};

/// Phase of a reveal view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealPhase {
    /// Waiting for the recipient to enter a passphrase.
    Gated,
    /// Fetch requested, no answer yet.
    Loading,
    /// The secret was retrieved.
    Revealed,
    /// The secret could not be retrieved.
    NotFound,
}

impl RevealPhase {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Revealed | Self::NotFound)
    }
}

/// Why a view ended in [`RevealPhase::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchFailure {
    /// The backend reported the secret missing.
    Missing,
    /// The request failed for another reason.
    RequestFailed,
}

impl From<&GatewayError> for FetchFailure {
    fn from(error: &GatewayError) -> Self {
        match error {
            GatewayError::NotFound => Self::Missing,
            GatewayError::RequestFailed { .. } => Self::RequestFailed,
        }
    }
}

/// State machine for one view of a secret.
#[derive(Debug, Clone)]
pub struct RevealFlow {
    view: ViewId,
    key: SecretKey,
    requires_passphrase: bool,
    phase: RevealPhase,
    passphrase: Option<Passphrase>,
    fetch_issued: bool,
    secret: Option<RevealedSecret>,
    failure: Option<FetchFailure>,
}

impl RevealFlow {
    /// Start a view. Gated when `requires_passphrase`, loading otherwise.
    ///
    /// Call [`begin`](Self::begin) to obtain the initial fetch for an ungated
    /// view.
    pub fn new(view: ViewId, key: SecretKey, requires_passphrase: bool) -> Self {
        let phase = if requires_passphrase { RevealPhase::Gated } else { RevealPhase::Loading };
        Self {
            view,
            key,
            requires_passphrase,
            phase,
            passphrase: None,
            fetch_issued: false,
            secret: None,
            failure: None,
        }
    }

    /// Actions to run on entering the view.
    ///
    /// Returns the fetch for a view in [`RevealPhase::Loading`] that has not
    /// fetched yet, and nothing otherwise. Calling it again never repeats the
    /// fetch.
    pub fn begin(&mut self) -> Vec<RevealAction> {
        if self.phase != RevealPhase::Loading || self.fetch_issued {
            return Vec::new();
        }
        self.fetch_issued = true;

        debug!(view = %self.view, with_passphrase = self.passphrase.is_some(), "fetching secret");
        vec![RevealAction::Fetch {
            view: self.view,
            key: self.key.clone(),
            passphrase: self.passphrase.clone(),
        }]
    }

    /// Process an event and return the resulting actions.
    pub fn handle(&mut self, event: RevealEvent) -> Vec<RevealAction> {
        match event {
            RevealEvent::SubmitPassphrase(raw) => self.handle_passphrase(&raw),
            RevealEvent::FetchCompleted { view, key, result } => {
                self.handle_fetch_completed(view, &key, result);
                Vec::new()
            },
        }
    }

    fn handle_passphrase(&mut self, raw: &str) -> Vec<RevealAction> {
        if self.phase != RevealPhase::Gated {
            debug!(view = %self.view, phase = ?self.phase, "passphrase ignored outside gated phase");
            return Vec::new();
        }

        let Some(passphrase) = Passphrase::normalize(Some(raw)) else {
            debug!(view = %self.view, "empty passphrase, staying gated");
            return Vec::new();
        };

        self.passphrase = Some(passphrase);
        self.phase = RevealPhase::Loading;
        self.begin()
    }

    fn handle_fetch_completed(
        &mut self,
        view: ViewId,
        key: &SecretKey,
        result: Result<RevealedSecret, GatewayError>,
    ) {
        if view != self.view || *key != self.key {
            warn!(%view, current = %self.view, "discarding fetch result for another view");
            return;
        }
        if self.phase != RevealPhase::Loading {
            warn!(view = %self.view, phase = ?self.phase, "discarding unexpected fetch result");
            return;
        }

        match result {
            Ok(secret) => {
                info!(view = %self.view, "secret revealed");
                self.secret = Some(secret);
                self.phase = RevealPhase::Revealed;
            },
            Err(error) => {
                warn!(view = %self.view, %error, "secret unavailable");
                self.failure = Some(FetchFailure::from(&error));
                self.phase = RevealPhase::NotFound;
            },
        }
    }

    /// View identifier.
    pub fn view(&self) -> ViewId {
        self.view
    }

    /// Key being revealed.
    pub fn key(&self) -> &SecretKey {
        &self.key
    }

    /// Whether the link asked for a passphrase.
    pub fn requires_passphrase(&self) -> bool {
        self.requires_passphrase
    }

    /// Current phase.
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Normalized passphrase once one was accepted.
    pub fn passphrase(&self) -> Option<&Passphrase> {
        self.passphrase.as_ref()
    }

    /// Retrieved secret. Present exactly when the phase is
    /// [`RevealPhase::Revealed`].
    pub fn secret(&self) -> Option<&RevealedSecret> {
        self.secret.as_ref()
    }

    /// Failure kind. Present exactly when the phase is
    /// [`RevealPhase::NotFound`].
    pub fn failure(&self) -> Option<FetchFailure> {
        self.failure
    }
}
