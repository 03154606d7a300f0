//! Page state.

use keeper_client::{FetchFailure, RevealFlow, RevealPhase};

use crate::TextInput;

/// Page currently shown.
#[derive(Debug, Clone)]
pub enum Page {
    /// Creation form.
    NewSecret,

    /// One view of a shared secret.
    ViewSecret(RevealView),

    /// Unknown location.
    NotFound {
        /// Location that did not resolve.
        location: String,
    },
}

/// A secret view: its reveal flow plus the passphrase prompt.
///
/// Owned by the page; navigating away drops it together with any pending
/// fetch bookkeeping.
#[derive(Debug, Clone)]
pub struct RevealView {
    pub(crate) flow: RevealFlow,
    pub(crate) passphrase: TextInput,
    pub(crate) hint: Option<String>,
}

impl RevealView {
    pub(crate) fn new(flow: RevealFlow) -> Self {
        Self { flow, passphrase: TextInput::new(), hint: None }
    }

    /// Reveal state machine.
    pub fn flow(&self) -> &RevealFlow {
        &self.flow
    }

    /// Current phase.
    pub fn phase(&self) -> RevealPhase {
        self.flow.phase()
    }

    /// Passphrase prompt contents.
    pub fn passphrase_input(&self) -> &TextInput {
        &self.passphrase
    }

    /// Hint shown under the passphrase prompt.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Headline for a failed view.
    ///
    /// Every failure reads "Secret not found" unless `distinguish` is set, in
    /// which case transport failures read "Could not load the secret".
    pub fn failure_headline(&self, distinguish: bool) -> &'static str {
        match self.flow.failure() {
            Some(FetchFailure::RequestFailed) if distinguish => "Could not load the secret",
            _ => "Secret not found",
        }
    }
}
