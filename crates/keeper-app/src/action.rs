//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use keeper_client::{CreateParams, Passphrase, SecretKey, SubmissionId, ViewId};

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Store a new secret.
    CreateSecret {
        /// Submission to report back under.
        submission: SubmissionId,
        /// Validated request.
        params: CreateParams,
    },

    /// Retrieve a secret for a view.
    FetchSecret {
        /// View to report back under.
        view: ViewId,
        /// Key to fetch.
        key: SecretKey,
        /// Normalized passphrase, if the link asked for one.
        passphrase: Option<Passphrase>,
    },
}
