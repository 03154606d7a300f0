//! Flow events and actions.

use std::fmt;

use keeper_proto::{Passphrase, SecretKey, ShareLink};

use crate::{
    error::GatewayError,
    secret::{CreateParams, CreatedSecret, RevealedSecret, SecretDraft},
};

/// Identifies one submission of the creation form.
///
/// Completions carrying an identifier other than the one in flight are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(pub u64);

/// Identifies one page view of a secret.
///
/// Every navigation to a secret starts a new view. Fetch results that come
/// back for an older view are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "submission-{}", self.0)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// Events fed into a [`CreationFlow`](crate::CreationFlow).
#[derive(Debug, Clone)]
pub enum CreationEvent {
    /// The user submitted the form.
    Submit(SecretDraft),

    /// The gateway answered a submission.
    Completed {
        /// Submission the answer belongs to.
        submission: SubmissionId,
        /// Created secret or the reason it was not created.
        result: Result<CreatedSecret, GatewayError>,
    },
}

/// Actions produced by a [`CreationFlow`](crate::CreationFlow).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationAction {
    /// Store a secret through the gateway and report back with
    /// [`CreationEvent::Completed`].
    Create {
        /// Submission to report back under.
        submission: SubmissionId,
        /// Validated request.
        params: CreateParams,
    },

    /// Present the share link for a created secret.
    Share(ShareLink),

    /// Clear the form inputs.
    ResetForm,

    /// The submission failed. The form keeps its inputs.
    Failed {
        /// What went wrong.
        error: GatewayError,
    },
}

/// Events fed into a [`RevealFlow`](crate::RevealFlow).
#[derive(Debug, Clone)]
pub enum RevealEvent {
    /// The user submitted a passphrase (raw, before normalization).
    SubmitPassphrase(String),

    /// The gateway answered a fetch.
    FetchCompleted {
        /// View the fetch was issued for.
        view: ViewId,
        /// Key that was fetched.
        key: SecretKey,
        /// Secret or the reason it could not be retrieved.
        result: Result<RevealedSecret, GatewayError>,
    },
}

/// Actions produced by a [`RevealFlow`](crate::RevealFlow).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealAction {
    /// Retrieve the secret and report back with
    /// [`RevealEvent::FetchCompleted`].
    Fetch {
        /// View to report back under.
        view: ViewId,
        /// Key to fetch.
        key: SecretKey,
        /// Normalized passphrase, if the link asked for one.
        passphrase: Option<Passphrase>,
    },
}
