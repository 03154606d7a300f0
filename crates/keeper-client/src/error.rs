//! Error types for the client flows.
//!
//! Validation problems are reported per field so a form can show each one next
//! to its input. Gateway failures distinguish a missing secret from everything
//! else; callers that do not care may collapse the two.

use keeper_proto::{
    TtlError,
    limits::{MESSAGE_MAX_CHARS, MESSAGE_MIN_CHARS, PASSPHRASE_MAX_CHARS, PASSPHRASE_MIN_CHARS},
};
use thiserror::Error;

use crate::event::SubmissionId;

/// Field of a secret draft that a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    /// Secret text.
    Message,
    /// Lifetime selection.
    Ttl,
    /// Optional passphrase.
    Passphrase,
}

/// A single rejected field of a secret draft.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Message shorter than the minimum
    #[error("message must be at least {min} characters (got {len})")]
    MessageTooShort {
        /// Characters entered
        len: usize,
        /// Required minimum
        min: usize,
    },

    /// Message longer than the maximum
    #[error("message must be at most {max} characters (got {len})")]
    MessageTooLong {
        /// Characters entered
        len: usize,
        /// Allowed maximum
        max: usize,
    },

    /// Lifetime outside the allowed set
    #[error(transparent)]
    TtlNotAllowed(#[from] TtlError),

    /// Passphrase shorter than the minimum
    #[error("passphrase must be at least {min} characters (got {len})")]
    PassphraseTooShort {
        /// Characters entered
        len: usize,
        /// Required minimum
        min: usize,
    },

    /// Passphrase longer than the maximum
    #[error("passphrase must be at most {max} characters (got {len})")]
    PassphraseTooLong {
        /// Characters entered
        len: usize,
        /// Allowed maximum
        max: usize,
    },

    /// Passphrase with no characters left after normalization
    #[error("passphrase needs at least one letter, digit, '_' or '-'")]
    PassphraseUnusable,
}

impl ValidationError {
    /// The draft field this error belongs to.
    pub fn field(&self) -> DraftField {
        match self {
            Self::MessageTooShort { .. } | Self::MessageTooLong { .. } => DraftField::Message,
            Self::TtlNotAllowed(_) => DraftField::Ttl,
            Self::PassphraseTooShort { .. }
            | Self::PassphraseTooLong { .. }
            | Self::PassphraseUnusable => DraftField::Passphrase,
        }
    }

    pub(crate) fn check_message(len: usize) -> Option<Self> {
        if len < MESSAGE_MIN_CHARS {
            Some(Self::MessageTooShort { len, min: MESSAGE_MIN_CHARS })
        } else if len > MESSAGE_MAX_CHARS {
            Some(Self::MessageTooLong { len, max: MESSAGE_MAX_CHARS })
        } else {
            None
        }
    }

    pub(crate) fn check_passphrase(len: usize) -> Option<Self> {
        if len < PASSPHRASE_MIN_CHARS {
            Some(Self::PassphraseTooShort { len, min: PASSPHRASE_MIN_CHARS })
        } else if len > PASSPHRASE_MAX_CHARS {
            Some(Self::PassphraseTooLong { len, max: PASSPHRASE_MAX_CHARS })
        } else {
            None
        }
    }
}

/// Errors returned by [`CreationFlow::handle`](crate::CreationFlow::handle).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreationError {
    /// The draft failed validation; nothing was submitted
    #[error("draft rejected: {} invalid field(s)", .0.len())]
    Invalid(Vec<ValidationError>),

    /// A previous submission has not completed yet
    #[error("submission {submission:?} is still in flight")]
    InFlight {
        /// The outstanding submission
        submission: SubmissionId,
    },
}

impl CreationError {
    /// Validation errors carried by this error, empty for other kinds.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Invalid(errors) => errors,
            Self::InFlight { .. } => &[],
        }
    }
}

/// Errors reported by a [`SecretGateway`](crate::SecretGateway).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The backend has no secret under this key, or refused the passphrase
    #[error("secret not found")]
    NotFound,

    /// The request did not produce a usable answer
    #[error("request failed: {reason}")]
    RequestFailed {
        /// HTTP status when the backend answered at all
        status: Option<u16>,
        /// Reason from the backend's error body, or a local description
        reason: String,
    },
}

impl GatewayError {
    /// Failure without an HTTP status (connection refused, timeout, bad body).
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::RequestFailed { status: None, reason: reason.into() }
    }

    /// Returns true if the backend reported the secret as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns true if this error is transient and may succeed on retry.
    ///
    /// Network failures and server errors are transient. A missing secret or
    /// a rejected request is not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NotFound => false,
            Self::RequestFailed { status: None, .. } => true,
            Self::RequestFailed { status: Some(status), .. } => *status >= 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_attributed() {
        assert_eq!(ValidationError::check_message(0).map(|e| e.field()), Some(DraftField::Message));
        assert_eq!(
            ValidationError::check_passphrase(81).map(|e| e.field()),
            Some(DraftField::Passphrase)
        );
        assert_eq!(ValidationError::from(TtlError { hours: 2 }).field(), DraftField::Ttl);
        assert_eq!(ValidationError::PassphraseUnusable.field(), DraftField::Passphrase);
    }

    #[test]
    fn length_bounds_are_inclusive() {
        assert!(ValidationError::check_message(MESSAGE_MIN_CHARS).is_none());
        assert!(ValidationError::check_message(MESSAGE_MAX_CHARS).is_none());
        assert!(ValidationError::check_message(MESSAGE_MAX_CHARS + 1).is_some());
        assert!(ValidationError::check_passphrase(PASSPHRASE_MIN_CHARS - 1).is_some());
        assert!(ValidationError::check_passphrase(PASSPHRASE_MAX_CHARS).is_none());
    }

    #[test]
    fn network_and_server_failures_are_transient() {
        assert!(GatewayError::unreachable("connection refused").is_transient());
        assert!(
            GatewayError::RequestFailed { status: Some(503), reason: "unavailable".into() }
                .is_transient()
        );
    }

    #[test]
    fn missing_secret_and_bad_request_are_fatal() {
        assert!(!GatewayError::NotFound.is_transient());
        assert!(
            !GatewayError::RequestFailed { status: Some(400), reason: "bad request".into() }
                .is_transient()
        );
    }
}
