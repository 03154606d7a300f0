//! Secret drafts, validated requests and gateway results.

use std::fmt;

use keeper_proto::{Passphrase, SecretKey, Ttl, wire::CreateSecretRequest};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ValidationError;

/// Raw form input for a new secret.
///
/// Nothing here has been checked. An empty passphrase means "no passphrase".
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretDraft {
    /// Secret text as typed.
    pub message: String,
    /// Requested lifetime in hours.
    pub ttl_hours: u32,
    /// Passphrase as typed.
    pub passphrase: Option<String>,
}

impl SecretDraft {
    /// Draft with the given text, never expiring and without passphrase.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), ttl_hours: 0, passphrase: None }
    }

    /// Set the lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Ttl) -> Self {
        self.ttl_hours = ttl.hours();
        self
    }

    /// Set the passphrase.
    #[must_use]
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }
}

impl fmt::Debug for SecretDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretDraft")
            .field("message_chars", &self.message.chars().count())
            .field("ttl_hours", &self.ttl_hours)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A draft that passed validation.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CreateParams {
    message: String,
    #[zeroize(skip)]
    ttl: Ttl,
    passphrase: Option<Passphrase>,
}

impl CreateParams {
    /// Check every field of `draft`.
    ///
    /// Lengths are counted in characters of the raw input. A non-empty
    /// passphrase must also keep at least one character after normalization.
    ///
    /// # Errors
    ///
    /// Returns every field error found, in field order.
    pub fn validate(draft: &SecretDraft) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let message_len = draft.message.chars().count();
        if let Some(error) = ValidationError::check_message(message_len) {
            errors.push(error);
        }

        let ttl = match Ttl::try_from(draft.ttl_hours) {
            Ok(ttl) => ttl,
            Err(error) => {
                errors.push(error.into());
                Ttl::default()
            },
        };

        let raw_passphrase = draft.passphrase.as_deref().filter(|raw| !raw.is_empty());
        let passphrase = match raw_passphrase {
            None => None,
            Some(raw) => {
                if let Some(error) = ValidationError::check_passphrase(raw.chars().count()) {
                    errors.push(error);
                    None
                } else {
                    let normalized = Passphrase::normalize(Some(raw));
                    if normalized.is_none() {
                        errors.push(ValidationError::PassphraseUnusable);
                    }
                    normalized
                }
            },
        };

        if errors.is_empty() {
            Ok(Self { message: draft.message.clone(), ttl, passphrase })
        } else {
            Err(errors)
        }
    }

    /// Secret text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Lifetime.
    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Normalized passphrase, if one was given.
    pub fn passphrase(&self) -> Option<&Passphrase> {
        self.passphrase.as_ref()
    }

    /// Request body for the backend.
    pub fn to_wire(&self) -> CreateSecretRequest<'_> {
        CreateSecretRequest {
            message: &self.message,
            ttl: self.ttl.hours(),
            secret_phrase: self.passphrase.as_ref().map(Passphrase::as_str),
        }
    }
}

impl fmt::Debug for CreateParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateParams")
            .field("message_chars", &self.message.chars().count())
            .field("ttl", &self.ttl)
            .field("passphrase", &self.passphrase)
            .finish()
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSecret {
    /// Key the backend stored the secret under.
    pub key: SecretKey,
    /// Whether the backend requires a passphrase to open it.
    pub requires_passphrase: bool,
}

/// A retrieved secret.
///
/// The text is zeroed on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RevealedSecret {
    message: String,
    created_at: Option<String>,
    expires_at: Option<String>,
}

impl RevealedSecret {
    /// Secret without timestamps.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), created_at: None, expires_at: None }
    }

    /// Attach the backend's timestamps.
    #[must_use]
    pub fn with_timestamps(mut self, created_at: Option<String>, expires_at: Option<String>) -> Self {
        self.created_at = created_at;
        self.expires_at = expires_at;
        self
    }

    /// Secret text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Creation time as reported by the backend.
    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    /// Expiry time as reported by the backend.
    pub fn expires_at(&self) -> Option<&str> {
        self.expires_at.as_deref()
    }
}

impl fmt::Debug for RevealedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealedSecret")
            .field("message", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
