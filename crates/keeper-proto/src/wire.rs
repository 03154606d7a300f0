//! Backend HTTP API bodies.
//!
//! All routes live under the `/api` prefix of the backend:
//!
//! - `POST /api/secrets` with [`CreateSecretRequest`], answered by
//!   [`CreateSecretResponse`]
//! - `GET /api/secrets/{secretKey}` with an optional `secretPhrase` query
//!   parameter, answered by [`GetSecretResponse`]
//!
//! Failures carry an [`ErrorBody`]. The health probe sits outside the API
//! prefix at [`HEALTH_PATH`] and answers with a [`HealthBody`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Absolute path of the health probe.
pub const HEALTH_PATH: &str = "/health";

/// Query parameter carrying the normalized passphrase on retrieval.
pub const SECRET_PHRASE_PARAM: &str = "secretPhrase";

/// Header used to correlate a request with backend logs.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Body of `POST /secrets`.
#[derive(Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecretRequest<'a> {
    /// Secret text.
    pub message: &'a str,
    /// Lifetime in hours, `0` for never.
    pub ttl: u32,
    /// Normalized passphrase, omitted when none was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_phrase: Option<&'a str>,
}

impl fmt::Debug for CreateSecretRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateSecretRequest")
            .field("message_chars", &self.message.chars().count())
            .field("ttl", &self.ttl)
            .field("secret_phrase", &self.secret_phrase.map(|_| "<redacted>"))
            .finish()
    }
}

/// Success body of `POST /secrets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecretResponse {
    /// Key of the stored secret.
    pub secret_key: String,
    /// Whether the secret was stored with a passphrase. Older backends omit
    /// it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_secret_phrase: Option<bool>,
}

/// Success body of `GET /secrets/{secretKey}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetSecretResponse {
    /// The stored secret.
    pub secret: SecretBody,
}

impl fmt::Debug for GetSecretResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetSecretResponse").finish_non_exhaustive()
    }
}

/// Secret as returned by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretBody {
    /// Secret text.
    pub message: String,
    /// Creation timestamp (RFC 3339) when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Expiry timestamp (RFC 3339) when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<String>,
}

impl fmt::Debug for SecretBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBody").finish_non_exhaustive()
    }
}

/// Failure body returned with non-success statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable reason.
    pub error: String,
}

/// Body of the health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBody {
    /// `"ok"` when the backend is healthy.
    pub status: String,
}

impl HealthBody {
    /// Whether the backend reported itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
