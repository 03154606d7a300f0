//! HTTP transport for the client.
//!
//! Provides [`HttpGateway`], a [`SecretGateway`] speaking the backend's JSON
//! API with `reqwest`. Every request carries a fresh `X-Request-ID` that is
//! also recorded on the request's tracing span, so client and backend logs can
//! be joined.

use std::time::Duration;

use keeper_proto::{
    Passphrase, SecretKey,
    link::SECRETS_SEGMENT,
    wire::{
        CreateSecretResponse, ErrorBody, GetSecretResponse, HEALTH_PATH, HealthBody,
        REQUEST_ID_HEADER, SECRET_PHRASE_PARAM,
    },
};
use reqwest::{StatusCode, Url};
use thiserror::Error;
use tracing::{Instrument, debug, debug_span, warn};
use uuid::Uuid;

use crate::{
    error::GatewayError,
    gateway::SecretGateway,
    secret::{CreateParams, CreatedSecret, RevealedSecret},
};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport setup errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The API URL cannot be used as a base for request paths.
    #[error("invalid api url {url:?}: {reason}")]
    InvalidUrl {
        /// URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("http client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Settings for [`HttpGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL of the API, including its `/api` prefix.
    pub api_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("keeper/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Gateway backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    api_url: Url,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Build a gateway from `config`.
    pub fn new(config: &GatewayConfig) -> Result<Self, TransportError> {
        let api_url = Url::parse(&config.api_url).map_err(|err| TransportError::InvalidUrl {
            url: config.api_url.clone(),
            reason: err.to_string(),
        })?;
        if api_url.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl {
                url: config.api_url.clone(),
                reason: "not a base url".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self { api_url, client })
    }

    /// Base URL of the API.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Probe the backend's health endpoint.
    ///
    /// The probe lives at the root of the backend's origin, outside the API
    /// prefix.
    pub async fn health(&self) -> Result<HealthBody, GatewayError> {
        let request_id = Uuid::new_v4();
        let span = debug_span!("health", %request_id);

        async {
            let url = self
                .api_url
                .join(HEALTH_PATH)
                .map_err(|err| GatewayError::unreachable(err.to_string()))?;
            let response = self
                .client
                .get(url)
                .header(REQUEST_ID_HEADER, request_id.to_string())
                .send()
                .await
                .map_err(request_error)?;
            let response = ensure_success(response).await?;
            response.json::<HealthBody>().await.map_err(request_error)
        }
        .instrument(span)
        .await
    }

    fn secrets_url(&self, key: Option<&SecretKey>) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(SECRETS_SEGMENT);
            if let Some(key) = key {
                segments.push(key.as_str());
            }
        }
        url
    }
}

impl SecretGateway for HttpGateway {
    async fn create_secret(&self, params: &CreateParams) -> Result<CreatedSecret, GatewayError> {
        let request_id = Uuid::new_v4();
        let span = debug_span!("create_secret", %request_id);

        async {
            let response = self
                .client
                .post(self.secrets_url(None))
                .header(REQUEST_ID_HEADER, request_id.to_string())
                .json(&params.to_wire())
                .send()
                .await
                .map_err(request_error)?;
            let status = response.status();
            let response = ensure_success(response).await?;
            let payload =
                response.json::<CreateSecretResponse>().await.map_err(request_error)?;

            let key = SecretKey::parse(payload.secret_key).map_err(|err| {
                GatewayError::RequestFailed {
                    status: Some(status.as_u16()),
                    reason: format!("backend returned an unusable key: {err}"),
                }
            })?;
            let requires_passphrase =
                payload.with_secret_phrase.unwrap_or(params.passphrase().is_some());

            debug!(status = status.as_u16(), requires_passphrase, "secret stored");
            Ok(CreatedSecret { key, requires_passphrase })
        }
        .instrument(span)
        .await
    }

    async fn fetch_secret(
        &self,
        key: &SecretKey,
        passphrase: Option<&Passphrase>,
    ) -> Result<RevealedSecret, GatewayError> {
        let request_id = Uuid::new_v4();
        let span = debug_span!("fetch_secret", %request_id);

        async {
            let mut url = self.secrets_url(Some(key));
            if let Some(passphrase) = passphrase {
                url.query_pairs_mut().append_pair(SECRET_PHRASE_PARAM, passphrase.as_str());
            }

            let response = self
                .client
                .get(url)
                .header(REQUEST_ID_HEADER, request_id.to_string())
                .send()
                .await
                .map_err(request_error)?;
            if is_missing(response.status()) {
                debug!(status = response.status().as_u16(), "secret not found");
                return Err(GatewayError::NotFound);
            }
            let response = ensure_success(response).await?;
            let payload = response.json::<GetSecretResponse>().await.map_err(request_error)?;

            let body = payload.secret;
            Ok(RevealedSecret::new(body.message).with_timestamps(body.created_at, body.expired_at))
        }
        .instrument(span)
        .await
    }
}

/// Statuses meaning the secret cannot be had: gone, consumed, or the
/// passphrase did not match.
fn is_missing(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::NOT_FOUND | StatusCode::GONE | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    )
}

fn request_error(err: reqwest::Error) -> GatewayError {
    let status = err.status().map(|s| s.as_u16());
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "backend unreachable".to_string()
    } else if err.is_decode() {
        format!("malformed response: {err}")
    } else {
        err.to_string()
    };
    GatewayError::RequestFailed { status, reason }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let reason = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("unexpected status").to_string(),
    };
    warn!(status = status.as_u16(), %reason, "backend rejected request");
    Err(GatewayError::RequestFailed { status: Some(status.as_u16()), reason })
}
