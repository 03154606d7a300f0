//! HTTP front for [`SimBackend`].
//!
//! Serves the backend API on `127.0.0.1` with an ephemeral port so the real
//! HTTP gateway can be tested end to end:
//!
//! - `POST /api/secrets`
//! - `GET /api/secrets/{secretKey}?secretPhrase=...`
//! - `GET /health`
//!
//! Failures answer with `{"error": "..."}` bodies like the production backend.

use std::{io, net::SocketAddr};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use keeper_proto::wire::{
    ErrorBody, GetSecretResponse, HealthBody, REQUEST_ID_HEADER, SECRET_PHRASE_PARAM,
};
use serde::Deserialize;
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::warn;

use crate::sim_backend::{Refusal, SimBackend};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody {
    message: String,
    ttl: u32,
    #[serde(default)]
    secret_phrase: Option<String>,
}

/// A running HTTP backend. Stops when dropped.
pub struct HttpBackend {
    addr: SocketAddr,
    backend: SimBackend,
    task: JoinHandle<()>,
}

impl HttpBackend {
    /// Serve `backend` on an ephemeral local port.
    pub async fn serve(backend: SimBackend) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router(backend.clone());

        let task = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                warn!(%err, "simulated http backend stopped");
            }
        });

        Ok(Self { addr, backend, task })
    }

    /// Bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Origin of the backend, e.g. `http://127.0.0.1:4242`.
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Base URL of the API.
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// The store behind the server.
    pub fn backend(&self) -> &SimBackend {
        &self.backend
    }
}

impl Drop for HttpBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn router(backend: SimBackend) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/secrets", post(create_secret))
        .route("/api/secrets/{secret_key}", get(get_secret))
        .fallback(not_found)
        .with_state(backend)
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok".to_string() })
}

async fn create_secret(
    State(backend): State<SimBackend>,
    headers: HeaderMap,
    Json(body): Json<CreateBody>,
) -> Response {
    match backend.create(&body.message, body.ttl, body.secret_phrase.as_deref(), request_id(&headers))
    {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(refusal) => refused(&refusal),
    }
}

async fn get_secret(
    State(backend): State<SimBackend>,
    Path(secret_key): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    let secret_phrase = query
        .iter()
        .find(|(name, _)| name == SECRET_PHRASE_PARAM)
        .map(|(_, value)| value.as_str());

    match backend.fetch(&secret_key, secret_phrase, request_id(&headers)) {
        Ok(secret) => Json(GetSecretResponse { secret }).into_response(),
        Err(refusal) => refused(&refusal),
    }
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "not found".to_string())
}

fn refused(refusal: &Refusal) -> Response {
    let status = StatusCode::from_u16(refusal.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(status, refusal.reason())
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}

fn request_id(headers: &HeaderMap) -> Option<String> {
    headers.get(REQUEST_ID_HEADER).and_then(|value| value.to_str().ok()).map(str::to_string)
}
