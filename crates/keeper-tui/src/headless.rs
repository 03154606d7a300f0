//! Headless commands.
//!
//! `create`, `open` and `health` run the same flows as the terminal UI, one
//! request at a time, and write their result to a caller-provided writer.

use std::io::Write;

use keeper_app::Route;
use keeper_client::{
    CreationAction, CreationError, CreationEvent, CreationFlow, FetchFailure, GatewayError,
    RevealAction, RevealEvent, RevealFlow, RevealPhase, SecretDraft, SecretGateway, ShareLink,
    ValidationError, ViewId,
    transport::{HttpGateway, TransportError},
};
use thiserror::Error;
use tracing::{debug, info};

/// Headless command errors.
#[derive(Debug, Error)]
pub enum HeadlessError {
    /// The draft failed validation.
    #[error("invalid secret: {}", describe(.0))]
    Invalid(Vec<ValidationError>),

    /// The creation flow refused the submission.
    #[error(transparent)]
    Rejected(CreationError),

    /// The backend did not store the secret.
    #[error("could not create the secret: {0}")]
    CreateFailed(GatewayError),

    /// The location is not a share link.
    #[error("not a share link: {location}")]
    NotALink {
        /// What was given.
        location: String,
    },

    /// The link is protected and no usable passphrase was given.
    #[error("this secret needs a passphrase (pass --passphrase)")]
    PassphraseRequired,

    /// Missing, expired, already read or wrong passphrase. Transport
    /// failures also land here unless failures are distinguished.
    #[error("secret not found")]
    NotFound,

    /// The secret could not be loaded.
    #[error("could not load the secret: {0}")]
    LoadFailed(GatewayError),

    /// The health probe failed or reported a bad status.
    #[error("backend unhealthy: {0}")]
    Unhealthy(String),

    /// HTTP client setup failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Writing the result failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Store `draft` and write the share link.
///
/// # Errors
///
/// Returns [`HeadlessError::Invalid`] before any request if the draft does
/// not validate, and [`HeadlessError::CreateFailed`] if the backend refuses.
pub async fn create<G, W>(
    gateway: &G,
    origin: &str,
    draft: SecretDraft,
    out: &mut W,
) -> Result<ShareLink, HeadlessError>
where
    G: SecretGateway,
    W: Write,
{
    let mut flow = CreationFlow::new(origin.to_string());

    let actions = flow.handle(CreationEvent::Submit(draft)).map_err(|err| match err {
        CreationError::Invalid(errors) => HeadlessError::Invalid(errors),
        other => HeadlessError::Rejected(other),
    })?;

    let mut pending = actions;
    loop {
        let mut completion = None;
        for action in std::mem::take(&mut pending) {
            match action {
                CreationAction::Create { submission, params } => {
                    let result = gateway.create_secret(&params).await;
                    completion = Some(CreationEvent::Completed { submission, result });
                },
                CreationAction::Share(link) => {
                    writeln!(out, "{link}")?;
                    if link.requires_passphrase() {
                        info!("the recipient will be asked for the passphrase");
                    }
                    return Ok(link);
                },
                CreationAction::ResetForm => {},
                CreationAction::Failed { error } => return Err(HeadlessError::CreateFailed(error)),
            }
        }

        let Some(event) = completion else {
            return Err(HeadlessError::CreateFailed(GatewayError::unreachable(
                "creation finished without a result",
            )));
        };
        pending = flow.handle(event).map_err(HeadlessError::Rejected)?;
    }
}

/// Reveal the secret behind `location` and write its message.
///
/// A protected link needs `passphrase`. With `distinguish_failures` unset
/// every failure reads as [`HeadlessError::NotFound`].
///
/// # Errors
///
/// See [`HeadlessError`].
pub async fn open<G, W>(
    gateway: &G,
    location: &str,
    passphrase: Option<&str>,
    distinguish_failures: bool,
    out: &mut W,
) -> Result<(), HeadlessError>
where
    G: SecretGateway,
    W: Write,
{
    let Route::ViewSecret { key, requires_passphrase } = Route::parse(location) else {
        return Err(HeadlessError::NotALink { location: location.to_string() });
    };

    let mut flow = RevealFlow::new(ViewId(0), key, requires_passphrase);
    let mut actions = flow.begin();
    if flow.phase() == RevealPhase::Gated {
        let raw = passphrase.ok_or(HeadlessError::PassphraseRequired)?;
        actions = flow.handle(RevealEvent::SubmitPassphrase(raw.to_string()));
        if flow.phase() == RevealPhase::Gated {
            return Err(HeadlessError::PassphraseRequired);
        }
    }

    let mut last_error = None;
    for action in actions {
        let RevealAction::Fetch { view, key, passphrase } = action;
        let result = gateway.fetch_secret(&key, passphrase.as_ref()).await;
        if let Err(err) = &result {
            last_error = Some(err.clone());
        }
        flow.handle(RevealEvent::FetchCompleted { view, key, result });
    }

    match (flow.phase(), flow.failure()) {
        (RevealPhase::Revealed, _) => {
            let Some(secret) = flow.secret() else {
                return Err(HeadlessError::NotFound);
            };
            debug!("writing revealed secret");
            writeln!(out, "{}", secret.message())?;
            Ok(())
        },
        (_, Some(FetchFailure::RequestFailed)) if distinguish_failures => Err(
            HeadlessError::LoadFailed(last_error.unwrap_or_else(|| GatewayError::unreachable("unknown"))),
        ),
        _ => Err(HeadlessError::NotFound),
    }
}

/// Probe the backend and write its status.
///
/// # Errors
///
/// Returns [`HeadlessError::Unhealthy`] if the probe fails or the backend
/// reports anything but `ok`.
pub async fn health<W: Write>(gateway: &HttpGateway, out: &mut W) -> Result<(), HeadlessError> {
    let body = gateway.health().await.map_err(|err| HeadlessError::Unhealthy(err.to_string()))?;
    if !body.is_ok() {
        return Err(HeadlessError::Unhealthy(body.status));
    }
    writeln!(out, "{} ok", gateway.api_url())?;
    Ok(())
}
