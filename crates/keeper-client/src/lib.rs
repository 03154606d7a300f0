//! Client
//!
//! Action-based state machines for sharing one-time secrets. Composing a
//! secret and revealing one are both modelled as pure flows that consume
//! events and return actions for the caller to execute.
//!
//! # Architecture
//!
//! Neither flow performs I/O. A [`CreationFlow`] turns a form submission into
//! a [`CreationAction::Create`] and, once the caller reports the backend's
//! answer, into a [`ShareLink`]. A [`RevealFlow`] walks a single page view
//! through its phases and asks for exactly one fetch via
//! [`RevealAction::Fetch`].
//!
//! The caller executes those actions against a [`SecretGateway`] and feeds the
//! results back in as events.
//!
//! # Components
//!
//! - [`CreationFlow`]: Validation and submission tracking for new secrets
//! - [`RevealFlow`]: Phase machine for one view of a shared secret
//! - [`SecretGateway`]: The two backend operations, abstracted over transport
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::HttpGateway`]: Gateway speaking the backend's HTTP API
//! - [`transport::GatewayConfig`]: Base URL, timeout and user agent

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod creation;
mod error;
mod event;
mod gateway;
mod reveal;
mod secret;

#[cfg(feature = "transport")]
pub mod transport;

pub use creation::CreationFlow;
pub use error::{CreationError, DraftField, GatewayError, ValidationError};
pub use event::{
    CreationAction, CreationEvent, RevealAction, RevealEvent, SubmissionId, ViewId,
};
pub use gateway::SecretGateway;
pub use keeper_proto::{Passphrase, SecretKey, ShareLink, Ttl};
pub use reveal::{FetchFailure, RevealFlow, RevealPhase};
pub use secret::{CreateParams, CreatedSecret, RevealedSecret, SecretDraft};
