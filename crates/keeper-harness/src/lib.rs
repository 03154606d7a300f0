//! Deterministic simulation harness for Keeper testing.
//!
//! In-memory implementations of the backend and the UI driver so the real
//! flows, App and Runtime can be exercised without a network or a terminal.
//!
//! # Components
//!
//! - [`SimBackend`]: Secret store with virtual time, passphrase checks,
//!   burn-after-read and fault injection. Implements
//!   [`SecretGateway`](keeper_client::SecretGateway) directly.
//! - [`HttpBackend`]: The same store served over HTTP on an ephemeral port,
//!   speaking the real API.
//! - [`ScriptedDriver`]: [`Driver`](keeper_app::Driver) that replays a script
//!   of input events and records renders.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod http_backend;
pub mod sim_backend;
pub mod sim_driver;

pub use http_backend::HttpBackend;
pub use sim_backend::{Fault, SimBackend, SimRequest};
pub use sim_driver::{ScriptError, ScriptHandle, ScriptedDriver};
