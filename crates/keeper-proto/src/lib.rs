//! Keeper protocol types
//!
//! Everything that crosses a boundary: the JSON bodies exchanged with the
//! secret store backend, the shareable link format, and the validated domain
//! values that flow through both.
//!
//! # Components
//!
//! - [`SecretKey`]: opaque, URL-safe identifier assigned by the backend
//! - [`Passphrase`]: normalized secret phrase (wiped on drop)
//! - [`Ttl`]: the enumerated set of allowed lifetimes
//! - [`link`]: share link composition and query flag decoding
//! - [`wire`]: request and response bodies of the backend HTTP API
//!
//! This crate performs no I/O.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod key;
pub mod limits;
pub mod link;
mod passphrase;
mod ttl;
pub mod wire;

pub use key::{KeyError, SecretKey};
pub use link::ShareLink;
pub use passphrase::{Passphrase, normalize};
pub use ttl::{Ttl, TtlError};
