//! Application layer for Keeper
//!
//! Pure state machines and a generic runtime for the secret sharing UI. The
//! same orchestration code drives the terminal frontend and the scripted
//! simulation used in tests.
//!
//! # Components
//!
//! - [`App`]: UI state machine (routing, form editing, dialogs, reveal views)
//! - [`Route`]: Location parsing (`/`, `/secrets/{key}`, anything else)
//! - [`Bridge`]: Gateway bridge (runs App actions as tasks, returns results)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod driver;
mod event;
mod form;
mod input;
mod page;
mod route;
mod runtime;
mod text;

pub use action::AppAction;
pub use app::{App, AppConfig, DEFAULT_ORIGIN};
pub use bridge::Bridge;
pub use driver::Driver;
pub use event::AppEvent;
pub use form::{FormField, SecretForm};
pub use input::KeyInput;
pub use page::{Page, RevealView};
pub use route::Route;
pub use runtime::Runtime;
pub use text::TextInput;
