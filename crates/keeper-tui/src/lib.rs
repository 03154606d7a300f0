//! Terminal UI for Keeper
//!
//! A thin shell over [`keeper_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`keeper_app::Runtime`].
//!
//! Besides the interactive UI the crate carries the command line
//! ([`cli`]), headless `create`/`open`/`health` commands ([`headless`]) and
//! log setup ([`logging`]).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod headless;
pub mod logging;
pub mod terminal;
pub mod ui;

pub use keeper_app::{App, AppAction, AppEvent, Bridge, Driver, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
