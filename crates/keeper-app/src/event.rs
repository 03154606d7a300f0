//! Application input events.
//!
//! This module defines [`AppEvent`], the inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (keyboard, resize, navigation) and system ticks.
//! - Gateway results returned by the [`crate::Bridge`].

use keeper_client::{
    CreatedSecret, GatewayError, RevealedSecret, SecretKey, SubmissionId, ViewId,
};

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Go to a location (path or full share link).
    Navigate {
        /// Target location.
        location: String,
    },

    /// A creation request finished.
    SecretCreated {
        /// Submission the result belongs to.
        submission: SubmissionId,
        /// Created secret or failure.
        result: Result<CreatedSecret, GatewayError>,
    },

    /// A fetch finished.
    SecretFetched {
        /// View the fetch was issued for.
        view: ViewId,
        /// Key that was fetched.
        key: SecretKey,
        /// Secret or failure.
        result: Result<RevealedSecret, GatewayError>,
    },
}
