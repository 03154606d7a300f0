//! Client-enforced input bounds.
//!
//! The backend is authoritative; these bounds only stop obviously invalid
//! submissions before they reach the network. Lengths are in characters, not
//! bytes.

/// Minimum message length.
pub const MESSAGE_MIN_CHARS: usize = 3;

/// Maximum message length.
pub const MESSAGE_MAX_CHARS: usize = 800;

/// Minimum raw passphrase length.
pub const PASSPHRASE_MIN_CHARS: usize = 3;

/// Maximum raw passphrase length.
pub const PASSPHRASE_MAX_CHARS: usize = 80;
