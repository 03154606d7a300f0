//! Passphrase normalization.
//!
//! The backend compares passphrases in their normalized form: lower-cased,
//! each run of spaces collapsed to a single hyphen, and every character
//! outside `[A-Za-z0-9_-]` removed.
//!
//! # Security
//!
//! Normalization is lossy and is not a hash. Distinct raw inputs may map to the
//! same value ("Open Sesame!" and "open  sesame" both become `open-sesame`),
//! and the normalized value travels in a URL query parameter.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A normalized passphrase.
///
/// Always non-empty and made only of `[a-z0-9_-]`. The buffer is zeroed when
/// the value is dropped, and `Debug` never prints it.
#[derive(Clone, PartialEq, Eq, Hash, Zeroize, ZeroizeOnDrop)]
pub struct Passphrase(String);

impl Passphrase {
    /// Normalize raw user input.
    ///
    /// Returns `None` for absent or empty input, and for input that has no
    /// characters left after stripping.
    pub fn normalize(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        if raw.is_empty() {
            return None;
        }

        let mut normalized = String::with_capacity(raw.len());
        let mut in_space_run = false;

        for ch in raw.chars().flat_map(char::to_lowercase) {
            if ch == ' ' {
                if !in_space_run {
                    normalized.push('-');
                }
                in_space_run = true;
                continue;
            }

            in_space_run = false;
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                normalized.push(ch);
            }
        }

        if normalized.is_empty() { None } else { Some(Self(normalized)) }
    }

    /// Normalized value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}

/// Normalize raw user input. See [`Passphrase::normalize`].
pub fn normalize(raw: Option<&str>) -> Option<Passphrase> {
    Passphrase::normalize(raw)
}
