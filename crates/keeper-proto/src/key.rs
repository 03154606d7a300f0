//! Secret keys.

use std::fmt;

use thiserror::Error;

/// Errors produced when parsing a [`SecretKey`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Key was empty.
    #[error("secret key is empty")]
    Empty,

    /// Key contains a character that is not URL-safe.
    #[error("secret key contains {ch:?} at position {position}")]
    InvalidChar {
        /// Offending character.
        ch: char,
        /// Character index within the key.
        position: usize,
    },

    /// Key is a `.` or `..` path segment, which URL normalization removes.
    #[error("secret key {0:?} is a dot segment")]
    DotSegment(String),
}

/// Opaque identifier of a stored secret.
///
/// Assigned by the backend at creation time and embedded verbatim as the last
/// path segment of the share link, so only RFC 3986 unreserved characters
/// (`A-Z a-z 0-9 - . _ ~`) are accepted. The dot segments `.` and `..` are
/// refused since a URL parser drops them from the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SecretKey(String);

impl SecretKey {
    /// Parse a key, rejecting empty, dot-segment or non URL-safe input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, KeyError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(KeyError::Empty);
        }

        if let Some((position, ch)) = raw.chars().enumerate().find(|(_, c)| !is_unreserved(*c)) {
            return Err(KeyError::InvalidChar { ch, position });
        }

        if raw == "." || raw == ".." {
            return Err(KeyError::DotSegment(raw));
        }

        Ok(Self(raw))
    }

    /// Key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SecretKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hex_keys() {
        let key = SecretKey::parse("61626364656667682431323334").unwrap();
        assert_eq!(key.as_str(), "61626364656667682431323334");
        assert_eq!(key.to_string(), "61626364656667682431323334");
    }

    #[test]
    fn rejects_empty_key() {
        assert_eq!(SecretKey::parse(""), Err(KeyError::Empty));
    }

    #[test]
    fn rejects_path_separators() {
        assert_eq!(SecretKey::parse("abc/def"), Err(KeyError::InvalidChar { ch: '/', position: 3 }));
        assert!(SecretKey::parse("abc?x=1").is_err());
        assert!(SecretKey::parse("a b").is_err());
    }

    #[test]
    fn rejects_dot_segments() {
        assert_eq!(SecretKey::parse("."), Err(KeyError::DotSegment(".".into())));
        assert_eq!(SecretKey::parse(".."), Err(KeyError::DotSegment("..".into())));
        assert!(SecretKey::parse("...").is_ok());
        assert!(SecretKey::parse(".abc").is_ok());
    }

    #[test]
    fn parses_through_from_str() {
        let key: SecretKey = "abc123".parse().unwrap();
        assert_eq!(key.as_str(), "abc123");
    }
}
