//! Share link codec.
//!
//! A share link is `{origin}/secrets/{key}`, optionally followed by
//! `?withSecretPhrase=true` when the secret was created with a passphrase.
//! The flag only says that a passphrase is required; the value itself is never
//! part of the link.
//!
//! The decode side treats a missing flag, and any value other than the exact
//! string `true`, as "no passphrase required".

use std::fmt;

use url::form_urlencoded;

use crate::SecretKey;

/// Path segment under which secrets are addressed.
pub const SECRETS_SEGMENT: &str = "secrets";

/// Query parameter carrying the passphrase-required flag.
pub const PASSPHRASE_FLAG: &str = "withSecretPhrase";

/// Compose a share link.
pub fn compose(origin: &str, key: &SecretKey, requires_passphrase: bool) -> String {
    let origin = origin.trim_end_matches('/');
    let mut url = format!("{origin}/{SECRETS_SEGMENT}/{key}");
    if requires_passphrase {
        url.push('?');
        url.push_str(PASSPHRASE_FLAG);
        url.push_str("=true");
    }
    url
}

/// Decode the passphrase-required flag from a query string.
///
/// Accepts the query with or without its leading `?`. When the flag appears
/// more than once the first occurrence decides.
pub fn decode(query: &str) -> bool {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == PASSPHRASE_FLAG)
        .is_some_and(|(_, value)| value == "true")
}

/// A composed share link together with the parts it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    url: String,
    key: SecretKey,
    requires_passphrase: bool,
}

impl ShareLink {
    /// Compose a link for `key` under `origin`.
    pub fn new(origin: &str, key: SecretKey, requires_passphrase: bool) -> Self {
        let url = compose(origin, &key, requires_passphrase);
        Self { url, key, requires_passphrase }
    }

    /// Full link text.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Key the link points at.
    pub fn key(&self) -> &SecretKey {
        &self.key
    }

    /// Whether the recipient will be asked for a passphrase.
    pub fn requires_passphrase(&self) -> bool {
        self.requires_passphrase
    }
}

impl fmt::Display for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> SecretKey {
        SecretKey::parse(raw).unwrap()
    }

    #[test]
    fn compose_without_passphrase_has_no_query() {
        insta::assert_snapshot!(compose("https://host", &key("abc123"), false), @"https://host/secrets/abc123");
    }

    #[test]
    fn compose_with_passphrase_sets_flag() {
        insta::assert_snapshot!(
            compose("https://host", &key("abc123"), true),
            @"https://host/secrets/abc123?withSecretPhrase=true"
        );
    }

    #[test]
    fn compose_trims_trailing_slash() {
        assert_eq!(compose("https://host/", &key("k"), false), "https://host/secrets/k");
    }

    #[test]
    fn decode_requires_exact_true() {
        assert!(decode("withSecretPhrase=true"));
        assert!(decode("?withSecretPhrase=true"));
        assert!(decode("a=1&withSecretPhrase=true"));

        assert!(!decode(""));
        assert!(!decode("?"));
        assert!(!decode("withSecretPhrase"));
        assert!(!decode("withSecretPhrase="));
        assert!(!decode("withSecretPhrase=TRUE"));
        assert!(!decode("withSecretPhrase=1"));
        assert!(!decode("withsecretphrase=true"));
    }

    #[test]
    fn decode_first_occurrence_wins() {
        assert!(decode("withSecretPhrase=true&withSecretPhrase=false"));
        assert!(!decode("withSecretPhrase=false&withSecretPhrase=true"));
    }

    #[test]
    fn decode_percent_encoded_value() {
        assert!(decode("withSecretPhrase=%74rue"));
    }

    #[test]
    fn share_link_keeps_parts() {
        let link = ShareLink::new("https://host", key("abc123"), true);
        assert_eq!(link.key().as_str(), "abc123");
        assert!(link.requires_passphrase());
        assert_eq!(link.to_string(), link.url());
    }
}
