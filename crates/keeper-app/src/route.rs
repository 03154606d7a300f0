//! Location routing.
//!
//! Locations come either as bare paths (`/secrets/abc?withSecretPhrase=true`)
//! or as full share links pasted by the user. Only the path and the
//! passphrase flag matter; the origin of a full link is ignored.

use keeper_proto::{SecretKey, link};
use tracing::debug;
use url::Url;

/// Base used to resolve bare paths.
const LOCAL_BASE: &str = "http://localhost/";

/// Page a location resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: the creation form.
    NewSecret,

    /// `/secrets/{key}`: one view of a shared secret.
    ViewSecret {
        /// Key from the path.
        key: SecretKey,
        /// Passphrase flag from the query string.
        requires_passphrase: bool,
    },

    /// Anything else.
    NotFound {
        /// Location as given.
        location: String,
    },
}

impl Route {
    /// Resolve a location.
    ///
    /// Unknown paths, malformed keys and unparseable input all resolve to
    /// [`Route::NotFound`].
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let parsed = match Url::parse(trimmed) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse(LOCAL_BASE).and_then(|base| base.join(trimmed))
            },
            Err(err) => Err(err),
        };

        let Ok(url) = parsed else {
            debug!(location = trimmed, "unparseable location");
            return Self::not_found(trimmed);
        };

        let Some(segments) = url.path_segments() else {
            return Self::not_found(trimmed);
        };
        let mut segments: Vec<&str> = segments.collect();
        if segments.len() > 1 && segments.last() == Some(&"") {
            segments.pop();
        }

        match segments.as_slice() {
            [""] => Self::NewSecret,
            [link::SECRETS_SEGMENT, key] => match SecretKey::parse(*key) {
                Ok(key) => Self::ViewSecret {
                    key,
                    requires_passphrase: link::decode(url.query().unwrap_or_default()),
                },
                Err(err) => {
                    debug!(%err, "malformed secret key in location");
                    Self::not_found(trimmed)
                },
            },
            _ => Self::not_found(trimmed),
        }
    }

    /// Location path (and query) for this route.
    pub fn location(&self) -> String {
        match self {
            Self::NewSecret => "/".to_string(),
            Self::ViewSecret { key, requires_passphrase } => {
                link::compose("", key, *requires_passphrase)
            },
            Self::NotFound { location } => location.clone(),
        }
    }

    fn not_found(location: &str) -> Self {
        Self::NotFound { location: location.to_string() }
    }
}
