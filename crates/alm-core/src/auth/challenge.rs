//! Authentication challenge parsing.

use std::fmt;

use crate::error::{Error, ProtocolError};

/// Appended to the realm URL taken from the challenge.
const AUTHENTICATE_SUFFIX: &str = "/authenticate";

/// Outcome of the is-authenticated probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    /// The current session cookies are valid.
    Authenticated,
    /// The server wants credentials at the given point.
    Challenged(AuthPoint),
}

/// The URL where Basic credentials must be presented.
///
/// Only ever derived from a server challenge; there is no constructor that
/// takes a URL directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPoint(String);

impl AuthPoint {
    /// Derive the authentication point from a `WWW-Authenticate` value of
    /// the form `<scheme>="<url>"`.
    ///
    /// The value is split on `=`, trailing empty pieces are dropped, and the
    /// second piece is taken with every `"` removed. A realm containing `=`
    /// (a query string, or a second challenge) is therefore truncated at the
    /// first `=`; servers in the wild only send a single bare realm URL.
    ///
    /// An empty quoted realm (`realm=""`) gives the bare `/authenticate`
    /// path, which then resolves against the connector's server.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::InvalidAuthenticationPoint`] if the header is
    /// missing, blank, or has no second piece (`Basic`, `Basic realm=`).
    pub fn from_challenge(header: Option<&str>) -> Result<Self, Error> {
        let header = header
            .filter(|h| !h.trim().is_empty())
            .ok_or(ProtocolError::InvalidAuthenticationPoint)?;

        let mut pieces: Vec<&str> = header.split('=').collect();
        while pieces.last().is_some_and(|p| p.is_empty()) {
            pieces.pop();
        }

        let realm = pieces
            .get(1)
            .map(|s| s.replace('"', ""))
            .ok_or(ProtocolError::InvalidAuthenticationPoint)?;

        Ok(Self(format!("{}{}", realm, AUTHENTICATE_SUFFIX)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AuthPoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
