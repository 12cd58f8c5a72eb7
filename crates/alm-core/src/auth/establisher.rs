//! Probe, login and logout.

use tracing::{debug, info, instrument};

use super::challenge::{AuthPoint, AuthStatus};
use crate::credentials::Credentials;
use crate::error::{Error, ProtocolError, TransportError};
use crate::http::RestRequest;
use crate::traits::Connector;
use crate::Result;

/// Answers 200 when the session is valid, 401 with a challenge otherwise.
pub const IS_AUTHENTICATED_PATH: &str = "qcbin/rest/is-authenticated";

/// Invalidates the current session.
pub const LOGOUT_PATH: &str = "qcbin/authentication-point/logout";

const WWW_AUTHENTICATE: &str = "WWW-Authenticate";
const AUTHORIZATION: &str = "Authorization";

/// What [`SessionEstablisher::login`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The probe found a valid session; no credentials were sent.
    AlreadyAuthenticated,
    /// Credentials were accepted at the authentication point.
    LoggedIn,
}

/// Establishes a cookie session on behalf of callers that do not want to
/// know the challenge/response dance.
///
/// Holds no state of its own; the session lives in the connector's cookie
/// store.
///
/// # Example
///
/// ```no_run
/// use alm_core::{Connector, Credentials, SessionEstablisher};
///
/// # async fn example(connector: impl Connector) -> alm_core::Result<()> {
/// let session = SessionEstablisher::new(connector);
/// session.login(&Credentials::new("bob", "secret")).await?;
/// // ... entity calls ...
/// session.logout().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionEstablisher<C> {
    connector: C,
}

impl<C: Connector> SessionEstablisher<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Ask the server whether the current session is authenticated.
    ///
    /// A 401 answer is the expected "not yet" signal and is turned into
    /// [`AuthStatus::Challenged`]. Every other failure is returned as is.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::InvalidAuthenticationPoint`] if the 401 carries no
    /// usable `WWW-Authenticate` header.
    #[instrument(skip(self))]
    pub async fn probe(&self) -> Result<AuthStatus> {
        debug!("Probing authentication state");

        match self
            .connector
            .execute(RestRequest::get(IS_AUTHENTICATED_PATH))
            .await
        {
            Ok(_) => {
                debug!("Session already authenticated");
                Ok(AuthStatus::Authenticated)
            }
            Err(Error::Transport(TransportError::Status(err))) if err.status == 401 => {
                let point = AuthPoint::from_challenge(err.header(WWW_AUTHENTICATE))?;
                debug!(auth_point = %point, "Authentication challenge received");
                Ok(AuthStatus::Challenged(point))
            }
            Err(e) => Err(e),
        }
    }

    /// Probe, then log in at the advertised authentication point if needed.
    ///
    /// Only the path of the authentication point is used; it is requested
    /// from the connector's own server.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::MalformedAuthenticationPoint`] if the advertised
    /// point is not a URI. Characters a URI may not carry unescaped (spaces,
    /// `<>{}|\^` and friends, stray `%`) are rejected rather than encoded.
    /// Failures of the authentication request itself (401/403 for rejected
    /// credentials) are returned unchanged.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        let point = match self.probe().await? {
            AuthStatus::Authenticated => return Ok(LoginOutcome::AlreadyAuthenticated),
            AuthStatus::Challenged(point) => point,
        };

        let url = check_uri_syntax(point.as_str())
            .and_then(|()| {
                self.connector
                    .resolve(point.as_str())
                    .map_err(|e| e.to_string())
            })
            .map_err(|reason| ProtocolError::MalformedAuthenticationPoint {
                value: point.to_string(),
                reason,
            })?;

        self.login_at(url.path(), credentials).await?;
        Ok(LoginOutcome::LoggedIn)
    }

    /// Present credentials at a known authentication point, skipping the probe.
    ///
    /// On success the server sets session cookies, which the connector keeps.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login_at(&self, auth_point: &str, credentials: &Credentials) -> Result<()> {
        info!("Authenticating");

        let request =
            RestRequest::get(auth_point).header(AUTHORIZATION, credentials.basic_auth_header());
        self.connector.execute(request).await?;

        debug!("Authenticated");
        Ok(())
    }

    /// Invalidate the server session and drop the local cookies.
    ///
    /// Always issues the logout request, whatever the current state.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        info!("Logging out");

        self.connector
            .execute(RestRequest::get(LOGOUT_PATH))
            .await?;
        self.connector.clear_session().await?;

        Ok(())
    }
}

/// Reject text that is not valid URI syntax.
///
/// URL parsing would percent-encode these characters and carry on; an
/// authentication point containing them is treated as malformed instead.
fn check_uri_syntax(value: &str) -> std::result::Result<(), String> {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'%' => {
                let escape = bytes.get(i + 1..i + 3);
                if !escape.is_some_and(|e| e.iter().all(u8::is_ascii_hexdigit)) {
                    return Err(format!("malformed escape at index {}", i));
                }
                i += 3;
                continue;
            }
            b' ' | b'"' | b'<' | b'>' | b'\\' | b'^' | b'`' | b'{' | b'|' | b'}' => {
                return Err(format!("illegal character {:?} at index {}", b as char, i));
            }
            _ if b.is_ascii_control() => {
                return Err(format!("illegal control character at index {}", i));
            }
            _ => {}
        }
        i += 1;
    }
    Ok(())
}
