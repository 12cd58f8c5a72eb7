//! Error types for ALM clients.
//!
//! Transport failures (including non-success HTTP statuses) are kept apart
//! from protocol violations, where the server answered in a way the client
//! cannot interpret, and from input validation errors raised before any
//! request is sent.

use std::fmt;
use thiserror::Error;

/// The unified error type for ALM operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network or HTTP-layer failure, as reported by the connector.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server broke the expected request/response contract.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (bad server URL, unknown entity kind, missing field).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns the HTTP status if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport(TransportError::Status(e)) => Some(e.status),
            _ => None,
        }
    }

    /// Returns true if the server rejected the request's credentials.
    ///
    /// Outside of the is-authenticated probe, a 401 or 403 means the
    /// credentials (or the session cookies) were not accepted.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Generic HTTP client error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// The server answered with a non-success status.
    #[error("{0}")]
    Status(StatusError),
}

/// A non-success HTTP response, kept whole so callers can inspect it.
#[derive(Debug, Clone)]
pub struct StatusError {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
    /// Response body, lossily decoded as UTF-8.
    pub body: String,
}

impl StatusError {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Returns the first value of the named header (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        let body = self.body.trim();
        if !body.is_empty() {
            write!(f, ": {}", body)?;
        }
        Ok(())
    }
}

impl std::error::Error for StatusError {}

impl From<StatusError> for Error {
    fn from(err: StatusError) -> Self {
        Error::Transport(TransportError::Status(err))
    }
}

/// Responses the client cannot make sense of.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A 401 from the is-authenticated probe without a usable challenge header.
    #[error("invalid authentication point")]
    InvalidAuthenticationPoint,

    /// The challenge header yielded something that is not a URI.
    #[error("malformed authentication point '{value}': {reason}")]
    MalformedAuthenticationPoint { value: String, reason: String },

    /// The response body could not be decoded into the expected type.
    #[error("unexpected response body: {message}")]
    UnexpectedBody { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid server URL.
    #[error("invalid server URL '{value}': {reason}")]
    ServerUrl { value: String, reason: String },

    /// Unknown entity kind name.
    #[error("unknown entity kind '{value}'")]
    EntityKind { value: String },

    /// An entity lacks a field the operation needs.
    #[error("{kind} entity has no '{field}' field")]
    MissingField { kind: String, field: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
