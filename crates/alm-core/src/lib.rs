//! alm-core - Core types and traits for ALM REST clients.
//!
//! Sessions are established with a [`SessionEstablisher`]; entity calls go
//! through an [`AlmClient`]. Both run on top of a [`Connector`], which owns
//! the actual HTTP transport and the session cookies.

pub mod auth;
pub mod client;
pub mod credentials;
pub mod error;
pub mod http;
pub mod model;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthPoint, AuthStatus, LoginOutcome, SessionEstablisher};
pub use client::{AlmClient, AttachmentOwner};
pub use credentials::Credentials;
pub use error::Error;
pub use http::{Method, RestBody, RestRequest, RestResponse};
pub use model::{
    Attachment, Collection, Entity, Run, RunStep, RunSteps, Test, TestInstance, TestInstances,
    TestSet, TypedEntity,
};
pub use traits::Connector;
pub use types::{EntityKind, ServerUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
