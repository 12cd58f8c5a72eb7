//! alm-rest - HTTP connector for ALM servers.
//!
//! [`RestConnector`] implements [`alm_core::Connector`] on top of reqwest,
//! keeping the session cookies the authentication point hands out.

mod config;
mod connector;
mod error;

pub use config::{ConnectorConfig, DEFAULT_TIMEOUT, RestConnectorBuilder};
pub use connector::RestConnector;
