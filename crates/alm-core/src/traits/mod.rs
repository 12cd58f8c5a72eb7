//! Core traits for transport behavior.

mod connector;

pub use connector::Connector;
