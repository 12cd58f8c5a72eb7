//! Core ALM types.
//!
//! These types validate at construction time so the connector and facade
//! never see an unusable server address or an unknown entity kind.

mod entity_kind;
mod server_url;

pub use entity_kind::EntityKind;
pub use server_url::ServerUrl;
