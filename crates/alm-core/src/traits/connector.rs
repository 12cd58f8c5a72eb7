//! HTTP connector trait.

use async_trait::async_trait;
use url::Url;

use crate::Result;
use crate::http::{RestRequest, RestResponse};
use crate::types::EntityKind;

/// The transport collaborator every ALM operation runs through.
///
/// A connector owns the HTTP client, the session cookie store and the
/// project-scoped URL layout. Implementations must report any non-success
/// status as [`TransportError::Status`](crate::error::TransportError::Status)
/// carrying the full response, so callers can inspect challenge headers.
#[async_trait]
pub trait Connector: Send + Sync {
    /// URL below an entity collection, e.g. `.../projects/P/runs/12/run-steps`
    /// for `(Run, ["12", "run-steps"])`. Each segment is percent-encoded, so
    /// an identifier can never add path segments, a query or a fragment.
    fn entity_path_url(&self, kind: EntityKind, segments: &[&str]) -> String;

    /// URL of a single entity, e.g. `.../projects/P/runs/12`.
    fn entity_url(&self, kind: EntityKind, id: &str) -> String {
        self.entity_path_url(kind, &[id])
    }

    /// URL of an entity collection, e.g. `.../projects/P/runs`.
    fn entity_collection_url(&self, kind: EntityKind) -> String {
        self.entity_path_url(kind, &[])
    }

    /// Resolve an absolute URL or a server-relative path.
    fn resolve(&self, url: &str) -> Result<Url>;

    /// Execute a request. Non-success statuses are errors.
    async fn execute(&self, request: RestRequest) -> Result<RestResponse>;

    /// Forget all session cookies.
    ///
    /// On failure the old cookies may still be in place.
    async fn clear_session(&self) -> Result<()>;
}
