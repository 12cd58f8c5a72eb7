//! reqwest-backed connector.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace, warn};
use url::Url;

use alm_core::error::{InvalidInputError, StatusError};
use alm_core::http::CONTENT_TYPE_JSON;
use alm_core::{Connector, EntityKind, Method, RestRequest, RestResponse, Result};

use crate::config::{ConnectorConfig, RestConnectorBuilder};
use crate::error::transport_error;

/// HTTP connector for one ALM project.
///
/// Cheap to clone; clones share the HTTP client and therefore the session
/// cookies.
#[derive(Clone)]
pub struct RestConnector {
    inner: Arc<ConnectorInner>,
}

struct ConnectorInner {
    config: ConnectorConfig,
    /// `<server>/qcbin/rest/domains/<domain>/projects/<project>`
    project_url: Url,
    /// Swapped for a fresh client (and cookie jar) on `clear_session`.
    client: RwLock<reqwest::Client>,
}

impl RestConnector {
    pub fn builder(server: alm_core::ServerUrl) -> RestConnectorBuilder {
        RestConnectorBuilder::new(server)
    }

    /// Create a connector from a complete configuration.
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        let project_url = project_url(&config)?;
        let client = build_client(&config)?;

        debug!(project_url = %project_url, "Connector ready");

        Ok(Self {
            inner: Arc::new(ConnectorInner {
                config,
                project_url,
                client: RwLock::new(client),
            }),
        })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.inner.config
    }

    /// Returns the project-scoped REST root.
    pub fn project_url(&self) -> &str {
        self.inner.project_url.as_str()
    }
}

#[async_trait]
impl Connector for RestConnector {
    fn entity_path_url(&self, kind: EntityKind, segments: &[&str]) -> String {
        let mut url = self.inner.project_url.clone();
        // Always a base: it was built from a validated http(s) server URL.
        if let Ok(mut path) = url.path_segments_mut() {
            path.push(kind.collection()).extend(segments);
        }
        url.to_string()
    }

    fn resolve(&self, url: &str) -> Result<Url> {
        match Url::parse(url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self.inner.config.server.join(url),
            Err(e) => Err(InvalidInputError::Other {
                message: format!("invalid URL '{}': {}", url, e),
            }
            .into()),
        }
    }

    #[instrument(skip(self, request), fields(method = request.method.as_str(), url = %request.url))]
    async fn execute(&self, request: RestRequest) -> Result<RestResponse> {
        let url = self.resolve(&request.url)?;
        let client = self.inner.client.read().await.clone();

        debug!(%url, "ALM request");

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = client.request(method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            trace!(content_type = %body.content_type, size = body.bytes.len(), "request body");
            builder = builder
                .header(CONTENT_TYPE, body.content_type)
                .body(body.bytes);
        }

        let response = builder.send().await.map_err(transport_error)?;

        let status = response.status();
        trace!(status = %status, "ALM response");

        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await.map_err(transport_error)?.to_vec();

        if status.is_success() {
            Ok(RestResponse {
                status: status.as_u16(),
                headers,
                body,
            })
        } else {
            debug!(status = status.as_u16(), "ALM request failed");
            Err(StatusError::new(status.as_u16(), headers, String::from_utf8_lossy(&body)).into())
        }
    }

    #[instrument(skip(self))]
    async fn clear_session(&self) -> Result<()> {
        let client = build_client(&self.inner.config).inspect_err(|e| {
            warn!(error = %e, "Failed to reset HTTP client, cookies kept");
        })?;
        *self.inner.client.write().await = client;
        debug!("Session cookies cleared");
        Ok(())
    }
}

impl std::fmt::Debug for RestConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConnector")
            .field("project_url", &self.inner.project_url.as_str())
            .field("cookies", &"[REDACTED]")
            .finish()
    }
}

fn build_client(config: &ConnectorConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(CONTENT_TYPE_JSON));

    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout)
        .default_headers(headers)
        .cookie_store(true)
        .build()
        .map_err(transport_error)
}

fn project_url(config: &ConnectorConfig) -> Result<Url> {
    let mut url = config.server.join("qcbin/rest")?;
    url.path_segments_mut()
        .map_err(|_| InvalidInputError::Other {
            message: format!("{} cannot be a base URL", config.server),
        })?
        .extend(["domains", config.domain.as_str(), "projects", config.project.as_str()]);

    Ok(url)
}
