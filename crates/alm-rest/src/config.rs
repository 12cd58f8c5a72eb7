//! Connector configuration.

use std::time::Duration;

use alm_core::error::InvalidInputError;
use alm_core::{Result, ServerUrl};

use crate::connector::RestConnector;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings a [`RestConnector`] is built from.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Server root, in front of `qcbin/`.
    pub server: ServerUrl,
    /// ALM domain holding the project.
    pub domain: String,
    /// ALM project entity calls are scoped to.
    pub project: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
}

impl ConnectorConfig {
    pub fn new(server: ServerUrl, domain: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            server,
            domain: domain.into(),
            project: project.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("alm-rest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Builder for [`RestConnector`].
///
/// ```
/// use std::time::Duration;
/// use alm_core::ServerUrl;
/// use alm_rest::RestConnector;
///
/// let connector = RestConnector::builder(ServerUrl::new("https://alm.example.com").unwrap())
///     .domain("QA")
///     .project("Web")
///     .timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct RestConnectorBuilder {
    server: ServerUrl,
    domain: Option<String>,
    project: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl RestConnectorBuilder {
    pub(crate) fn new(server: ServerUrl) -> Self {
        Self {
            server,
            domain: None,
            project: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the connector.
    ///
    /// # Errors
    ///
    /// Fails if the domain or project is missing or empty, or if the HTTP
    /// client cannot be created.
    pub fn build(self) -> Result<RestConnector> {
        let domain = non_empty(self.domain, "domain")?;
        let project = non_empty(self.project, "project")?;

        let mut config = ConnectorConfig::new(self.server, domain, project);
        config.timeout = self.timeout;
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }

        RestConnector::new(config)
    }
}

fn non_empty(value: Option<String>, what: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            InvalidInputError::Other {
                message: format!("{} is required", what),
            }
            .into()
        })
}
