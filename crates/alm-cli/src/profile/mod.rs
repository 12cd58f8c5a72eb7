//! Connection settings: command-line values merged with the saved profile.

pub mod storage;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use alm_core::{Credentials, ServerUrl};
use alm_rest::RestConnector;

use crate::cli::ConnectionArgs;

/// Saved connection settings. Never holds the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub server: String,
    pub domain: String,
    pub project: String,
    pub username: String,
}

/// Fully resolved connection for one command.
pub struct Connection {
    pub server: ServerUrl,
    pub domain: String,
    pub project: String,
    pub username: Option<String>,
    password: Option<String>,
}

impl Connection {
    /// Merge command-line values over the saved profile.
    pub fn resolve(args: &ConnectionArgs, saved: Option<&Profile>) -> Result<Self> {
        let server = args
            .server
            .clone()
            .or_else(|| saved.map(|p| p.server.clone()))
            .context("No server given. Pass --server or set ALM_SERVER.")?;
        let domain = args
            .domain
            .clone()
            .or_else(|| saved.map(|p| p.domain.clone()))
            .context("No domain given. Pass --domain or set ALM_DOMAIN.")?;
        let project = args
            .project
            .clone()
            .or_else(|| saved.map(|p| p.project.clone()))
            .context("No project given. Pass --project or set ALM_PROJECT.")?;
        let username = args
            .username
            .clone()
            .or_else(|| saved.map(|p| p.username.clone()));

        let server = ServerUrl::new(&server).context("Invalid server URL")?;

        Ok(Self {
            server,
            domain,
            project,
            username,
            password: args.password.clone(),
        })
    }

    /// Credentials for the authentication point.
    pub fn credentials(&self) -> Result<Credentials> {
        let Some(username) = &self.username else {
            bail!("No username given. Pass --username or set ALM_USERNAME.");
        };
        let Some(password) = &self.password else {
            bail!("No password given. Pass --password or set ALM_PASSWORD.");
        };

        Ok(Credentials::new(username, password))
    }

    /// The profile to save after a successful login.
    pub fn profile(&self) -> Option<Profile> {
        Some(Profile {
            server: self.server.to_string(),
            domain: self.domain.clone(),
            project: self.project.clone(),
            username: self.username.clone()?,
        })
    }

    pub fn connector(&self) -> Result<RestConnector> {
        RestConnector::builder(self.server.clone())
            .domain(&self.domain)
            .project(&self.project)
            .build()
            .context("Failed to create connector")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved() -> Profile {
        Profile {
            server: "https://alm.example.com/".to_string(),
            domain: "QA".to_string(),
            project: "Web".to_string(),
            username: "bob".to_string(),
        }
    }

    #[test]
    fn falls_back_to_saved_profile() {
        let connection = Connection::resolve(&ConnectionArgs::default(), Some(&saved())).unwrap();

        assert_eq!(connection.server.as_str(), "https://alm.example.com/");
        assert_eq!(connection.domain, "QA");
        assert_eq!(connection.username.as_deref(), Some("bob"));
        assert_eq!(connection.profile(), Some(saved()));
    }

    #[test]
    fn arguments_override_saved_profile() {
        let args = ConnectionArgs {
            project: Some("Mobile".to_string()),
            username: Some("alice".to_string()),
            ..Default::default()
        };
        let connection = Connection::resolve(&args, Some(&saved())).unwrap();

        assert_eq!(connection.domain, "QA");
        assert_eq!(connection.project, "Mobile");
        assert_eq!(connection.username.as_deref(), Some("alice"));
    }

    #[test]
    fn missing_server_is_reported() {
        let args = ConnectionArgs {
            domain: Some("QA".to_string()),
            project: Some("Web".to_string()),
            ..Default::default()
        };
        let err = Connection::resolve(&args, None).err().unwrap();
        assert!(err.to_string().contains("--server"));
    }

    #[test]
    fn credentials_need_a_password() {
        let connection = Connection::resolve(&ConnectionArgs::default(), Some(&saved())).unwrap();
        let err = connection.credentials().err().unwrap();
        assert!(err.to_string().contains("--password"));
    }

    #[test]
    fn profile_never_carries_the_password() {
        let args = ConnectionArgs {
            password: Some("secret".to_string()),
            ..Default::default()
        };
        let connection = Connection::resolve(&args, Some(&saved())).unwrap();
        assert!(connection.credentials().is_ok());

        let json = serde_json::to_string(&connection.profile().unwrap()).unwrap();
        assert!(!json.contains("secret"));
    }
}
