//! Command implementations.

pub mod attach;
mod login;
mod logout;
mod profile;
pub mod run;
pub mod run_step;
mod status;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use alm_core::{AlmClient, Entity, LoginOutcome};
use alm_rest::RestConnector;

use crate::cli::{Commands, ConnectionArgs};
use crate::profile::Connection;
use crate::profile::storage;

pub async fn handle(args: ConnectionArgs, command: Commands) -> Result<()> {
    match command {
        Commands::Status => status::run(&args).await,
        Commands::Login => login::run(&args).await,
        Commands::Logout => logout::run(&args).await,
        Commands::Profile => profile::run(),
        Commands::Test(cmd) => test::run_test(&args, cmd).await,
        Commands::TestSet(cmd) => test::run_test_set(&args, cmd).await,
        Commands::TestInstance(cmd) => test::run_test_instance(&args, cmd).await,
        Commands::Run(cmd) => run::run(&args, cmd).await,
        Commands::RunStep(cmd) => run_step::run(&args, cmd).await,
        Commands::Attach(cmd) => attach::run(&args, cmd).await,
    }
}

/// Resolve the connection from arguments and the saved profile.
pub(crate) fn resolve(args: &ConnectionArgs) -> Result<Connection> {
    let saved = storage::load_profile().context("Failed to load profile")?;
    Connection::resolve(args, saved.as_ref())
}

/// An authenticated client, logged out again by [`LiveSession::close`].
pub(crate) struct LiveSession {
    pub client: AlmClient<RestConnector>,
    pub connection: Connection,
    pub outcome: LoginOutcome,
}

impl LiveSession {
    pub async fn open(args: &ConnectionArgs) -> Result<Self> {
        let connection = resolve(args)?;
        let credentials = connection.credentials()?;
        let client = AlmClient::new(connection.connector()?);

        let outcome = client
            .session()
            .login(&credentials)
            .await
            .context("Failed to login")?;
        debug!(?outcome, "Session established");

        Ok(Self {
            client,
            connection,
            outcome,
        })
    }

    pub async fn close(self) {
        if let Err(e) = self.client.session().logout().await {
            warn!(error = %e, "Logout failed");
        }
    }
}

/// Parse a `name=value` field assignment.
pub(crate) fn parse_field(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty field name in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Apply `--status` and `--field` values to an entity.
pub(crate) fn apply_fields(entity: &mut Entity, status: Option<&str>, fields: &[(String, String)]) {
    if let Some(status) = status {
        entity.set_field("status", status);
    }
    for (name, value) in fields {
        entity.set_field(name.as_str(), value.as_str());
    }
}
