//! Login command implementation.

use anyhow::{Context, Result};
use tracing::debug;

use alm_core::LoginOutcome;

use crate::cli::ConnectionArgs;
use crate::commands::LiveSession;
use crate::output;
use crate::profile::storage;

pub async fn run(args: &ConnectionArgs) -> Result<()> {
    output::note("Logging in...");

    // Sessions are per process, so the login only proves the credentials.
    let session = LiveSession::open(args).await?;
    let outcome = session.outcome;
    let profile = session.connection.profile();
    session.close().await;

    let profile = profile.context("No username to save")?;
    let path = storage::save_profile(&profile).context("Failed to save profile")?;
    debug!(path = %path.display(), "Profile saved");

    match outcome {
        LoginOutcome::LoggedIn => output::success("Logged in successfully"),
        LoginOutcome::AlreadyAuthenticated => output::success("Already authenticated"),
    }
    println!();
    output::field("server", &profile.server);
    output::field("domain", &profile.domain);
    output::field("project", &profile.project);
    output::field("username", &profile.username);

    Ok(())
}
