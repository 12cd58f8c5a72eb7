//! Status command implementation.

use anyhow::{Context, Result};

use alm_core::{AuthStatus, SessionEstablisher};

use crate::cli::ConnectionArgs;
use crate::output;

pub async fn run(args: &ConnectionArgs) -> Result<()> {
    let connection = super::resolve(args)?;
    let session = SessionEstablisher::new(connection.connector()?);

    match session.probe().await.context("Failed to probe server")? {
        AuthStatus::Authenticated => output::field("status", "authenticated"),
        AuthStatus::Challenged(point) => {
            output::field("status", "challenged");
            output::field("authentication point", point.as_str());
        }
    }

    Ok(())
}
