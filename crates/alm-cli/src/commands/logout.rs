//! Logout command implementation.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use alm_core::SessionEstablisher;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::profile::storage;

pub async fn run(args: &ConnectionArgs) -> Result<()> {
    match super::resolve(args) {
        Ok(connection) => {
            let session = SessionEstablisher::new(connection.connector()?);
            if let Err(e) = session.logout().await {
                warn!(error = %e, "Server logout failed");
                output::note("Server logout failed, clearing the profile anyway");
            }
        }
        Err(e) => debug!(error = %e, "No server to log out of"),
    }

    if storage::clear_profile().context("Failed to clear profile")? {
        output::success("Logged out, profile cleared");
    } else {
        output::success("Logged out (no saved profile)");
    }

    Ok(())
}
