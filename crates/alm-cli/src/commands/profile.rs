//! Profile command implementation.

use anyhow::{Context, Result};

use crate::output;
use crate::profile::storage;

pub fn run() -> Result<()> {
    let profile = storage::load_profile()
        .context("Failed to load profile")?
        .context("No saved profile. Run 'alm login' first.")?;

    output::field("server", &profile.server);
    output::field("domain", &profile.domain);
    output::field("project", &profile.project);
    output::field("username", &profile.username);

    Ok(())
}
