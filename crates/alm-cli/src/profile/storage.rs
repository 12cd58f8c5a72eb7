//! Profile storage for persisting connection settings between commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use super::Profile;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

const PROFILE_FILE: &str = "profile.json";

/// Get the profile file path.
fn profile_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "alm").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join(PROFILE_FILE))
}

/// Save the profile to disk.
pub fn save_profile(profile: &Profile) -> Result<PathBuf> {
    let path = profile_path()?;
    write_profile(&path, profile)?;
    Ok(path)
}

/// Load the saved profile, if any.
pub fn load_profile() -> Result<Option<Profile>> {
    read_profile(&profile_path()?)
}

/// Forget the saved profile. Returns true if one existed.
pub fn clear_profile() -> Result<bool> {
    let path = profile_path()?;

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(&path).context("Failed to remove profile file")?;
    Ok(true)
}

fn write_profile(path: &Path, profile: &Profile) -> Result<()> {
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(path, &json).context("Failed to write profile file")?;

    // The profile names the account; keep it private (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

fn read_profile(path: &Path) -> Result<Option<Profile>> {
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(path).context("Failed to read profile file")?;
    let profile = serde_json::from_str(&json).context("Invalid profile file")?;

    Ok(Some(profile))
}
