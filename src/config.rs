//! Configuration and data directory management.
//!
//! Mixtape reads two JSON inputs: the listening history and the enriched
//! track catalog. Both default to well-known names inside the
//! platform-appropriate data directory, and both can be overridden per
//! invocation on the command line.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Returns the platform-appropriate data directory for Mixtape
///
/// Creates the directory on first use so callers can rely on it existing.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path to the mixtape data directory
/// * `Err(anyhow::Error)` - If the data directory cannot be determined or created
pub fn get_data_dir() -> Result<PathBuf> {
    // Get platform-appropriate data directory
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        )
    })?;

    // Create mixtape subdirectory
    let mixtape_dir = data_dir.join("mixtape");
    fs::create_dir_all(&mixtape_dir).with_context(|| {
        format!(
            "Failed to create Mixtape data directory at {}. Please check file permissions.",
            mixtape_dir.display()
        )
    })?;

    Ok(mixtape_dir)
}

/// Default location of the listening history JSON
pub fn default_events_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("listening_history.json"))
}

/// Default location of the enriched track catalog JSON
pub fn default_catalog_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("track_catalog.json"))
}

/// Resolved input locations for one invocation
#[derive(Debug, Clone)]
pub struct InputPaths {
    /// Path to the listening history JSON
    pub events: PathBuf,
    /// Path to the track catalog JSON
    pub catalog: PathBuf,
}

impl InputPaths {
    /// Resolve input paths, preferring explicit overrides over the defaults
    pub fn resolve(events: Option<PathBuf>, catalog: Option<PathBuf>) -> Result<Self> {
        let events = match events {
            Some(path) => path,
            None => default_events_path()?,
        };
        let catalog = match catalog {
            Some(path) => path,
            None => default_catalog_path()?,
        };
        Ok(Self { events, catalog })
    }
}
