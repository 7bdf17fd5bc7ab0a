//! JSON input and output.
//!
//! Listening history and the enriched catalog arrive as JSON arrays written
//! by upstream collaborators (the play logger and the metadata enricher).
//! Results go back out as pretty-printed JSON.

use crate::model::{ListeningEvent, TrackCatalogEntry};
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load the listening history from a JSON array of events.
pub fn load_events(path: &Path) -> Result<Vec<ListeningEvent>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read listening history from {}", path.display()))?;
    let events: Vec<ListeningEvent> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid listening history JSON in {}", path.display()))?;
    info!("loaded {} listening events from {}", events.len(), path.display());
    Ok(events)
}

/// Load the enriched track catalog from a JSON array of entries.
pub fn load_catalog(path: &Path) -> Result<Vec<TrackCatalogEntry>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read track catalog from {}", path.display()))?;
    let catalog: Vec<TrackCatalogEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid track catalog JSON in {}", path.display()))?;
    info!("loaded {} catalog entries from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Serialize any result value as pretty JSON, to a file or stdout.
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    match path {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("wrote output to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_events_with_optional_album() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"timestamp": 1709285400, "artist": "A", "track": "t1", "album": "LP"}},
                {{"timestamp": 1709413200, "artist": "B", "track": "t2"}}
            ]"#
        )
        .unwrap();

        let events = load_events(file.path()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].album.as_deref(), Some("LP"));
        assert_eq!(events[1].album, None);
    }

    #[test]
    fn loads_catalog_with_sparse_enrichment() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"artist": "A", "track": "t1", "mood": "happy", "energy": 0.8, "tempo": 128.0}},
                {{"artist": "B", "track": "t2"}}
            ]"#
        )
        .unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog[0].is_enriched());
        assert!(!catalog[1].is_enriched());
    }

    #[test]
    fn malformed_json_reports_the_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_events(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid listening history JSON"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read track catalog"));
    }

    #[test]
    fn write_json_round_trips_through_a_file() {
        let file = NamedTempFile::new().unwrap();
        let value = vec![TrackCatalogEntry {
            artist: "A".to_string(),
            track: "t1".to_string(),
            ..TrackCatalogEntry::default()
        }];

        write_json(&value, Some(file.path())).unwrap();
        let back = load_catalog(file.path()).unwrap();
        assert_eq!(back, value);
    }
}
