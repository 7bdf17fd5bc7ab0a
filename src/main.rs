//! # Mixtape - Personalized Playlist Generator
//!
//! Mixtape builds personalized playlists from a scrobble-style listening
//! history and an enriched track catalog, entirely offline.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a default 20-track playlist
//! mixtape recommend
//!
//! # Morning commute playlist
//! mixtape preset morning-energy
//!
//! # Discover your listening patterns
//! mixtape cluster
//!
//! # Tracks similar to a favorite
//! mixtape similar "Miles Davis" "So What"
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::info;
use mixtape::cli;
use mixtape::config::InputPaths;
use mixtape::engine::RecommendationEngine;
use mixtape::features::FeatureTable;
use mixtape::request::{self, RecommendationRequest, PRESET_NAMES};
use mixtape::{cluster, completion, input, similarity};
use std::path::PathBuf;

/// Load both JSON inputs and assemble the engine.
fn build_engine(
    events: Option<PathBuf>,
    catalog: Option<PathBuf>,
    seed: u64,
) -> Result<RecommendationEngine> {
    let paths = InputPaths::resolve(events, catalog)?;
    let events = input::load_events(&paths.events)?;
    let catalog = input::load_catalog(&paths.catalog)?;
    Ok(RecommendationEngine::new(events, catalog).with_seed(seed))
}

/// Load both JSON inputs and build the standardized feature table.
fn build_feature_table(events: Option<PathBuf>, catalog: Option<PathBuf>) -> Result<FeatureTable> {
    let paths = InputPaths::resolve(events, catalog)?;
    let events = input::load_events(&paths.events)?;
    let catalog = input::load_catalog(&paths.catalog)?;
    Ok(FeatureTable::build(&catalog, &events))
}

/// Main entry point for the Mixtape application.
///
/// Initializes logging, parses command-line arguments, and routes commands
/// to the appropriate module functions. All operations return Results for
/// consistent error handling throughout the application.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=debug mixtape recommend` - Enable debug logging
/// - `RUST_LOG=mixtape::scoring=trace mixtape recommend` - Module-specific logging
fn main() -> Result<()> {
    // Initialize environment logger for debugging and monitoring
    env_logger::init();

    // Parse command-line arguments using Clap derive macros
    let args = cli::Args::parse();
    let output = args.output.as_deref();

    // Route commands to appropriate module functions
    match args.command {
        cli::Command::Recommend {
            length,
            mood,
            energy,
            discovery,
            time_context,
            include_recent,
            favorites,
            genres,
        } => {
            let request = RecommendationRequest {
                mood,
                energy_level: energy,
                discovery_level: discovery,
                playlist_length: length,
                time_context,
                exclude_recent: !include_recent,
                include_favorites: favorites,
                genre_focus: if genres.is_empty() { None } else { Some(genres) },
                decade_preference: None,
            };
            let engine = build_engine(args.events, args.catalog, args.seed)?;
            let result = engine.recommend(&request)?;
            input::write_json(&result, output)?;
        }
        cli::Command::Preset { name } => {
            let request = request::preset(&name).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown preset: {name}. Run `mixtape presets` for the available names."
                )
            })?;
            info!("using preset {name}");
            let engine = build_engine(args.events, args.catalog, args.seed)?;
            let result = engine.recommend(&request)?;
            input::write_json(&result, output)?;
        }
        cli::Command::Presets => {
            for name in PRESET_NAMES {
                println!("{name}");
            }
        }
        cli::Command::Cluster => {
            let table = build_feature_table(args.events, args.catalog)?;
            let clusters = cluster::discover_patterns(&table, args.seed);
            input::write_json(&clusters, output)?;
        }
        cli::Command::Similar { artist, track } => {
            let table = build_feature_table(args.events, args.catalog)?;
            let playlist = similarity::similar_tracks(&table, &artist, &track)?;
            input::write_json(&playlist, output)?;
        }
        cli::Command::SimilarTop { count } => {
            let table = build_feature_table(args.events, args.catalog)?;
            let playlists = similarity::similar_to_top_played(&table, count)?;
            input::write_json(&playlists, output)?;
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(
                completion::shell_to_completion_shell(&shell),
                &mut cmd,
            );
        }
    }

    Ok(())
}
