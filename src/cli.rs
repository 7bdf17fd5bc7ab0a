//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for Mixtape using Clap
//! derive macros. It provides a type-safe way to parse command-line arguments
//! and route them to appropriate functionality.
//!
//! ## Commands
//!
//! - `recommend`: Generate a personalized playlist from listening history
//! - `preset`: Generate a playlist from a named preset configuration
//! - `presets`: List the available preset names
//! - `cluster`: Discover listening-pattern clusters over the catalog
//! - `similar`: Build a similarity playlist around a seed track
//! - `completion`: Generate shell completion scripts
//!
//! ## Examples
//!
//! ```bash
//! mixtape recommend --length 25 --mood happy
//! mixtape preset morning-energy
//! mixtape similar "Miles Davis" "So What"
//! ```

use crate::model::{EnergyLevel, Mood, TimeContext};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
///
/// Uses Clap derive macros to automatically generate argument parsing,
/// help text, and validation. The main structure contains only a subcommand
/// plus the input overrides shared by every command.
#[derive(Parser)]
#[command(name = "mixtape")]
#[command(about = "Mixtape - Personalized playlists from your listening history")]
#[command(version)]
pub struct Args {
    /// Path to the listening history JSON
    ///
    /// Defaults to listening_history.json in the platform data directory.
    #[arg(long, global = true)]
    pub events: Option<PathBuf>,

    /// Path to the enriched track catalog JSON
    ///
    /// Defaults to track_catalog.json in the platform data directory.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Seed for the exploration jitter
    ///
    /// Runs with the same inputs and seed produce identical playlists.
    #[arg(long, global = true, default_value = "0")]
    pub seed: u64,

    /// Write results to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
///
/// Each variant corresponds to a major piece of functionality in Mixtape.
/// Command arguments are embedded directly in the enum variants for
/// type safety and automatic validation.
#[derive(Subcommand)]
pub enum Command {
    /// Generate a personalized playlist
    ///
    /// Builds a listener profile from the history, filters the catalog by
    /// the requested constraints, scores the survivors, and selects a
    /// diverse playlist with a confidence estimate and an explanation of
    /// the choices made.
    Recommend {
        /// Number of tracks to recommend
        #[arg(short, long, default_value = "20")]
        length: usize,

        /// Restrict candidates to this mood
        #[arg(long)]
        mood: Option<Mood>,

        /// Restrict candidates to this energy band
        #[arg(long)]
        energy: Option<EnergyLevel>,

        /// Familiarity/exploration trade-off
        ///
        /// 0.0 recommends only familiar music, 1.0 only new artists.
        #[arg(short, long, default_value = "0.3")]
        discovery: f64,

        /// Bias scoring toward this time of day
        #[arg(long)]
        time_context: Option<TimeContext>,

        /// Allow tracks played within the last week
        ///
        /// By default recently played tracks are excluded for freshness.
        #[arg(long)]
        include_recent: bool,

        /// Portion of the playlist reserved for favorites, in [0, 1]
        #[arg(long, default_value = "0.2")]
        favorites: f64,

        /// Restrict candidates to these genres (repeatable)
        #[arg(long = "genre")]
        genres: Vec<String>,
    },

    /// Generate a playlist from a named preset
    ///
    /// Presets bundle tested tuning values for common situations, for
    /// example `morning-energy` or `focus-work`. Run `mixtape presets`
    /// for the full list.
    Preset {
        /// Preset name
        name: String,
    },

    /// List the available presets
    Presets,

    /// Discover listening-pattern clusters
    ///
    /// Groups the catalog by audio features (tempo, danceability, valence,
    /// energy) and names each group after its dominant character, for
    /// example "High Energy" or "Chill".
    Cluster,

    /// Build a similarity playlist around a seed track
    ///
    /// Finds the catalog tracks closest to the seed in audio-feature space.
    /// Artist and track matching is case-insensitive.
    Similar {
        /// Seed artist name
        artist: String,

        /// Seed track title
        track: String,
    },

    /// Build similarity playlists around your most played tracks
    SimilarTop {
        /// How many top tracks to seed from
        #[arg(short, long, default_value = "5")]
        count: usize,
    },

    /// Generate shell completions
    ///
    /// Usage: mixtape completion bash > ~/.local/share/bash-completion/completions/mixtape
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
