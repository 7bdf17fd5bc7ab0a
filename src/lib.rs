//! Mixtape - personalized playlists from your listening history.
//!
//! Mixtape turns a scrobble-style listening history and an enriched track
//! catalog into personalized playlists. It never calls out to a streaming
//! service: everything is computed locally from the two JSON inputs.
//!
//! ## Core Modules
//!
//! - [`engine`] - The recommendation pipeline front door
//! - [`profile`] - Listener profile aggregation from play history
//! - [`candidates`] - Catalog filtering with graceful relaxation
//! - [`scoring`] - Multi-factor track scoring
//! - [`selector`] - Diversity-constrained playlist selection
//! - [`cluster`] - Listening-pattern discovery via k-means
//! - [`similarity`] - Audio-feature similarity playlists
//!
//! ### Supporting Modules
//!
//! - [`model`] - Shared data model (events, catalog entries, moods)
//! - [`request`] - Request validation and the preset catalog
//! - [`features`] - Standardized audio feature table
//! - [`explain`] - Confidence estimation and explanations
//! - [`input`] - JSON loading and output
//! - [`config`] - Data directory management
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use mixtape::engine::RecommendationEngine;
//! use mixtape::request::RecommendationRequest;
//! use mixtape::input;
//! use std::path::Path;
//!
//! let events = input::load_events(Path::new("listening_history.json"))?;
//! let catalog = input::load_catalog(Path::new("track_catalog.json"))?;
//!
//! let engine = RecommendationEngine::new(events, catalog).with_seed(42);
//! let result = engine.recommend(&RecommendationRequest::default())?;
//!
//! println!("{} tracks, confidence {:.2}", result.tracks.len(), result.confidence);
//! println!("{}", result.explanation);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Scoring Details
//!
//! Each candidate gets four sub-scores, all in [0, 1]:
//!
//! - **Familiarity**: play-count ratio blended with recency of last play
//! - **Mood match**: agreement between track mood and the listener's
//!   historical mood preferences
//! - **Temporal fit**: how active the listener is in the requested hours
//! - **Diversity**: bonus for under-played artists plus a seeded jitter
//!
//! The `discovery_level` knob trades familiarity weight for diversity
//! weight; at 0.0 the playlist leans on known favorites, at 1.0 it chases
//! new artists.
//!
//! ## Error Handling
//!
//! Malformed requests and unreadable inputs are errors; sparse data never
//! is. A history-less listener still gets a playlist, with neutral scores
//! and a low confidence estimate.
//!
//! ## Determinism
//!
//! All randomness flows from an explicit seed and all clock reads from an
//! explicit reference time, so identical inputs reproduce identical
//! playlists.

pub mod candidates;
pub mod cli;
pub mod cluster;
pub mod completion;
pub mod config;
pub mod engine;
pub mod explain;
pub mod features;
pub mod input;
pub mod model;
pub mod profile;
pub mod request;
pub mod scoring;
pub mod selector;
pub mod similarity;
