//! The recommendation engine: one front door that runs the whole pipeline.
//!
//! Profile building, candidate filtering, scoring, selection, and the
//! confidence/explanation pass are each their own module; this one only
//! orchestrates. The engine owns the listening history and the enriched
//! catalog and can serve any number of requests against them.

use crate::candidates::{self, RelaxedFilter};
use crate::explain;
use crate::model::{ListeningEvent, TrackCatalogEntry};
use crate::profile::ListenerProfile;
use crate::request::RecommendationRequest;
use crate::scoring::{self, ScoredTrack};
use crate::selector;
use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate properties of a finished playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistMetadata {
    pub total_tracks: usize,
    pub unique_artists: usize,
    /// Genre name to track count, sorted for stable output.
    pub genre_distribution: BTreeMap<String, usize>,
    /// Mood name to track count, sorted for stable output.
    pub mood_distribution: BTreeMap<String, usize>,
}

impl PlaylistMetadata {
    fn from_tracks(tracks: &[ScoredTrack]) -> Self {
        let mut artists: Vec<&str> = tracks.iter().map(|t| t.artist.as_str()).collect();
        artists.sort_unstable();
        artists.dedup();

        let mut genre_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut mood_distribution: BTreeMap<String, usize> = BTreeMap::new();
        for track in tracks {
            if let Some(genre) = track.genre.as_deref() {
                *genre_distribution.entry(genre.to_string()).or_default() += 1;
            }
            if let Some(mood) = track.mood {
                *mood_distribution.entry(mood.as_str().to_string()).or_default() += 1;
            }
        }

        Self {
            total_tracks: tracks.len(),
            unique_artists: artists.len(),
            genre_distribution,
            mood_distribution,
        }
    }
}

/// The ordered playlist plus everything needed to audit it.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResult {
    pub tracks: Vec<ScoredTrack>,
    /// Heuristic data-availability confidence in [0, 1].
    pub confidence: f64,
    /// Human-readable account of the active constraints and any relaxations.
    pub explanation: String,
    pub relaxed_filters: Vec<RelaxedFilter>,
    pub metadata: PlaylistMetadata,
    pub generated_at: DateTime<Utc>,
}

/// Recommendation engine over a fixed listening history and catalog.
///
/// All randomness flows from the explicit `seed`, so a run is reproducible
/// given the same inputs and reference time.
#[derive(Debug)]
pub struct RecommendationEngine {
    events: Vec<ListeningEvent>,
    catalog: Vec<TrackCatalogEntry>,
    seed: u64,
}

impl RecommendationEngine {
    #[must_use]
    pub fn new(events: Vec<ListeningEvent>, catalog: Vec<TrackCatalogEntry>) -> Self {
        Self {
            events,
            catalog,
            seed: 0,
        }
    }

    /// Replace the jitter seed. Runs with equal inputs, seed, and reference
    /// time produce identical playlists.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &[TrackCatalogEntry] {
        &self.catalog
    }

    #[must_use]
    pub fn events(&self) -> &[ListeningEvent] {
        &self.events
    }

    /// Run the pipeline against the wall clock.
    pub fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResult> {
        self.recommend_at(request, Utc::now())
    }

    /// Run the pipeline against an explicit reference time. Recency and
    /// per-artist age computations all measure from `now`.
    pub fn recommend_at(
        &self,
        request: &RecommendationRequest,
        now: DateTime<Utc>,
    ) -> Result<RecommendationResult> {
        request.validate()?;
        info!(
            "generating {}-track playlist (discovery {:.2})",
            request.playlist_length, request.discovery_level
        );

        let profile = ListenerProfile::build(&self.events, &self.catalog, now);
        let candidates = candidates::generate(&self.catalog, &self.events, request, now);
        let ranked = scoring::score_candidates(&candidates.tracks, &profile, request, self.seed);
        let tracks = selector::select_playlist(
            &ranked,
            request.playlist_length,
            request.favorites_count(),
        );
        debug!(
            "selected {} of {} ranked candidates",
            tracks.len(),
            ranked.len()
        );

        let confidence = explain::confidence(&profile, tracks.len(), request.playlist_length);
        let explanation = explain::explanation(request, &candidates.relaxed, tracks.len());
        let metadata = PlaylistMetadata::from_tracks(&tracks);

        Ok(RecommendationResult {
            tracks,
            confidence,
            explanation,
            relaxed_filters: candidates.relaxed,
            metadata,
            generated_at: now,
        })
    }
}
