//! Candidate generation: filter the enriched catalog down to the tracks
//! eligible for scoring.
//!
//! Filters apply in a fixed order: mood equality, genre focus, energy band,
//! then the 7-day recency anti-join. A filter that would leave the pool empty
//! is skipped with a warning instead of starving the pipeline; the skipped
//! filters are reported so the explanation can mention the relaxation.

use crate::model::{EnergyLevel, ListeningEvent, TrackCatalogEntry};
use crate::profile::recently_played;
use crate::request::RecommendationRequest;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;
use std::fmt;

/// Days a track stays excluded after a play when `exclude_recent` is set.
pub const RECENCY_WINDOW_DAYS: i64 = 7;

/// A request constraint that was dropped because honoring it would have
/// emptied the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelaxedFilter {
    Mood,
    Genre,
    Energy,
    Recency,
}

impl fmt::Display for RelaxedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mood => "mood",
            Self::Genre => "genre",
            Self::Energy => "energy",
            Self::Recency => "recency",
        };
        f.write_str(name)
    }
}

/// Output of candidate generation: the surviving pool plus any relaxations.
#[derive(Debug)]
pub struct CandidateSet<'a> {
    pub tracks: Vec<&'a TrackCatalogEntry>,
    pub relaxed: Vec<RelaxedFilter>,
}

/// Filter the catalog per the request. Pure and deterministic: output order
/// follows catalog order.
#[must_use]
pub fn generate<'a>(
    catalog: &'a [TrackCatalogEntry],
    events: &[ListeningEvent],
    request: &RecommendationRequest,
    now: DateTime<Utc>,
) -> CandidateSet<'a> {
    let mut tracks: Vec<&TrackCatalogEntry> = catalog.iter().collect();
    let mut relaxed = Vec::new();

    if let Some(mood) = request.mood {
        apply_filter(
            &mut tracks,
            &mut relaxed,
            RelaxedFilter::Mood,
            |entry| entry.mood == Some(mood),
        );
    }

    if let Some(genres) = request.genre_focus.as_deref() {
        if !genres.is_empty() {
            apply_filter(&mut tracks, &mut relaxed, RelaxedFilter::Genre, |entry| {
                entry
                    .genre
                    .as_deref()
                    .is_some_and(|g| genres.iter().any(|want| want.eq_ignore_ascii_case(g)))
            });
        }
    }

    if let Some(level) = request.energy_level {
        apply_filter(&mut tracks, &mut relaxed, RelaxedFilter::Energy, |entry| {
            entry.energy.is_some_and(|e| EnergyLevel::band(e) == level)
        });
    }

    if request.exclude_recent {
        let recent = recently_played(events, now, RECENCY_WINDOW_DAYS);
        if !recent.is_empty() {
            apply_filter(&mut tracks, &mut relaxed, RelaxedFilter::Recency, |entry| {
                !recent.contains(&entry.key())
            });
        }
    }

    debug!(
        "{} candidates after filtering ({} relaxed)",
        tracks.len(),
        relaxed.len()
    );

    CandidateSet { tracks, relaxed }
}

/// Retain tracks passing `keep`; when that would empty a non-empty pool,
/// keep the pool as-is and record the relaxation.
fn apply_filter<'a>(
    tracks: &mut Vec<&'a TrackCatalogEntry>,
    relaxed: &mut Vec<RelaxedFilter>,
    filter: RelaxedFilter,
    keep: impl Fn(&TrackCatalogEntry) -> bool,
) {
    if tracks.is_empty() {
        return;
    }
    let filtered: Vec<&TrackCatalogEntry> =
        tracks.iter().copied().filter(|t| keep(t)).collect();
    if filtered.is_empty() {
        warn!("{filter} filter would empty the candidate pool; skipping it");
        relaxed.push(filter);
    } else {
        *tracks = filtered;
    }
}
