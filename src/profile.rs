//! Listener profile construction.
//!
//! Aggregates the raw event log (plus optional catalog enrichment) into
//! per-artist, per-mood, per-genre, and per-time-bucket statistics. Profiles
//! are rebuilt fresh on every run and consumed read-only downstream; nothing
//! here is mutated incrementally or cached across runs.

use crate::model::{ListeningEvent, Mood, TrackCatalogEntry, TrackKey};
use chrono::{DateTime, Datelike, Timelike, Utc};
use log::{debug, info};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Listening statistics for one artist.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistProfile {
    pub play_count: u64,
    pub first_played: DateTime<Utc>,
    pub last_played: DateTime<Utc>,
    pub unique_albums: u64,
    /// 1 / (1 + days_since_last / 30): decays over months, always in (0, 1].
    pub recency_score: f64,
    /// unique_albums / play_count, in [0, 1].
    pub diversity_score: f64,
}

/// Aggregate for one mood or genre category.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryStats {
    pub total_plays: u64,
    /// Share of all enriched plays landing in this category. Sums to 1.0
    /// across categories whenever at least one enriched play exists.
    pub preference_score: f64,
}

/// Hour-of-day and day-of-week play-count aggregates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemporalProfile {
    /// Index 0..24.
    pub hourly: [u64; 24],
    /// Index 0..7, Monday first (`Weekday::num_days_from_monday`).
    pub daily: [u64; 7],
}

impl TemporalProfile {
    #[must_use]
    pub fn max_hourly(&self) -> u64 {
        self.hourly.iter().copied().max().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hourly.iter().all(|&c| c == 0)
    }
}

/// Run-scoped lookup from track identity to its catalog entry.
///
/// Owned by the profile builder and passed around explicitly; replaces the
/// module-level enrichment caches of older designs.
#[derive(Debug)]
pub struct EnrichmentIndex<'a> {
    by_key: HashMap<TrackKey, &'a TrackCatalogEntry>,
}

impl<'a> EnrichmentIndex<'a> {
    #[must_use]
    pub fn new(catalog: &'a [TrackCatalogEntry]) -> Self {
        let mut by_key = HashMap::with_capacity(catalog.len());
        for entry in catalog {
            // Last entry wins; upstream guarantees at most one per key.
            by_key.insert(entry.key(), entry);
        }
        Self { by_key }
    }

    #[must_use]
    pub fn get(&self, key: &TrackKey) -> Option<&'a TrackCatalogEntry> {
        self.by_key.get(key).copied()
    }

    /// Deduplicated catalog entries, one per track identity.
    pub fn entries(&self) -> impl Iterator<Item = &'a TrackCatalogEntry> + '_ {
        self.by_key.values().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Snapshot of everything the scorer needs to know about the listener.
/// Built once per run, consumed read-only.
#[derive(Debug, Clone, Default)]
pub struct ListenerProfile {
    pub artists: HashMap<String, ArtistProfile>,
    pub moods: HashMap<Mood, CategoryStats>,
    pub genres: HashMap<String, CategoryStats>,
    pub temporal: TemporalProfile,
    /// Plays per (artist, track), from the raw event log.
    pub track_plays: HashMap<TrackKey, u64>,
    /// Whether any catalog entry carried enrichment. Feeds confidence.
    pub has_enrichment: bool,
}

impl ListenerProfile {
    /// Build the full profile snapshot from the event log and catalog.
    ///
    /// `now` is explicit so recency math is reproducible in tests; callers
    /// normally pass `Utc::now()`. Missing enrichment never errors: tracks
    /// without catalog entries keep their familiarity data and are simply
    /// absent from mood/genre aggregates.
    #[must_use]
    pub fn build(
        events: &[ListeningEvent],
        catalog: &[TrackCatalogEntry],
        now: DateTime<Utc>,
    ) -> Self {
        let enrichment = EnrichmentIndex::new(catalog);
        let track_plays = track_play_counts(events);

        let artists = build_artist_profiles(events, now);
        let (moods, genres) = build_category_profiles(&enrichment, &track_plays);
        let temporal = build_temporal_profile(events);
        let has_enrichment = catalog.iter().any(TrackCatalogEntry::is_enriched);

        info!(
            "profile snapshot: {} artists, {} moods, {} genres, {} catalog entries",
            artists.len(),
            moods.len(),
            genres.len(),
            enrichment.len()
        );

        Self {
            artists,
            moods,
            genres,
            temporal,
            track_plays,
            has_enrichment,
        }
    }

    /// Highest per-artist play count, used to normalize familiarity.
    #[must_use]
    pub fn max_artist_plays(&self) -> u64 {
        self.artists.values().map(|a| a.play_count).max().unwrap_or(0)
    }

    #[must_use]
    pub fn has_history(&self) -> bool {
        !self.artists.is_empty()
    }
}

/// Count plays per (artist, track) across the whole log.
#[must_use]
pub fn track_play_counts(events: &[ListeningEvent]) -> HashMap<TrackKey, u64> {
    let mut counts: HashMap<TrackKey, u64> = HashMap::new();
    for event in events {
        *counts.entry(event.key()).or_default() += 1;
    }
    counts
}

/// Identities of tracks played within the last `days` days before `now`.
#[must_use]
pub fn recently_played(
    events: &[ListeningEvent],
    now: DateTime<Utc>,
    days: i64,
) -> HashSet<TrackKey> {
    let cutoff = now - chrono::Duration::days(days);
    events
        .iter()
        .filter(|e| e.timestamp >= cutoff)
        .map(ListeningEvent::key)
        .collect()
}

fn build_artist_profiles(
    events: &[ListeningEvent],
    now: DateTime<Utc>,
) -> HashMap<String, ArtistProfile> {
    // Group sequentially, then aggregate each artist's slice in parallel.
    // Workers only read shared input and return independent entries.
    let mut by_artist: HashMap<&str, Vec<&ListeningEvent>> = HashMap::new();
    for event in events {
        by_artist.entry(event.artist.as_str()).or_default().push(event);
    }

    let profiles: HashMap<String, ArtistProfile> = by_artist
        .into_par_iter()
        .map(|(artist, plays)| {
            let play_count = plays.len() as u64;
            let first_played = plays.iter().map(|e| e.timestamp).min().unwrap_or(now);
            let last_played = plays.iter().map(|e| e.timestamp).max().unwrap_or(now);
            let unique_albums = plays
                .iter()
                .filter_map(|e| e.album.as_deref())
                .collect::<HashSet<_>>()
                .len() as u64;

            let days_since_last = (now - last_played).num_days().max(0) as f64;
            let recency_score = 1.0 / (1.0 + days_since_last / 30.0);
            let diversity_score = if play_count > 0 {
                unique_albums as f64 / play_count as f64
            } else {
                0.0
            };

            (
                artist.to_string(),
                ArtistProfile {
                    play_count,
                    first_played,
                    last_played,
                    unique_albums,
                    recency_score,
                    diversity_score,
                },
            )
        })
        .collect();

    debug!("built artist profiles for {} artists", profiles.len());
    profiles
}

fn build_category_profiles(
    enrichment: &EnrichmentIndex<'_>,
    track_plays: &HashMap<TrackKey, u64>,
) -> (HashMap<Mood, CategoryStats>, HashMap<String, CategoryStats>) {
    let mut moods: HashMap<Mood, CategoryStats> = HashMap::new();
    let mut genres: HashMap<String, CategoryStats> = HashMap::new();

    for entry in enrichment.entries() {
        let plays = track_plays.get(&entry.key()).copied().unwrap_or(0);
        if let Some(mood) = entry.mood {
            moods.entry(mood).or_default().total_plays += plays;
        }
        if let Some(genre) = entry.genre.as_deref() {
            genres.entry(genre.to_string()).or_default().total_plays += plays;
        }
    }

    normalize_mood_preferences(&mut moods);
    normalize_genre_preferences(&mut genres);

    (moods, genres)
}

/// preference_score = category_total / grand_total. Left at zero when no
/// enriched plays exist.
fn normalize_mood_preferences(stats: &mut HashMap<Mood, CategoryStats>) {
    let grand_total: u64 = stats.values().map(|s| s.total_plays).sum();
    if grand_total == 0 {
        return;
    }
    for stat in stats.values_mut() {
        stat.preference_score = stat.total_plays as f64 / grand_total as f64;
    }
}

fn normalize_genre_preferences(stats: &mut HashMap<String, CategoryStats>) {
    let grand_total: u64 = stats.values().map(|s| s.total_plays).sum();
    if grand_total == 0 {
        return;
    }
    for stat in stats.values_mut() {
        stat.preference_score = stat.total_plays as f64 / grand_total as f64;
    }
}

fn build_temporal_profile(events: &[ListeningEvent]) -> TemporalProfile {
    let mut profile = TemporalProfile::default();
    for event in events {
        profile.hourly[event.timestamp.hour() as usize] += 1;
        profile.daily[event.timestamp.weekday().num_days_from_monday() as usize] += 1;
    }
    profile
}
