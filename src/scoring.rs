//! Multi-factor candidate scoring.
//!
//! Each candidate gets four bounded sub-scores (familiarity, mood match,
//! temporal match, diversity/discovery) folded into a single total. The
//! formula is deliberately an additive fixed-weight sum, not a learned
//! ranker: every total can be decomposed back into its parts, which is what
//! makes the explanation composer possible. `discovery_level` is the single
//! knob trading familiarity against exploration.

use crate::model::{Mood, TimeContext, TrackCatalogEntry};
use crate::profile::ListenerProfile;
use crate::request::RecommendationRequest;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Weight of play-count normalization vs. recency inside familiarity.
const FAMILIARITY_PLAY_WEIGHT: f64 = 0.7;
const FAMILIARITY_RECENCY_WEIGHT: f64 = 0.3;
/// Fixed weights of the mood and temporal terms in the total.
const MOOD_WEIGHT: f64 = 0.3;
const TEMPORAL_WEIGHT: f64 = 0.2;
/// Diversity default for artists with no listening history: favors discovery.
const UNKNOWN_ARTIST_DIVERSITY: f64 = 0.8;
/// Upper bound of the uniform exploration jitter added to diversity.
const DIVERSITY_JITTER: f64 = 0.2;
/// Neutral stand-in whenever a signal is unspecified or data is absent.
const NEUTRAL: f64 = 0.5;

/// A candidate annotated with its sub-scores. Plain serializable value
/// object; safe to hand to any export or UI collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTrack {
    pub artist: String,
    pub track: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub familiarity_score: f64,
    pub mood_score: f64,
    pub temporal_score: f64,
    pub diversity_score: f64,
    pub total_score: f64,
}

/// Score and rank candidates, best first.
///
/// Fully deterministic for a fixed `seed`: the jitter stream is drawn from a
/// seeded [`StdRng`] in candidate order, and ties fall back to catalog order.
#[must_use]
pub fn score_candidates(
    candidates: &[&TrackCatalogEntry],
    profile: &ListenerProfile,
    request: &RecommendationRequest,
    seed: u64,
) -> Vec<ScoredTrack> {
    let max_plays = profile.max_artist_plays();
    // Constant across candidates; hoisted out of the loop.
    let temporal = temporal_score(profile, request.time_context);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut scored: Vec<ScoredTrack> = candidates
        .iter()
        .map(|entry| {
            let familiarity = familiarity_score(profile, &entry.artist, max_plays);
            let mood = mood_score(profile, entry.mood, request.mood);
            let diversity = diversity_score(profile, &entry.artist, rng.gen::<f64>());
            let total = total_score(
                familiarity,
                mood,
                temporal,
                diversity,
                request.discovery_level,
            );

            ScoredTrack {
                artist: entry.artist.clone(),
                track: entry.track.clone(),
                album: entry.album.clone(),
                mood: entry.mood,
                genre: entry.genre.clone(),
                familiarity_score: familiarity,
                mood_score: mood,
                temporal_score: temporal,
                diversity_score: diversity,
                total_score: total,
            }
        })
        .collect();

    // Stable sort keeps catalog order for exact ties.
    scored.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored
}

/// familiarity = 0.7 * (plays / max plays) + 0.3 * recency. Unknown artists
/// score 0: familiarity measures history, absence of history is absence of
/// familiarity rather than a neutral signal.
fn familiarity_score(profile: &ListenerProfile, artist: &str, max_plays: u64) -> f64 {
    let Some(stats) = profile.artists.get(artist) else {
        return 0.0;
    };
    let normalized_plays = if max_plays > 0 {
        stats.play_count as f64 / max_plays as f64
    } else {
        0.0
    };
    clamp01(
        FAMILIARITY_PLAY_WEIGHT * normalized_plays
            + FAMILIARITY_RECENCY_WEIGHT * stats.recency_score,
    )
}

/// Matching tracks score 0.8 plus a fifth of the listener's historical
/// preference for that mood; non-matching score 0.3. Neutral 0.5 when no
/// mood was requested or no mood data exists.
fn mood_score(
    profile: &ListenerProfile,
    candidate_mood: Option<Mood>,
    requested: Option<Mood>,
) -> f64 {
    let Some(requested) = requested else {
        return NEUTRAL;
    };
    if profile.moods.is_empty() || candidate_mood.is_none() {
        return NEUTRAL;
    }
    if candidate_mood == Some(requested) {
        let preference = profile
            .moods
            .get(&requested)
            .map_or(0.1, |s| s.preference_score);
        clamp01(0.8 + 0.2 * preference)
    } else {
        0.3
    }
}

/// Mean hourly activity over the context's hours, normalized by the peak
/// hour. Neutral 0.5 without a context or without temporal data.
fn temporal_score(profile: &ListenerProfile, context: Option<TimeContext>) -> f64 {
    let Some(context) = context else {
        return NEUTRAL;
    };
    let max_activity = profile.temporal.max_hourly();
    if max_activity == 0 {
        return NEUTRAL;
    }
    let hours = context.hours();
    let mean_activity: f64 = hours
        .iter()
        .map(|&h| profile.temporal.hourly[h as usize] as f64)
        .sum::<f64>()
        / hours.len() as f64;
    clamp01(mean_activity / max_activity as f64)
}

/// Artist diversity (unique albums per play), defaulting high for unknown
/// artists, plus seeded jitter to break ties and nudge exploration.
fn diversity_score(profile: &ListenerProfile, artist: &str, jitter: f64) -> f64 {
    let base = profile
        .artists
        .get(artist)
        .map_or(UNKNOWN_ARTIST_DIVERSITY, |s| s.diversity_score);
    clamp01(base + jitter * DIVERSITY_JITTER)
}

/// Weighted sum normalized by the weight mass so the total stays in [0, 1]
/// for any discovery level. Normalization preserves ordering.
fn total_score(
    familiarity: f64,
    mood: f64,
    temporal: f64,
    diversity: f64,
    discovery_level: f64,
) -> f64 {
    let weighted = familiarity * (1.0 - discovery_level)
        + mood * MOOD_WEIGHT
        + temporal * TEMPORAL_WEIGHT
        + diversity * discovery_level;
    let weight_mass = (1.0 - discovery_level) + MOOD_WEIGHT + TEMPORAL_WEIGHT + discovery_level;
    clamp01(weighted / weight_mass)
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}
