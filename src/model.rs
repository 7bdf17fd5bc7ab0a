//! Core data model: listening events, catalog entries, and the closed
//! category types (mood, energy band, time context) used across the pipeline.
//!
//! Everything here is a plain serializable value object. Optional enrichment
//! fields degrade gracefully; no lookup in this module can fail.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the raw-tag to canonical-mood mapping table.
///
/// Bump whenever [`Mood::from_raw_tag`] changes, so enriched data produced
/// against an older table can be re-mapped.
pub const TAG_MAP_VERSION: u32 = 1;

/// One historical play record: who/what/when. Supplied by the listening
/// history collaborator, pre-deduplicated by (artist, track, timestamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListeningEvent {
    /// Play time, serialized as unix seconds (the scrobble convention).
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub artist: String,
    pub track: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

/// One catalog row from the metadata enrichment collaborator. At most one
/// entry exists per (artist, track); every enrichment field may be absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackCatalogEntry {
    pub artist: String,
    pub track: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    /// Intensity in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    /// Musical positivity in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub danceability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Beats per minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f64>,
    /// Track length in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl TrackCatalogEntry {
    /// Whether any enrichment field is populated. Entries without enrichment
    /// keep their familiarity data but are excluded from mood/genre
    /// aggregates.
    #[must_use]
    pub fn is_enriched(&self) -> bool {
        self.mood.is_some()
            || self.energy.is_some()
            || self.valence.is_some()
            || self.danceability.is_some()
            || self.genre.is_some()
            || self.tempo.is_some()
    }

    #[must_use]
    pub fn key(&self) -> TrackKey {
        TrackKey::new(&self.artist, &self.track)
    }
}

/// Identity of a track for joins and recency exclusion. Case-insensitive so
/// scrobbler capitalization drift doesn't split a track in two.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackKey {
    artist: String,
    track: String,
}

impl TrackKey {
    #[must_use]
    pub fn new(artist: &str, track: &str) -> Self {
        Self {
            artist: artist.to_lowercase(),
            track: track.to_lowercase(),
        }
    }
}

impl ListeningEvent {
    #[must_use]
    pub fn key(&self) -> TrackKey {
        TrackKey::new(&self.artist, &self.track)
    }
}

/// Closed canonical mood vocabulary.
///
/// Raw provider tags are folded into these categories through
/// [`Mood::from_raw_tag`] instead of ad hoc substring matching, so mood
/// scoring stays type-safe and the mapping stays testable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Calm,
    Energetic,
    Melancholic,
    Intense,
    Romantic,
    Angry,
}

impl Mood {
    /// Map a raw provider tag to a canonical mood. Unknown tags map to
    /// `None`; they never error. Table version: [`TAG_MAP_VERSION`].
    #[must_use]
    pub fn from_raw_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "happy" | "joyful" | "cheerful" | "upbeat" => Some(Self::Happy),
            "sad" | "sorrowful" | "mournful" => Some(Self::Sad),
            "calm" | "peaceful" | "relaxed" | "mellow" | "chill" => Some(Self::Calm),
            "energetic" | "lively" | "exciting" | "driving" => Some(Self::Energetic),
            "melancholic" | "melancholy" | "wistful" | "bittersweet" => Some(Self::Melancholic),
            "intense" | "dramatic" | "epic" | "brooding" => Some(Self::Intense),
            "romantic" | "sensual" | "tender" => Some(Self::Romantic),
            "angry" | "aggressive" | "hostile" => Some(Self::Angry),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Calm => "calm",
            Self::Energetic => "energetic",
            Self::Melancholic => "melancholic",
            Self::Intense => "intense",
            Self::Romantic => "romantic",
            Self::Angry => "angry",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested energy band. Boundaries follow the enrichment convention:
/// low < 0.3, medium in [0.3, 0.7), high >= 0.7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    /// Band an energy value in [0, 1].
    #[must_use]
    pub fn band(energy: f64) -> Self {
        if energy >= 0.7 {
            Self::High
        } else if energy >= 0.3 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-of-day listening context. The hour ranges implied by each context
/// drive the temporal sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeContext {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeContext {
    /// Hours of the day covered by this context. Night wraps midnight.
    #[must_use]
    pub fn hours(&self) -> &'static [u32] {
        match self {
            Self::Morning => &[6, 7, 8, 9, 10, 11],
            Self::Afternoon => &[12, 13, 14, 15, 16, 17],
            Self::Evening => &[18, 19, 20, 21],
            Self::Night => &[22, 23, 0, 1, 2, 3, 4, 5],
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for TimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
