//! Recommendation request configuration, validation, and the preset catalog.
//!
//! A [`RecommendationRequest`] is immutable once built. Shape validation
//! happens exactly once, at the engine entry point; everything downstream can
//! rely on the bounds holding.

use crate::model::{EnergyLevel, Mood, TimeContext};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid request shape, rejected before the pipeline starts. Too little
/// *data* is never an error (the pipeline degrades instead); only a
/// malformed request is.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("playlist_length must be greater than zero")]
    PlaylistLength,
    #[error("discovery_level must be within [0, 1], got {0}")]
    DiscoveryLevel(f64),
    #[error("include_favorites must be within [0, 1], got {0}")]
    IncludeFavorites(f64),
}

/// Immutable configuration for one recommendation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Restrict candidates to this mood.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    /// Restrict candidates to this energy band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<EnergyLevel>,
    /// 0.0 = only familiar, 1.0 = only new. The single knob trading
    /// familiarity against exploration.
    pub discovery_level: f64,
    pub playlist_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_context: Option<TimeContext>,
    /// Anti-join tracks played within the last 7 days.
    pub exclude_recent: bool,
    /// Portion of the playlist reserved for favorites (artist repetition
    /// permitted there).
    pub include_favorites: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_focus: Option<Vec<String>>,
    /// Reserved: carried through for export collaborators, not a filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decade_preference: Option<String>,
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            mood: None,
            energy_level: None,
            discovery_level: 0.3,
            playlist_length: 20,
            time_context: None,
            exclude_recent: true,
            include_favorites: 0.2,
            genre_focus: None,
            decade_preference: None,
        }
    }
}

impl RecommendationRequest {
    /// Validate request bounds. The only hard failure the engine can produce.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.playlist_length == 0 {
            return Err(RequestError::PlaylistLength);
        }
        if !(0.0..=1.0).contains(&self.discovery_level) {
            return Err(RequestError::DiscoveryLevel(self.discovery_level));
        }
        if !(0.0..=1.0).contains(&self.include_favorites) {
            return Err(RequestError::IncludeFavorites(self.include_favorites));
        }
        Ok(())
    }

    /// Number of leading playlist slots reserved for favorites.
    #[must_use]
    pub fn favorites_count(&self) -> usize {
        (self.playlist_length as f64 * self.include_favorites).floor() as usize
    }
}

/// Names of the built-in presets, in presentation order.
pub const PRESET_NAMES: [&str; 6] = [
    "morning-energy",
    "focus-work",
    "evening-chill",
    "weekend-discovery",
    "nostalgic-favorites",
    "party-mix",
];

/// Look up a preset request by name. Tuning values are fixed so thin CLI/UI
/// layers can invoke them without re-deriving them.
#[must_use]
pub fn preset(name: &str) -> Option<RecommendationRequest> {
    let request = match name {
        "morning-energy" => RecommendationRequest {
            mood: Some(Mood::Happy),
            energy_level: Some(EnergyLevel::High),
            discovery_level: 0.2,
            time_context: Some(TimeContext::Morning),
            playlist_length: 25,
            include_favorites: 0.3,
            ..RecommendationRequest::default()
        },
        "focus-work" => RecommendationRequest {
            mood: Some(Mood::Calm),
            energy_level: Some(EnergyLevel::Medium),
            discovery_level: 0.1,
            playlist_length: 30,
            include_favorites: 0.4,
            ..RecommendationRequest::default()
        },
        "evening-chill" => RecommendationRequest {
            mood: Some(Mood::Calm),
            energy_level: Some(EnergyLevel::Low),
            discovery_level: 0.3,
            time_context: Some(TimeContext::Evening),
            playlist_length: 20,
            include_favorites: 0.5,
            ..RecommendationRequest::default()
        },
        "weekend-discovery" => RecommendationRequest {
            discovery_level: 0.8,
            playlist_length: 25,
            include_favorites: 0.1,
            exclude_recent: true,
            ..RecommendationRequest::default()
        },
        "nostalgic-favorites" => RecommendationRequest {
            discovery_level: 0.0,
            playlist_length: 30,
            include_favorites: 0.8,
            exclude_recent: false,
            ..RecommendationRequest::default()
        },
        "party-mix" => RecommendationRequest {
            mood: Some(Mood::Energetic),
            energy_level: Some(EnergyLevel::High),
            discovery_level: 0.4,
            playlist_length: 40,
            include_favorites: 0.3,
            ..RecommendationRequest::default()
        },
        _ => return None,
    };
    Some(request)
}
