//! Confidence estimation and human-auditable explanations.
//!
//! Confidence is a heuristic over data availability, not a model metric.
//! The explanation is rebuilt deterministically from whichever filters and
//! weights were active, so a reader can audit why the playlist looks the
//! way it does instead of staring at a bare score dump.

use crate::candidates::RelaxedFilter;
use crate::profile::ListenerProfile;
use crate::request::RecommendationRequest;

const BASE_CONFIDENCE: f64 = 0.3;
const DATA_BONUS: f64 = 0.2;
const SHORT_RESULT_PENALTY: f64 = 0.2;

/// Heuristic recommendation confidence in [0, 1].
///
/// Starts from a base and earns a bonus per available data source:
/// enrichment, temporal listening patterns, and artist history. A result
/// shorter than half the requested length costs a penalty.
#[must_use]
pub fn confidence(
    profile: &ListenerProfile,
    selected_len: usize,
    requested_len: usize,
) -> f64 {
    let mut confidence = BASE_CONFIDENCE;
    if profile.has_enrichment {
        confidence += DATA_BONUS;
    }
    if !profile.temporal.is_empty() {
        confidence += DATA_BONUS;
    }
    if profile.has_history() {
        confidence += DATA_BONUS;
    }
    if (selected_len as f64) < 0.5 * requested_len as f64 {
        confidence -= SHORT_RESULT_PENALTY;
    }
    confidence.clamp(0.0, 1.0)
}

/// Compose the explanation sentence list for a finished run.
#[must_use]
pub fn explanation(
    request: &RecommendationRequest,
    relaxed: &[RelaxedFilter],
    selected_len: usize,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(mood) = request.mood {
        parts.push(format!("Focused on {mood} mood tracks"));
    }

    if request.discovery_level > 0.7 {
        parts.push("Emphasizing musical discovery and new artists".to_string());
    } else if request.discovery_level < 0.3 {
        parts.push("Focusing on familiar favorites from your listening history".to_string());
    } else {
        parts.push("Balancing familiar favorites with some discovery".to_string());
    }

    if let Some(context) = request.time_context {
        parts.push(format!("Optimized for {context} listening"));
    }

    if request.exclude_recent {
        parts.push("Excluding recently played tracks for freshness".to_string());
    }

    for filter in relaxed {
        parts.push(format!(
            "Relaxed the {filter} filter because too few tracks matched"
        ));
    }

    if selected_len < request.playlist_length {
        parts.push(format!(
            "Returned {selected_len} of {} requested tracks; the candidate pool was insufficient",
            request.playlist_length
        ));
    }

    let mut text = parts.join(". ");
    text.push('.');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListeningEvent, Mood, TimeContext};
    use chrono::{TimeZone, Utc};

    fn profile_with_events() -> ListenerProfile {
        let events = vec![ListeningEvent {
            timestamp: Utc.timestamp_opt(86_400, 0).unwrap(),
            artist: "A".to_string(),
            track: "t".to_string(),
            album: None,
        }];
        ListenerProfile::build(&events, &[], Utc.timestamp_opt(10 * 86_400, 0).unwrap())
    }

    #[test]
    fn confidence_rises_with_data_sources() {
        let empty = ListenerProfile::default();
        let with_history = profile_with_events();

        // Base only: no enrichment, no patterns, no history.
        assert!((confidence(&empty, 10, 10) - 0.3).abs() < 1e-9);
        // History brings temporal patterns along with artist profiles.
        assert!((confidence(&with_history, 10, 10) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn short_results_cost_confidence() {
        let profile = profile_with_events();
        let full = confidence(&profile, 10, 10);
        let short = confidence(&profile, 4, 10);
        assert!((full - short - SHORT_RESULT_PENALTY).abs() < 1e-9);
        // Exactly half is not "short".
        assert!((confidence(&profile, 5, 10) - full).abs() < 1e-9);
    }

    #[test]
    fn confidence_is_clipped() {
        let profile = ListenerProfile::default();
        let c = confidence(&profile, 0, 100);
        assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn explanation_mentions_active_constraints() {
        let request = RecommendationRequest {
            mood: Some(Mood::Happy),
            discovery_level: 0.1,
            time_context: Some(TimeContext::Morning),
            exclude_recent: true,
            ..RecommendationRequest::default()
        };

        let text = explanation(&request, &[], request.playlist_length);
        assert!(text.contains("happy mood"));
        assert!(text.contains("familiar favorites"));
        assert!(text.contains("morning listening"));
        assert!(text.contains("recently played"));
        assert!(text.ends_with('.'));
    }

    #[test]
    fn explanation_notes_relaxations_and_shortfall() {
        let request = RecommendationRequest {
            playlist_length: 5,
            exclude_recent: false,
            ..RecommendationRequest::default()
        };

        let text = explanation(&request, &[RelaxedFilter::Mood], 3);
        assert!(text.contains("Relaxed the mood filter"));
        assert!(text.contains("Returned 3 of 5 requested tracks"));
    }

    #[test]
    fn discovery_buckets_are_exhaustive() {
        for (level, needle) in [
            (0.0, "familiar favorites"),
            (0.5, "Balancing"),
            (0.9, "discovery and new artists"),
        ] {
            let request = RecommendationRequest {
                discovery_level: level,
                exclude_recent: false,
                ..RecommendationRequest::default()
            };
            let text = explanation(&request, &[], request.playlist_length);
            assert!(text.contains(needle), "level {level}: {text}");
        }
    }
}
