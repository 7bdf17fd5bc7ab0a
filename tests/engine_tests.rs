//! # Integration Tests for Mixtape
//!
//! End-to-end tests that exercise the full recommendation pipeline the way
//! a user would: load history and catalog, run a request, inspect the
//! resulting playlist, confidence, and explanation.

use chrono::{DateTime, TimeZone, Utc};
use mixtape::engine::RecommendationEngine;
use mixtape::features::FeatureTable;
use mixtape::model::{ListeningEvent, Mood, TimeContext, TrackCatalogEntry};
use mixtape::request::{preset, RecommendationRequest, PRESET_NAMES};
use mixtape::{cluster, input, similarity};
use std::collections::HashSet;
use std::io::Write;

/// Fixed reference time so recency math is reproducible.
fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn catalog_entry(artist: &str, track: &str, mood: Mood, energy: f64) -> TrackCatalogEntry {
    TrackCatalogEntry {
        artist: artist.to_string(),
        track: track.to_string(),
        album: Some(format!("{artist} Album")),
        genre: Some(if energy > 0.5 { "rock" } else { "ambient" }.to_string()),
        mood: Some(mood),
        energy: Some(energy),
        valence: Some(0.5),
        danceability: Some(0.5),
        tempo: Some(60.0 + energy * 120.0),
        ..TrackCatalogEntry::default()
    }
}

/// A catalog of 40 tracks across 40 artists, half happy/energetic and half
/// calm/quiet.
fn sample_catalog() -> Vec<TrackCatalogEntry> {
    (0..40)
        .map(|i| {
            if i % 2 == 0 {
                catalog_entry(&format!("Artist{i}"), &format!("Track{i}"), Mood::Happy, 0.8)
            } else {
                catalog_entry(&format!("Artist{i}"), &format!("Track{i}"), Mood::Calm, 0.2)
            }
        })
        .collect()
}

/// History concentrated on the first few artists, played in the mornings a
/// month before the reference time.
fn sample_events() -> Vec<ListeningEvent> {
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    (0..60)
        .map(|i| ListeningEvent {
            timestamp: base + chrono::Duration::hours(i64::from(i) * 5),
            artist: format!("Artist{}", i % 5),
            track: format!("Track{}", i % 5),
            album: Some(format!("Artist{} Album", i % 5)),
        })
        .collect()
}

fn engine() -> RecommendationEngine {
    RecommendationEngine::new(sample_events(), sample_catalog()).with_seed(1234)
}

#[test]
fn test_playlist_respects_requested_length() {
    let result = engine()
        .recommend_at(
            &RecommendationRequest {
                playlist_length: 15,
                ..RecommendationRequest::default()
            },
            reference_now(),
        )
        .unwrap();

    assert_eq!(result.tracks.len(), 15);
    assert_eq!(result.metadata.total_tracks, 15);
}

#[test]
fn test_all_scores_bounded_across_discovery_range() {
    for discovery in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let result = engine()
            .recommend_at(
                &RecommendationRequest {
                    discovery_level: discovery,
                    ..RecommendationRequest::default()
                },
                reference_now(),
            )
            .unwrap();

        for track in &result.tracks {
            for score in [
                track.familiarity_score,
                track.mood_score,
                track.temporal_score,
                track.diversity_score,
                track.total_score,
            ] {
                assert!((0.0..=1.0).contains(&score), "discovery {discovery}: {track:?}");
            }
        }
        assert!((0.0..=1.0).contains(&result.confidence));
    }
}

#[test]
fn test_identical_runs_produce_identical_playlists() {
    let request = RecommendationRequest::default();
    let now = reference_now();
    let a = engine().recommend_at(&request, now).unwrap();
    let b = engine().recommend_at(&request, now).unwrap();

    let names_a: Vec<_> = a.tracks.iter().map(|t| (&t.artist, &t.track)).collect();
    let names_b: Vec<_> = b.tracks.iter().map(|t| (&t.artist, &t.track)).collect();
    assert_eq!(names_a, names_b);
    assert_eq!(a.explanation, b.explanation);
}

#[test]
fn test_artists_unique_outside_favorites_slots() {
    let request = RecommendationRequest {
        playlist_length: 20,
        include_favorites: 0.2,
        ..RecommendationRequest::default()
    };
    let result = engine().recommend_at(&request, reference_now()).unwrap();

    // 40 distinct artists are available, so the walk never needs backfill:
    // everything after the 4 favorites slots must be a new artist.
    let favorites = request.favorites_count();
    let mut seen = HashSet::new();
    for track in &result.tracks[favorites..] {
        assert!(seen.insert(track.artist.clone()), "repeat: {}", track.artist);
    }
}

#[test]
fn test_mood_filter_returns_only_matching_tracks() {
    let result = engine()
        .recommend_at(
            &RecommendationRequest {
                mood: Some(Mood::Calm),
                exclude_recent: false,
                ..RecommendationRequest::default()
            },
            reference_now(),
        )
        .unwrap();

    assert!(result.relaxed_filters.is_empty());
    assert!(result.tracks.iter().all(|t| t.mood == Some(Mood::Calm)));
    assert!(result.explanation.contains("calm mood"));
}

#[test]
fn test_unmatchable_filter_relaxes_instead_of_failing() {
    // Nothing in the catalog is energetic-mood, so the filter must be
    // dropped and reported rather than returning an empty playlist.
    let result = engine()
        .recommend_at(
            &RecommendationRequest {
                mood: Some(Mood::Energetic),
                ..RecommendationRequest::default()
            },
            reference_now(),
        )
        .unwrap();

    assert!(!result.tracks.is_empty());
    assert!(!result.relaxed_filters.is_empty());
    assert!(result.explanation.contains("Relaxed the mood filter"));
}

#[test]
fn test_single_artist_catalog_backfills_with_repeats() {
    let catalog: Vec<TrackCatalogEntry> = (0..30)
        .map(|i| catalog_entry("Only Artist", &format!("Track{i}"), Mood::Happy, 0.6))
        .collect();
    let engine = RecommendationEngine::new(Vec::new(), catalog);

    let result = engine
        .recommend_at(
            &RecommendationRequest {
                playlist_length: 10,
                ..RecommendationRequest::default()
            },
            reference_now(),
        )
        .unwrap();

    // Artist uniqueness is impossible; the playlist still fills.
    assert_eq!(result.tracks.len(), 10);
    assert!(result.tracks.iter().all(|t| t.artist == "Only Artist"));
}

#[test]
fn test_empty_history_still_recommends_with_low_confidence() {
    let engine = RecommendationEngine::new(Vec::new(), sample_catalog());
    let result = engine
        .recommend_at(&RecommendationRequest::default(), reference_now())
        .unwrap();

    assert!(!result.tracks.is_empty());
    // Only the enrichment bonus applies: 0.3 base + 0.2.
    assert!((result.confidence - 0.5).abs() < 1e-9);
}

#[test]
fn test_discovery_extremes_change_the_playlist() {
    let familiar = engine()
        .recommend_at(
            &RecommendationRequest {
                discovery_level: 0.0,
                playlist_length: 10,
                exclude_recent: false,
                ..RecommendationRequest::default()
            },
            reference_now(),
        )
        .unwrap();
    let exploratory = engine()
        .recommend_at(
            &RecommendationRequest {
                discovery_level: 1.0,
                playlist_length: 10,
                exclude_recent: false,
                ..RecommendationRequest::default()
            },
            reference_now(),
        )
        .unwrap();

    let known: HashSet<String> = (0..5).map(|i| format!("Artist{i}")).collect();
    let familiar_known = familiar
        .tracks
        .iter()
        .filter(|t| known.contains(&t.artist))
        .count();
    let exploratory_known = exploratory
        .tracks
        .iter()
        .filter(|t| known.contains(&t.artist))
        .count();

    // Full familiarity surfaces the played artists; full discovery avoids
    // them in favor of the 35 never-played ones.
    assert!(familiar_known > exploratory_known);
    assert!(familiar.explanation.contains("familiar favorites"));
    assert!(exploratory.explanation.contains("discovery"));
}

#[test]
fn test_time_context_mentioned_in_explanation() {
    let result = engine()
        .recommend_at(
            &RecommendationRequest {
                time_context: Some(TimeContext::Morning),
                ..RecommendationRequest::default()
            },
            reference_now(),
        )
        .unwrap();
    assert!(result.explanation.contains("morning listening"));
}

#[test]
fn test_every_preset_produces_a_playlist() {
    for name in PRESET_NAMES {
        let request = preset(name).unwrap();
        request.validate().unwrap();
        let result = engine().recommend_at(&request, reference_now()).unwrap();
        assert!(!result.tracks.is_empty(), "preset {name} came back empty");
    }
    assert!(preset("no-such-preset").is_none());
}

#[test]
fn test_clusters_partition_the_catalog() {
    let catalog = sample_catalog();
    let table = FeatureTable::build(&catalog, &sample_events());
    let clusters = cluster::discover_patterns(&table, 77);

    let mut members: Vec<usize> = clusters.iter().flat_map(|c| c.members.clone()).collect();
    members.sort_unstable();
    let expected: Vec<usize> = (0..catalog.len()).collect();
    assert_eq!(members, expected);

    for c in &clusters {
        assert!(!c.name.is_empty());
        assert_eq!(c.size, c.members.len());
        assert!(c.top_tracks.len() <= 25);
    }
}

#[test]
fn test_similarity_playlist_orders_neighbors() {
    let table = FeatureTable::build(&sample_catalog(), &[]);
    let playlist = similarity::similar_tracks(&table, "artist0", "track0").unwrap();

    assert_eq!(playlist.seed_artist, "Artist0");
    assert!(playlist.tracks.len() <= 20);
    assert!(playlist
        .tracks
        .iter()
        .all(|t| !(t.artist == "Artist0" && t.track == "Track0")));
    for pair in playlist.tracks.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
}

#[test]
fn test_json_inputs_flow_through_the_pipeline() {
    let mut events_file = tempfile::NamedTempFile::new().unwrap();
    let mut catalog_file = tempfile::NamedTempFile::new().unwrap();
    serde_json::to_writer(&mut events_file, &sample_events()).unwrap();
    serde_json::to_writer(&mut catalog_file, &sample_catalog()).unwrap();
    events_file.flush().unwrap();
    catalog_file.flush().unwrap();

    let events = input::load_events(events_file.path()).unwrap();
    let catalog = input::load_catalog(catalog_file.path()).unwrap();
    let engine = RecommendationEngine::new(events, catalog).with_seed(1234);

    let result = engine
        .recommend_at(&RecommendationRequest::default(), reference_now())
        .unwrap();
    assert_eq!(result.tracks.len(), 20);
}
