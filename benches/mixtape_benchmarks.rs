//! # Mixtape Performance Benchmarks
//!
//! Benchmarks for the hot paths: profile aggregation, candidate scoring,
//! full pipeline runs, clustering, and similarity scans.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark group
//! cargo bench scoring
//! cargo bench cluster
//! ```

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mixtape::engine::RecommendationEngine;
use mixtape::features::FeatureTable;
use mixtape::model::{ListeningEvent, Mood, TrackCatalogEntry};
use mixtape::profile::ListenerProfile;
use mixtape::request::RecommendationRequest;
use mixtape::{cluster, similarity};
use std::hint::black_box;

fn synthetic_catalog(size: usize) -> Vec<TrackCatalogEntry> {
    (0..size)
        .map(|i| TrackCatalogEntry {
            artist: format!("Artist{}", i % (size / 4).max(1)),
            track: format!("Track{i}"),
            album: Some(format!("Album{}", i % 50)),
            genre: Some(["rock", "jazz", "electronic", "ambient"][i % 4].to_string()),
            mood: Some([Mood::Happy, Mood::Calm, Mood::Energetic, Mood::Sad][i % 4]),
            energy: Some((i % 100) as f64 / 100.0),
            valence: Some(((i * 7) % 100) as f64 / 100.0),
            danceability: Some(((i * 13) % 100) as f64 / 100.0),
            tempo: Some(60.0 + ((i * 3) % 120) as f64),
            ..TrackCatalogEntry::default()
        })
        .collect()
}

fn synthetic_events(count: usize, catalog: &[TrackCatalogEntry]) -> Vec<ListeningEvent> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let entry = &catalog[(i * 17) % catalog.len()];
            ListeningEvent {
                timestamp: base + chrono::Duration::minutes(i as i64 * 37),
                artist: entry.artist.clone(),
                track: entry.track.clone(),
                album: entry.album.clone(),
            }
        })
        .collect()
}

fn bench_profile_building(c: &mut Criterion) {
    let catalog = synthetic_catalog(1000);
    let events = synthetic_events(5000, &catalog);
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    c.bench_function("profile_build_5000_events", |b| {
        b.iter(|| ListenerProfile::build(black_box(&events), black_box(&catalog), now));
    });
}

fn bench_recommendation_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    for size in [200, 1000, 5000] {
        let catalog = synthetic_catalog(size);
        let events = synthetic_events(size * 3, &catalog);
        let engine = RecommendationEngine::new(events, catalog).with_seed(42);
        let request = RecommendationRequest::default();

        group.bench_with_input(BenchmarkId::new("recommend", size), &size, |b, _| {
            b.iter(|| engine.recommend_at(black_box(&request), now).unwrap());
        });
    }
    group.finish();
}

fn bench_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster");

    for size in [200, 1000] {
        let catalog = synthetic_catalog(size);
        let events = synthetic_events(size, &catalog);
        let table = FeatureTable::build(&catalog, &events);

        group.bench_with_input(BenchmarkId::new("discover_patterns", size), &size, |b, _| {
            b.iter(|| cluster::discover_patterns(black_box(&table), 42));
        });
    }
    group.finish();
}

fn bench_similarity(c: &mut Criterion) {
    let catalog = synthetic_catalog(2000);
    let table = FeatureTable::build(&catalog, &[]);
    let seed = &table.rows[0];
    let (artist, track) = (seed.artist.clone(), seed.track.clone());

    c.bench_function("similar_tracks_2000", |b| {
        b.iter(|| similarity::similar_tracks(black_box(&table), &artist, &track).unwrap());
    });
}

criterion_group!(
    benches,
    bench_profile_building,
    bench_recommendation_pipeline,
    bench_clustering,
    bench_similarity
);
criterion_main!(benches);
