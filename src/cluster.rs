//! Listening-pattern discovery: k-means over the standardized feature table.
//!
//! Cluster count scales with catalog size, Lloyd iterations restart ten
//! times from seeded initializations, and the best run by inertia wins.
//! Names come from a fixed rule chain over the raw-space centroid, so a
//! cluster of fast loud tracks is called "High Energy" regardless of where
//! standardization put it.

use crate::features::{FeatureTable, FEATURE_DIMS};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

const RESTARTS: u32 = 10;
const MAX_ITERATIONS: usize = 300;
const CONVERGENCE_TOLERANCE: f64 = 1e-4;
/// Tracks surfaced per cluster in the summary view.
const TOP_TRACKS_PER_CLUSTER: usize = 25;

/// One discovered listening pattern.
#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    pub name: String,
    pub size: usize,
    /// Raw-space feature means of the members: [tempo, danceability,
    /// valence, energy].
    pub centroid: [f64; FEATURE_DIMS],
    /// Indices into the feature table, covering every member.
    pub members: Vec<usize>,
    /// Up to 25 members as (artist, track), most played first.
    pub top_tracks: Vec<(String, String)>,
}

/// Cluster count heuristic: more tracks support finer patterns, capped so
/// small catalogs do not shatter into singletons.
#[must_use]
pub fn cluster_count_for(track_count: usize) -> usize {
    let k = if track_count < 100 {
        4
    } else if track_count < 300 {
        6
    } else if track_count < 500 {
        8
    } else {
        10
    };
    k.min(track_count)
}

/// Partition the feature table into listening-pattern clusters.
///
/// Every track lands in exactly one cluster. Deterministic for a fixed
/// table and seed. Returns an empty vec for an empty table.
#[must_use]
pub fn discover_patterns(table: &FeatureTable, seed: u64) -> Vec<Cluster> {
    if table.is_empty() {
        return Vec::new();
    }
    let k = cluster_count_for(table.len());
    info!("clustering {} tracks into {} patterns", table.len(), k);

    let mut best: Option<(f64, Vec<usize>)> = None;
    for restart in 0..RESTARTS {
        let (inertia, assignments) = lloyd_run(table, k, seed.wrapping_add(u64::from(restart)));
        debug!("restart {restart}: inertia {inertia:.4}");
        if best.as_ref().map_or(true, |(b, _)| inertia < *b) {
            best = Some((inertia, assignments));
        }
    }

    // best is always Some here: the table is non-empty and RESTARTS > 0.
    let (_, assignments) = best.unwrap_or_default();
    build_clusters(table, k, &assignments)
}

/// One seeded Lloyd run. Returns final inertia and per-row assignments.
fn lloyd_run(table: &FeatureTable, k: usize, seed: u64) -> (f64, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = table.len();

    // Initialize centers as k distinct rows.
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);
    let mut centers: Vec<[f64; FEATURE_DIMS]> = indices
        .iter()
        .take(k)
        .map(|&i| table.vectors[i])
        .collect();

    let mut assignments = vec![0usize; n];
    let mut inertia = f64::INFINITY;

    for _ in 0..MAX_ITERATIONS {
        // Assignment step.
        let mut new_inertia = 0.0;
        for (row, assignment) in assignments.iter_mut().enumerate() {
            let (nearest, dist) = nearest_center(&table.vectors[row], &centers);
            *assignment = nearest;
            new_inertia += dist;
        }

        // Update step.
        let mut sums = vec![[0.0; FEATURE_DIMS]; k];
        let mut counts = vec![0usize; k];
        for (row, &assignment) in assignments.iter().enumerate() {
            counts[assignment] += 1;
            for dim in 0..FEATURE_DIMS {
                sums[assignment][dim] += table.vectors[row][dim];
            }
        }
        for cluster in 0..k {
            if counts[cluster] == 0 {
                // Reseed a starved center from the point farthest from its
                // current center.
                let farthest = (0..n)
                    .max_by(|&a, &b| {
                        let da = squared_distance(&table.vectors[a], &centers[assignments[a]]);
                        let db = squared_distance(&table.vectors[b], &centers[assignments[b]]);
                        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .unwrap_or(0);
                centers[cluster] = table.vectors[farthest];
                assignments[farthest] = cluster;
            } else {
                for dim in 0..FEATURE_DIMS {
                    centers[cluster][dim] = sums[cluster][dim] / counts[cluster] as f64;
                }
            }
        }

        if (inertia - new_inertia).abs() < CONVERGENCE_TOLERANCE {
            inertia = new_inertia;
            break;
        }
        inertia = new_inertia;
    }

    (inertia, assignments)
}

fn nearest_center(point: &[f64; FEATURE_DIMS], centers: &[[f64; FEATURE_DIMS]]) -> (usize, f64) {
    let mut nearest = 0;
    let mut best = f64::INFINITY;
    for (idx, center) in centers.iter().enumerate() {
        let dist = squared_distance(point, center);
        if dist < best {
            best = dist;
            nearest = idx;
        }
    }
    (nearest, best)
}

fn squared_distance(a: &[f64; FEATURE_DIMS], b: &[f64; FEATURE_DIMS]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn build_clusters(table: &FeatureTable, k: usize, assignments: &[usize]) -> Vec<Cluster> {
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (row, &assignment) in assignments.iter().enumerate() {
        members[assignment].push(row);
    }

    members
        .into_iter()
        .filter(|m| !m.is_empty())
        .map(|members| {
            let centroid = table.raw_centroid(&members);

            let mut by_plays = members.clone();
            by_plays.sort_by(|&a, &b| {
                table.rows[b]
                    .play_count
                    .cmp(&table.rows[a].play_count)
                    .then(a.cmp(&b))
            });
            let top_tracks = by_plays
                .iter()
                .take(TOP_TRACKS_PER_CLUSTER)
                .map(|&i| (table.rows[i].artist.clone(), table.rows[i].track.clone()))
                .collect();

            Cluster {
                name: name_for_centroid(&centroid).to_string(),
                size: members.len(),
                centroid,
                members,
                top_tracks,
            }
        })
        .collect()
}

/// First matching rule wins; the fallback names the residual cluster.
fn name_for_centroid(centroid: &[f64; FEATURE_DIMS]) -> &'static str {
    let [tempo, danceability, valence, energy] = *centroid;
    if energy > 0.7 && tempo > 130.0 {
        "High Energy"
    } else if danceability > 0.8 && valence > 0.6 {
        "Dance Floor"
    } else if valence > 0.7 && energy < 0.5 {
        "Feel-Good"
    } else if tempo < 100.0 && energy < 0.4 {
        "Chill"
    } else if valence < 0.4 && energy > 0.5 {
        "Intense & Moody"
    } else if tempo > 140.0 && danceability > 0.6 {
        "Electronic Energy"
    } else {
        "Signature Sound"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrackCatalogEntry;

    fn entry(
        artist: &str,
        track: &str,
        tempo: f64,
        danceability: f64,
        valence: f64,
        energy: f64,
    ) -> TrackCatalogEntry {
        TrackCatalogEntry {
            artist: artist.to_string(),
            track: track.to_string(),
            tempo: Some(tempo),
            danceability: Some(danceability),
            valence: Some(valence),
            energy: Some(energy),
            ..TrackCatalogEntry::default()
        }
    }

    fn two_blob_catalog() -> Vec<TrackCatalogEntry> {
        let mut catalog = Vec::new();
        for i in 0..10 {
            let jitter = f64::from(i) * 0.001;
            catalog.push(entry(
                &format!("Fast{i}"),
                &format!("f{i}"),
                160.0 + jitter,
                0.7,
                0.5,
                0.9,
            ));
            catalog.push(entry(
                &format!("Slow{i}"),
                &format!("s{i}"),
                80.0 + jitter,
                0.3,
                0.5,
                0.2,
            ));
        }
        catalog
    }

    #[test]
    fn cluster_count_scales_with_catalog() {
        assert_eq!(cluster_count_for(50), 4);
        assert_eq!(cluster_count_for(100), 6);
        assert_eq!(cluster_count_for(299), 6);
        assert_eq!(cluster_count_for(300), 8);
        assert_eq!(cluster_count_for(500), 10);
        // Never more clusters than tracks.
        assert_eq!(cluster_count_for(2), 2);
    }

    #[test]
    fn every_track_lands_in_exactly_one_cluster() {
        let catalog = two_blob_catalog();
        let table = FeatureTable::build(&catalog, &[]);
        let clusters = discover_patterns(&table, 11);

        let mut seen: Vec<usize> = clusters.iter().flat_map(|c| c.members.clone()).collect();
        seen.sort_unstable();
        let expected: Vec<usize> = (0..catalog.len()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn clustering_is_deterministic_per_seed() {
        let catalog = two_blob_catalog();
        let table = FeatureTable::build(&catalog, &[]);
        let a = discover_patterns(&table, 5);
        let b = discover_patterns(&table, 5);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.members, y.members);
            assert_eq!(x.name, y.name);
        }
    }

    #[test]
    fn separated_blobs_never_share_a_cluster() {
        let catalog = two_blob_catalog();
        let table = FeatureTable::build(&catalog, &[]);
        let clusters = discover_patterns(&table, 3);

        for cluster in &clusters {
            let fast = cluster
                .members
                .iter()
                .filter(|&&i| table.rows[i].artist.starts_with("Fast"))
                .count();
            // Each cluster is all-fast or all-slow.
            assert!(fast == 0 || fast == cluster.members.len(), "{cluster:?}");
        }
    }

    #[test]
    fn naming_rule_chain() {
        assert_eq!(name_for_centroid(&[160.0, 0.5, 0.5, 0.9]), "High Energy");
        assert_eq!(name_for_centroid(&[120.0, 0.9, 0.7, 0.5]), "Dance Floor");
        assert_eq!(name_for_centroid(&[110.0, 0.5, 0.8, 0.4]), "Feel-Good");
        assert_eq!(name_for_centroid(&[90.0, 0.5, 0.5, 0.3]), "Chill");
        assert_eq!(
            name_for_centroid(&[120.0, 0.5, 0.3, 0.6]),
            "Intense & Moody"
        );
        assert_eq!(
            name_for_centroid(&[150.0, 0.7, 0.5, 0.6]),
            "Electronic Energy"
        );
        assert_eq!(
            name_for_centroid(&[110.0, 0.5, 0.5, 0.5]),
            "Signature Sound"
        );
    }

    #[test]
    fn top_tracks_are_most_played_and_capped() {
        let catalog = two_blob_catalog();
        let events: Vec<crate::model::ListeningEvent> = (0..5)
            .map(|i| crate::model::ListeningEvent {
                timestamp: chrono::DateTime::from_timestamp(i64::from(i) * 3600, 0).unwrap(),
                artist: "Fast3".to_string(),
                track: "f3".to_string(),
                album: None,
            })
            .collect();
        let table = FeatureTable::build(&catalog, &events);
        let clusters = discover_patterns(&table, 9);

        let fast_cluster = clusters
            .iter()
            .find(|c| c.top_tracks.iter().any(|(a, _)| a == "Fast3"))
            .unwrap();
        assert_eq!(fast_cluster.top_tracks[0].0, "Fast3");
        assert!(fast_cluster.top_tracks.len() <= TOP_TRACKS_PER_CLUSTER);
    }
}
