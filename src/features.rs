//! Audio feature table shared by clustering and similarity.
//!
//! Both analyses run on the same four-dimensional vector per track (tempo,
//! danceability, valence, energy), standardized column-wise to zero mean and
//! unit variance so tempo's raw magnitude does not dominate the distances.

use crate::model::{ListeningEvent, TrackCatalogEntry};
use crate::profile::track_play_counts;
use log::debug;

/// Feature dimensions, in column order.
pub const FEATURE_DIMS: usize = 4;

/// One track's raw feature vector joined with its play count. Missing
/// enrichment values are treated as 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub artist: String,
    pub track: String,
    pub tempo: f64,
    pub danceability: f64,
    pub valence: f64,
    pub energy: f64,
    pub play_count: u64,
}

impl FeatureRow {
    #[must_use]
    pub fn raw(&self) -> [f64; FEATURE_DIMS] {
        [self.tempo, self.danceability, self.valence, self.energy]
    }
}

/// Standardized feature matrix over a catalog.
///
/// `rows[i]` and `vectors[i]` describe the same track; `vectors` holds the
/// standardized coordinates used for distance computations.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub rows: Vec<FeatureRow>,
    pub vectors: Vec<[f64; FEATURE_DIMS]>,
    means: [f64; FEATURE_DIMS],
    stds: [f64; FEATURE_DIMS],
}

impl FeatureTable {
    /// Build the table from the catalog, joining play counts from the
    /// listening history. Entries with no numeric enrichment at all still
    /// get a row (an all-zero vector before standardization).
    #[must_use]
    pub fn build(catalog: &[TrackCatalogEntry], events: &[ListeningEvent]) -> Self {
        let plays = track_play_counts(events);
        let rows: Vec<FeatureRow> = catalog
            .iter()
            .map(|entry| FeatureRow {
                artist: entry.artist.clone(),
                track: entry.track.clone(),
                tempo: entry.tempo.unwrap_or(0.0),
                danceability: entry.danceability.unwrap_or(0.0),
                valence: entry.valence.unwrap_or(0.0),
                energy: entry.energy.unwrap_or(0.0),
                play_count: plays.get(&entry.key()).copied().unwrap_or(0),
            })
            .collect();

        let (means, stds) = column_stats(&rows);
        let vectors = rows
            .iter()
            .map(|row| {
                let raw = row.raw();
                let mut v = [0.0; FEATURE_DIMS];
                for dim in 0..FEATURE_DIMS {
                    v[dim] = (raw[dim] - means[dim]) / stds[dim];
                }
                v
            })
            .collect();

        debug!("feature table over {} tracks", rows.len());
        Self {
            rows,
            vectors,
            means,
            stds,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a track by case-insensitive (artist, track) match.
    #[must_use]
    pub fn position(&self, artist: &str, track: &str) -> Option<usize> {
        self.rows.iter().position(|row| {
            row.artist.eq_ignore_ascii_case(artist) && row.track.eq_ignore_ascii_case(track)
        })
    }

    /// Raw-space column means over an index subset. Cluster naming operates
    /// on these, not on standardized coordinates.
    #[must_use]
    pub fn raw_centroid(&self, members: &[usize]) -> [f64; FEATURE_DIMS] {
        let mut centroid = [0.0; FEATURE_DIMS];
        if members.is_empty() {
            return centroid;
        }
        for &idx in members {
            let raw = self.rows[idx].raw();
            for dim in 0..FEATURE_DIMS {
                centroid[dim] += raw[dim];
            }
        }
        for value in &mut centroid {
            *value /= members.len() as f64;
        }
        centroid
    }

    #[must_use]
    pub fn means(&self) -> [f64; FEATURE_DIMS] {
        self.means
    }

    #[must_use]
    pub fn stds(&self) -> [f64; FEATURE_DIMS] {
        self.stds
    }
}

/// Population mean and standard deviation per column. A constant column's
/// deviation is forced to 1.0 so standardization maps it to all zeros
/// instead of dividing by zero.
fn column_stats(rows: &[FeatureRow]) -> ([f64; FEATURE_DIMS], [f64; FEATURE_DIMS]) {
    let mut means = [0.0; FEATURE_DIMS];
    let mut stds = [1.0; FEATURE_DIMS];
    if rows.is_empty() {
        return (means, stds);
    }

    let n = rows.len() as f64;
    for row in rows {
        let raw = row.raw();
        for dim in 0..FEATURE_DIMS {
            means[dim] += raw[dim];
        }
    }
    for mean in &mut means {
        *mean /= n;
    }

    for dim in 0..FEATURE_DIMS {
        let variance = rows
            .iter()
            .map(|row| {
                let d = row.raw()[dim] - means[dim];
                d * d
            })
            .sum::<f64>()
            / n;
        let std = variance.sqrt();
        stds[dim] = if std > 0.0 { std } else { 1.0 };
    }

    (means, stds)
}
