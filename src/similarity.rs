//! Similarity playlists: cosine neighbors in standardized feature space.

use crate::features::{FeatureTable, FEATURE_DIMS};
use log::info;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

/// How many neighbors a similarity playlist carries.
const SIMILAR_TRACK_LIMIT: usize = 20;

#[derive(Debug, Error, PartialEq)]
pub enum SimilarityError {
    #[error("track not found in catalog: {artist} - {track}")]
    TrackNotFound { artist: String, track: String },
    #[error("catalog has no tracks to compare against")]
    EmptyCatalog,
}

/// A neighbor of the seed track. `similarity` is cosine, clamped to [0, 1];
/// opposing vectors read as 0, not negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarTrack {
    pub artist: String,
    pub track: String,
    pub similarity: f64,
}

/// A seed track and its nearest neighbors, best first.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityPlaylist {
    pub seed_artist: String,
    pub seed_track: String,
    pub tracks: Vec<SimilarTrack>,
}

/// Up to 20 tracks most similar to the seed, excluding the seed itself.
/// Seed lookup is case-insensitive.
pub fn similar_tracks(
    table: &FeatureTable,
    artist: &str,
    track: &str,
) -> Result<SimilarityPlaylist, SimilarityError> {
    if table.is_empty() {
        return Err(SimilarityError::EmptyCatalog);
    }
    let seed = table
        .position(artist, track)
        .ok_or_else(|| SimilarityError::TrackNotFound {
            artist: artist.to_string(),
            track: track.to_string(),
        })?;
    let seed_vector = table.vectors[seed];

    let mut neighbors: Vec<(usize, f64)> = (0..table.len())
        .into_par_iter()
        .filter(|&idx| idx != seed)
        .map(|idx| {
            let cos = cosine_similarity(&seed_vector, &table.vectors[idx]);
            (idx, cos.clamp(0.0, 1.0))
        })
        .collect();

    neighbors.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    neighbors.truncate(SIMILAR_TRACK_LIMIT);

    info!(
        "{} neighbors for {} - {}",
        neighbors.len(),
        table.rows[seed].artist,
        table.rows[seed].track
    );

    Ok(SimilarityPlaylist {
        seed_artist: table.rows[seed].artist.clone(),
        seed_track: table.rows[seed].track.clone(),
        tracks: neighbors
            .into_iter()
            .map(|(idx, similarity)| SimilarTrack {
                artist: table.rows[idx].artist.clone(),
                track: table.rows[idx].track.clone(),
                similarity,
            })
            .collect(),
    })
}

/// Similarity playlists seeded from the `n` most played tracks.
pub fn similar_to_top_played(
    table: &FeatureTable,
    n: usize,
) -> Result<Vec<SimilarityPlaylist>, SimilarityError> {
    if table.is_empty() {
        return Err(SimilarityError::EmptyCatalog);
    }

    let mut by_plays: Vec<usize> = (0..table.len()).collect();
    by_plays.sort_by(|&a, &b| {
        table.rows[b]
            .play_count
            .cmp(&table.rows[a].play_count)
            .then(a.cmp(&b))
    });

    by_plays
        .into_iter()
        .take(n)
        .map(|idx| similar_tracks(table, &table.rows[idx].artist, &table.rows[idx].track))
        .collect()
}

/// Cosine of the angle between two feature vectors. Zero-magnitude vectors
/// compare as 0.
#[must_use]
pub fn cosine_similarity(a: &[f64; FEATURE_DIMS], b: &[f64; FEATURE_DIMS]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
