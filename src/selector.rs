//! Diversity-constrained playlist selection.
//!
//! A greedy walk over the ranked candidates, modeled as an explicit
//! two-state machine rather than inline counters:
//!
//! ```text
//! FAVORITES --(favorites_count picks)--> DIVERSE
//! ```
//!
//! The favorites phase permits artist repetition so true favorites aren't
//! diversity-starved out of their own recommendations; the diverse phase
//! enforces one track per artist and caps album repeats. When the strict walk
//! cannot fill the playlist (fewer unique artists than remaining slots), a
//! backfill pass relaxes the artist constraint and refills from the ranking.

use crate::scoring::ScoredTrack;
use log::debug;
use std::collections::HashSet;

/// Selection phase. The transition point is enumerable: exactly
/// `favorites_count` accepted picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// Leading slots; artist repetition permitted.
    Favorites,
    /// Remaining slots; one track per artist, capped album repeats.
    Diverse,
}

impl SelectionPhase {
    /// Phase governing the next pick given how many were already accepted.
    #[must_use]
    pub fn for_pick(selected_so_far: usize, favorites_count: usize) -> Self {
        if selected_so_far < favorites_count {
            Self::Favorites
        } else {
            Self::Diverse
        }
    }
}

/// Greedily pick the final ordered playlist from candidates sorted best
/// first. Output length never exceeds `playlist_length`.
#[must_use]
pub fn select_playlist(
    ranked: &[ScoredTrack],
    playlist_length: usize,
    favorites_count: usize,
) -> Vec<ScoredTrack> {
    let mut selected: Vec<ScoredTrack> = Vec::with_capacity(playlist_length);
    let mut used_artists: HashSet<&str> = HashSet::new();
    let mut used_albums: HashSet<(String, String)> = HashSet::new();
    let mut picked: HashSet<(String, String)> = HashSet::new();

    for track in ranked {
        if selected.len() >= playlist_length {
            break;
        }

        match SelectionPhase::for_pick(selected.len(), favorites_count) {
            SelectionPhase::Favorites => {}
            SelectionPhase::Diverse => {
                if used_artists.contains(track.artist.as_str()) {
                    continue;
                }
                // Album repeats are tolerated early on, then capped.
                if selected.len() > 2 * favorites_count
                    && used_albums.contains(&album_key(track))
                {
                    continue;
                }
            }
        }

        used_artists.insert(track.artist.as_str());
        used_albums.insert(album_key(track));
        picked.insert(track_key(track));
        selected.push(track.clone());
    }

    // Escape hatch: the strict walk only comes up short when the pool lacks
    // enough unique artists, so refill from the ranking in order.
    if selected.len() < playlist_length {
        for track in ranked {
            if selected.len() >= playlist_length {
                break;
            }
            if picked.contains(&track_key(track)) {
                continue;
            }
            picked.insert(track_key(track));
            selected.push(track.clone());
        }
        debug!(
            "relaxed artist constraint to backfill playlist to {} tracks",
            selected.len()
        );
    }

    selected
}

fn album_key(track: &ScoredTrack) -> (String, String) {
    (
        track.artist.clone(),
        track.album.clone().unwrap_or_else(|| "Unknown".to_string()),
    )
}

fn track_key(track: &ScoredTrack) -> (String, String) {
    (track.artist.clone(), track.track.clone())
}
