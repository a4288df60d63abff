//! Combined feed: owned playlists merged with favorited public ones

use crate::types::{Playlist, PlaylistId};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A playlist tagged with the time it entered the user's feed
///
/// For owned playlists this is the creation time, for favorites the time the
/// favorite was recorded.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub playlist: Playlist,
    pub activity_at: DateTime<Utc>,
}

/// Most recent activity first, then higher playlist id first
pub fn feed_order(a: &FeedEntry, b: &FeedEntry) -> Ordering {
    b.activity_at
        .cmp(&a.activity_at)
        .then_with(|| b.playlist.id.cmp(&a.playlist.id))
}

/// Merge feed entries, keeping the latest activity per playlist.
pub fn combine(entries: impl IntoIterator<Item = FeedEntry>) -> Vec<Playlist> {
    let mut latest: HashMap<PlaylistId, FeedEntry> = HashMap::new();

    for entry in entries {
        match latest.get(&entry.playlist.id) {
            Some(existing) if existing.activity_at >= entry.activity_at => {}
            _ => {
                latest.insert(entry.playlist.id, entry);
            }
        }
    }

    let mut merged: Vec<FeedEntry> = latest.into_values().collect();
    merged.sort_by(feed_order);
    merged.into_iter().map(|e| e.playlist).collect()
}
