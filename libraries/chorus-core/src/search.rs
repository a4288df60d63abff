//! Free-text playlist search: tokenization and two-tier ranking
//!
//! The store supplies candidate playlists (visible titles that match every
//! token prefix or share enough trigrams with the query) along with an
//! optional full-text relevance score. Ranking
//! happens here so the ordering rules can be tested without a database:
//!
//! 1. Full-text matches rank above similarity-only matches.
//! 2. Inside the full-text group, higher relevance wins.
//! 3. Remaining ties, and the whole similarity-only group, are ordered by
//!    trigram similarity between the title and the raw query.
//! 4. Playlist id ascending breaks any tie left over.
//!
//! Candidates without a full-text match and a similarity at or below
//! [`SIMILARITY_THRESHOLD`] are dropped.

use crate::types::{Playlist, PlaylistId};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Similarity-only matches must score strictly above this
pub const SIMILARITY_THRESHOLD: f64 = 0.3;

/// Split a raw query into lowercase alphanumeric tokens.
///
/// Everything that is not a letter or digit is a separator, so tokens can
/// never carry query-language syntax. Duplicates are removed, first
/// occurrence wins.
pub fn tokenize(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    query
        .split(|c: char| !c.is_alphanumeric())
        // lowercasing can introduce combining marks (e.g. 'İ')
        .map(|t| {
            t.to_lowercase()
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
        })
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}

/// Build an AND-of-prefixes full-text expression from `tokens`.
///
/// Each token is quoted (embedded quotes doubled) and suffixed with `*`, e.g.
/// `"road"* AND "trip"*`. Returns `None` when there is nothing to match.
pub fn fts_prefix_query(tokens: &[String]) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }

    let expr = tokens
        .iter()
        .map(|t| format!("\"{}\"*", t.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" AND ");

    Some(expr)
}

/// Words of `text` padded pg_trgm style.
///
/// Words are lowercased alphanumeric runs, padded with two leading blanks and
/// one trailing blank.
fn padded_words(text: &str) -> impl Iterator<Item = Vec<char>> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|word| {
            "  ".chars()
                .chain(word.chars().flat_map(char::to_lowercase))
                .chain(std::iter::once(' '))
                .collect()
        })
}

/// Trigram set of `text`: every 3-character window of its padded words.
fn trigrams(text: &str) -> HashSet<[char; 3]> {
    padded_words(text)
        .flat_map(|padded| {
            padded
                .windows(3)
                .map(|w| [w[0], w[1], w[2]])
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Text stored in the trigram index for `title`.
///
/// The padded words are concatenated, so every trigram of the title is a
/// substring. Windows that straddle two words end in two blanks and never
/// equal a query trigram.
pub fn trigram_document(title: &str) -> String {
    padded_words(title).flatten().collect()
}

/// Distinct trigrams of `query` as quoted phrases for a trigram index.
pub fn trigram_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = trigrams(query)
        .into_iter()
        .map(|t| {
            let gram: String = t.iter().collect();
            format!("\"{}\"", gram.replace('"', "\"\""))
        })
        .collect();
    terms.sort();
    terms
}

/// Fewest shared trigrams a title needs to clear [`SIMILARITY_THRESHOLD`]
/// against a query with `query_trigrams` distinct trigrams.
///
/// The union is at least as large as the query's set, so `shared / union`
/// can only exceed the threshold when `shared` does relative to the query.
pub fn min_shared_trigrams(query_trigrams: usize) -> f64 {
    SIMILARITY_THRESHOLD * query_trigrams as f64
}

/// Jaccard similarity of the trigram sets of `a` and `b`, in `[0, 1]`.
pub fn trigram_similarity(a: &str, b: &str) -> f64 {
    let left = trigrams(a);
    let right = trigrams(b);

    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    let union = left.len() + right.len() - shared;

    shared as f64 / union as f64
}

/// Playlist returned by the store for ranking
#[derive(Debug, Clone)]
pub struct SearchCandidate {
    pub playlist: Playlist,
    /// Full-text relevance, higher is better. `None` when the title did not
    /// match every query token.
    pub relevance: Option<f64>,
}

/// Ranking key of one candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRank {
    pub id: PlaylistId,
    pub relevance: Option<f64>,
    pub similarity: f64,
}

impl SearchRank {
    /// Whether this candidate survives the similarity cut-off
    pub fn is_relevant(&self) -> bool {
        self.relevance.is_some() || self.similarity > SIMILARITY_THRESHOLD
    }

    /// Best match first
    pub fn compare(&self, other: &Self) -> Ordering {
        let tier = match (self.relevance, other.relevance) {
            (Some(a), Some(b)) => b.total_cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        tier.then_with(|| other.similarity.total_cmp(&self.similarity))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Filter, order and deduplicate `candidates` for `query`.
pub fn rank(query: &str, candidates: impl IntoIterator<Item = SearchCandidate>) -> Vec<Playlist> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(SearchRank, Playlist)> = candidates
        .into_iter()
        .map(|c| {
            let key = SearchRank {
                id: c.playlist.id,
                relevance: c.relevance,
                similarity: trigram_similarity(&c.playlist.title, query),
            };
            (key, c.playlist)
        })
        .filter(|(key, _)| key.is_relevant())
        .collect();

    ranked.sort_by(|(a, _), (b, _)| a.compare(b));

    let mut seen = HashSet::new();
    ranked
        .into_iter()
        .filter(|(key, _)| seen.insert(key.id))
        .map(|(_, playlist)| playlist)
        .collect()
}
