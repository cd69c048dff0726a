//! 🔎 Views: the slicing and dicing the dashboard does on a snapshot.
//!
//! All of these are pure functions over an in-memory snapshot. No store calls, no caching,
//! no surprises. Rows come back in snapshot order.

use std::collections::BTreeSet;

use crate::records::{CollectionSnapshot, MovieRow};

/// 🔎 Case-insensitive substring match on `name`.
///
/// The query is trimmed first. An empty query matches nothing, not everything: a blank search
/// box means "I haven't asked yet".
pub fn search_by_title<'a>(snapshot: &'a CollectionSnapshot, query: &str) -> Vec<&'a MovieRow> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    snapshot
        .rows
        .iter()
        .filter(|row| row.record.name.to_lowercase().contains(&needle))
        .collect()
}

/// 🎥 Rows whose `director` is exactly `director`. Case-sensitive, as stored.
pub fn filter_by_director<'a>(
    snapshot: &'a CollectionSnapshot,
    director: &str,
) -> Vec<&'a MovieRow> {
    snapshot
        .rows
        .iter()
        .filter(|row| row.record.director == director)
        .collect()
}

/// 📋 Every distinct non-empty director, sorted. This is what the director picker offers.
pub fn distinct_directors(snapshot: &CollectionSnapshot) -> Vec<&str> {
    snapshot
        .rows
        .iter()
        .map(|row| row.record.director.as_str())
        .filter(|director| !director.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 📊 The numbers across the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total_movies: usize,
    pub unique_directors: usize,
    pub unique_genres: usize,
    pub columns: usize,
    pub skipped: usize,
}

/// 📊 Count rows, distinct directors, distinct genres.
///
/// Empty strings don't count as a director or a genre; they're the absence of one.
pub fn summary(snapshot: &CollectionSnapshot) -> Summary {
    let genres: BTreeSet<&str> = snapshot
        .rows
        .iter()
        .map(|row| row.record.genre.as_str())
        .filter(|genre| !genre.is_empty())
        .collect();
    Summary {
        total_movies: snapshot.len(),
        unique_directors: distinct_directors(snapshot).len(),
        unique_genres: genres.len(),
        columns: snapshot.column_count(),
        skipped: snapshot.skipped.len(),
    }
}
