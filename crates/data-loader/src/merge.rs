//! Genre consolidation and the ratings/genres inner join.
//!
//! Both functions are pure: identical inputs always give identical output,
//! in the same order.

use crate::types::*;
use std::collections::{BTreeMap, HashMap};

/// Collapse genre rows sharing a (title, year) into one row per key.
///
/// Labels keep the order they were first seen in and appear once each.
/// Output is sorted by key. Running this again on its own output (one row
/// per key) returns the same rows, so consolidation is idempotent.
///
/// Example: ("Inception", 2010, "Action"), ("Inception", 2010, "Sci-fi"),
///          ("Inception", 2010, "Action") -> ("Inception", 2010, "Action, Sci-fi")
pub fn consolidate_genres(records: &[GenreRecord]) -> Vec<ConsolidatedGenre> {
    let mut grouped: BTreeMap<JoinKey, Vec<&str>> = BTreeMap::new();

    for record in records {
        let labels = grouped.entry(record.key()).or_default();
        if !labels.contains(&record.genre.as_str()) {
            labels.push(&record.genre);
        }
    }

    grouped
        .into_iter()
        .map(|(key, labels)| ConsolidatedGenre {
            title: key.title,
            year: key.year,
            genres: labels.join(GENRE_SEPARATOR),
        })
        .collect()
}

/// Inner-join ratings against consolidated genres on (title, year).
///
/// Ratings without a genre row and genre rows without a rating are dropped.
/// Output follows the order of `ratings`; a key rated twice yields two rows.
pub fn inner_join(ratings: &[RatingRecord], genres: &[ConsolidatedGenre]) -> Vec<MergedRecord> {
    let lookup: HashMap<JoinKey, &str> = genres
        .iter()
        .map(|g| (g.key(), g.genres.as_str()))
        .collect();

    ratings
        .iter()
        .filter_map(|rating| {
            let genre = lookup.get(&rating.key())?;
            Some(MergedRecord {
                title: rating.title.trim().to_string(),
                year: rating.year,
                rating: rating.rating,
                genre: (*genre).to_string(),
                date: rating.date.clone(),
                letterboxd_uri: rating.letterboxd_uri.clone(),
            })
        })
        .collect()
}
