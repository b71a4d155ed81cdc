//! Core domain types for the ratings/genre merge.
//!
//! This module defines the records that flow through the merge pipeline:
//! - `RatingRecord` rows from the user's Letterboxd export
//! - `GenreRecord` rows from the genre reference tables
//! - `ConsolidatedGenre` one row per (title, year) after grouping
//! - `MergedRecord` the inner join of the two, with display-facing names

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Release year after numeric coercion
pub type Year = i32;

/// Separator used when joining consolidated genre labels
pub const GENRE_SEPARATOR: &str = ", ";

// =============================================================================
// Join Key
// =============================================================================

/// The (title, year) pair used to match ratings to genres.
///
/// Both sides must be built through `JoinKey::new` so the title is trimmed
/// identically; otherwise "Inception " and "Inception" would never meet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JoinKey {
    pub title: String,
    pub year: Year,
}

impl JoinKey {
    pub fn new(title: &str, year: Year) -> Self {
        Self {
            title: title.trim().to_string(),
            year,
        }
    }
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)
    }
}

// =============================================================================
// Input Records
// =============================================================================

/// One row of the user's ratings export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub title: String,
    pub year: Year,
    /// Star rating from 0.5 to 5.0 in half-star steps
    pub rating: f32,
    /// Date the rating was logged, carried through untouched
    pub date: Option<String>,
    pub letterboxd_uri: Option<String>,
}

impl RatingRecord {
    pub fn new(title: &str, year: Year, rating: f32) -> Self {
        Self {
            title: title.trim().to_string(),
            year,
            rating,
            date: None,
            letterboxd_uri: None,
        }
    }

    pub fn key(&self) -> JoinKey {
        JoinKey::new(&self.title, self.year)
    }
}

/// One row of a genre reference table.
///
/// A movie usually appears once per genre, so many records share a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreRecord {
    pub title: String,
    pub year: Year,
    pub genre: String,
}

impl GenreRecord {
    pub fn new(title: &str, year: Year, genre: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            year,
            genre: genre.to_string(),
        }
    }

    pub fn key(&self) -> JoinKey {
        JoinKey::new(&self.title, self.year)
    }
}

// =============================================================================
// Derived Records
// =============================================================================

/// All genre labels observed for one (title, year), joined with `", "`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedGenre {
    pub title: String,
    pub year: Year,
    pub genres: String,
}

impl ConsolidatedGenre {
    pub fn key(&self) -> JoinKey {
        JoinKey::new(&self.title, self.year)
    }
}

/// A rating that found its genres.
///
/// Serialized field names are the display-facing column names, so a CSV
/// export reads the same as the table shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    #[serde(rename = "Name")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: Year,
    #[serde(rename = "Rating")]
    pub rating: f32,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Letterboxd URI")]
    pub letterboxd_uri: Option<String>,
}

impl MergedRecord {
    /// Individual genre labels of this row, in consolidated order
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genre
            .split(GENRE_SEPARATOR)
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres().any(|g| g == genre)
    }

    pub fn key(&self) -> JoinKey {
        JoinKey::new(&self.title, self.year)
    }
}

// =============================================================================
// MergedTable - The Pipeline Output
// =============================================================================

/// Counters gathered while loading, reported alongside the merged rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    pub ratings_read: usize,
    pub ratings_dropped: usize,
    pub genre_files_loaded: usize,
    pub genre_files_skipped: usize,
    pub genre_rows_read: usize,
    pub genre_rows_dropped: usize,
    pub consolidated_titles: usize,
}

/// The merged table handed to filtering and display
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergedTable {
    pub records: Vec<MergedRecord>,
    pub stats: LoadStats,
}

impl MergedTable {
    pub fn new(records: Vec<MergedRecord>, stats: LoadStats) -> Self {
        Self { records, stats }
    }

    pub fn records(&self) -> &[MergedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
