//! Filter to keep only movies in the selected genres.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::MergedRecord;

/// Keeps records tagged with at least one of the selected genres.
///
/// ## Algorithm
/// 1. An empty selection keeps every record
/// 2. Otherwise split each record's consolidated genre string
/// 3. Keep the record if any label equals a selected genre
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreFilter {
    genres: Vec<String>,
}

impl GenreFilter {
    /// Create a new GenreFilter.
    ///
    /// # Arguments
    /// * `genres` - Selected genre labels; blank entries are ignored
    pub fn new<I, S>(genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let genres = genres
            .into_iter()
            .map(|g| g.as_ref().trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
        Self { genres }
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn matches(&self, record: &MergedRecord) -> bool {
        self.genres.is_empty() || self.genres.iter().any(|g| record.has_genre(g))
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn apply(&self, records: Vec<MergedRecord>) -> Result<Vec<MergedRecord>> {
        if self.genres.is_empty() {
            return Ok(records);
        }

        let filtered: Vec<MergedRecord> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect();
        Ok(filtered)
    }
}
