//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern, and
//! `FilterSettings`, the user's current filter selection.

use crate::filters::{GenreFilter, RatingRangeFilter};
use crate::traits::Filter;
use anyhow::Result;
use data_loader::MergedRecord;
use data_loader::parser::{MAX_RATING, MIN_RATING};
use serde::{Deserialize, Serialize};
use tracing;

/// The user's filter selection: a rating range and a set of genres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    pub min_rating: f32,
    pub max_rating: f32,
    /// Empty means "all genres"
    pub genres: Vec<String>,
}

impl FilterSettings {
    /// True when the selection keeps every row
    pub fn is_unfiltered(&self) -> bool {
        self.min_rating == MIN_RATING && self.max_rating == MAX_RATING && self.genres.is_empty()
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            min_rating: MIN_RATING,
            max_rating: MAX_RATING,
            genres: Vec::new(),
        }
    }
}

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(RatingRangeFilter::new(3.5, 5.0)?)
///     .add_filter(GenreFilter::new(["Drama", "Comedy"]));
///
/// let filtered = pipeline.apply(table.records.clone())?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Build the rating-then-genre pipeline for a filter selection.
    ///
    /// Fails if the rating bounds are off the half-star scale or inverted.
    pub fn from_settings(settings: &FilterSettings) -> Result<Self> {
        Ok(Self::new()
            .add_filter(RatingRangeFilter::new(settings.min_rating, settings.max_rating)?)
            .add_filter(GenreFilter::new(&settings.genres)))
    }

    /// Add a filter to the pipeline (builder pattern).
    ///
    /// # Arguments
    /// * `filter` - Any type implementing the Filter trait
    ///
    /// # Returns
    /// Self for method chaining
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence to the records.
    ///
    /// ## Algorithm
    /// 1. Start with the input records
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Apply the filter
    ///    c. Log output count
    /// 3. Return final filtered set
    ///
    /// An empty result is not an error here; callers decide how to report it.
    pub fn apply(&self, records: Vec<MergedRecord>) -> Result<Vec<MergedRecord>> {
        let mut current = records;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, rating: f32, genre: &str) -> MergedRecord {
        MergedRecord {
            title: title.to_string(),
            year: 2001,
            rating,
            genre: genre.to_string(),
            date: None,
            letterboxd_uri: None,
        }
    }

    fn sample() -> Vec<MergedRecord> {
        vec![
            record("Amelie", 4.5, "Comedy, Romance"),
            record("Shrek", 3.5, "Animation, Comedy"),
            record("Memento", 5.0, "Mystery, Thriller"),
        ]
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        assert!(pipeline.is_empty());

        let filtered = pipeline.apply(sample()).unwrap();
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_single_filter() {
        let pipeline = FilterPipeline::new().add_filter(RatingRangeFilter::new(4.0, 5.0).unwrap());

        let filtered = pipeline.apply(sample()).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].title, "Amelie");
    }

    #[test]
    fn test_from_settings_combines_filters() {
        let settings = FilterSettings {
            min_rating: 4.0,
            max_rating: 5.0,
            genres: vec!["Comedy".to_string()],
        };
        let pipeline = FilterPipeline::from_settings(&settings).unwrap();
        assert_eq!(pipeline.len(), 2);

        let filtered = pipeline.apply(sample()).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Amelie");
    }

    #[test]
    fn test_from_settings_rejects_inverted_range() {
        let settings = FilterSettings {
            min_rating: 4.5,
            max_rating: 2.0,
            genres: Vec::new(),
        };
        assert!(FilterPipeline::from_settings(&settings).is_err());
    }

    #[test]
    fn test_default_settings_are_unfiltered() {
        assert!(FilterSettings::default().is_unfiltered());
    }
}
