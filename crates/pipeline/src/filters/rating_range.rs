//! Filter to keep ratings inside a star range.
//!
//! Mirrors the rating slider: both ends are inclusive and move in
//! half-star steps between 0.5 and 5.0.

use crate::traits::Filter;
use anyhow::{Result, bail};
use data_loader::MergedRecord;
use data_loader::parser::{MAX_RATING, MIN_RATING, is_valid_rating};

/// Keeps records with `min <= rating <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingRangeFilter {
    min: f32,
    max: f32,
}

impl RatingRangeFilter {
    /// Create a new RatingRangeFilter.
    ///
    /// # Arguments
    /// * `min` - Lowest rating kept (0.5 to 5.0, half-star steps)
    /// * `max` - Highest rating kept, not below `min`
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if !is_valid_rating(min) || !is_valid_rating(max) {
            bail!(
                "Rating bounds must be between {} and {} in steps of 0.5 (got {} to {})",
                MIN_RATING,
                MAX_RATING,
                min,
                max
            );
        }
        if min > max {
            bail!("Minimum rating {} is above maximum rating {}", min, max);
        }
        Ok(Self { min, max })
    }

    /// The full 0.5 to 5.0 range, which keeps every row
    pub fn full() -> Self {
        Self {
            min: MIN_RATING,
            max: MAX_RATING,
        }
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    pub fn contains(&self, rating: f32) -> bool {
        rating >= self.min && rating <= self.max
    }
}

impl Default for RatingRangeFilter {
    fn default() -> Self {
        Self::full()
    }
}

impl Filter for RatingRangeFilter {
    fn name(&self) -> &str {
        "RatingRangeFilter"
    }

    fn apply(&self, records: Vec<MergedRecord>) -> Result<Vec<MergedRecord>> {
        let filtered: Vec<MergedRecord> = records
            .into_iter()
            .filter(|record| self.contains(record.rating))
            .collect();

        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, rating: f32) -> MergedRecord {
        MergedRecord {
            title: title.to_string(),
            year: 2000,
            rating,
            genre: "Drama".to_string(),
            date: None,
            letterboxd_uri: None,
        }
    }

    #[test]
    fn test_rating_range_is_inclusive() {
        let records = vec![
            record("Half", 0.5),
            record("Three", 3.0),
            record("ThreeHalf", 3.5),
            record("Four", 4.0),
            record("Five", 5.0),
        ];

        let filter = RatingRangeFilter::new(3.0, 4.0).unwrap();
        let filtered = filter.apply(records).unwrap();

        let titles: Vec<&str> = filtered.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Three", "ThreeHalf", "Four"]);
    }

    #[test]
    fn test_full_range_keeps_everything() {
        let records = vec![record("Half", 0.5), record("Five", 5.0)];
        let filtered = RatingRangeFilter::full().apply(records).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(RatingRangeFilter::new(4.0, 3.0).is_err());
        assert!(RatingRangeFilter::new(0.0, 3.0).is_err());
        assert!(RatingRangeFilter::new(1.0, 5.5).is_err());
        assert!(RatingRangeFilter::new(1.2, 3.0).is_err());
        assert!(RatingRangeFilter::new(2.5, 2.5).is_ok());
    }
}
