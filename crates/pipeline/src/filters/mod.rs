//! Filter implementations for the merged-table pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod genre;
pub mod rating_range;

// Re-export for convenience
pub use genre::GenreFilter;
pub use rating_range::RatingRangeFilter;
