//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to the merged ratings table.

use anyhow::Result;
use data_loader::MergedRecord;

/// Core trait for filtering merged records.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared behind an `Arc`
/// - Filters take ownership of the Vec<MergedRecord> and return a filtered Vec
/// - Filters never reorder rows; the table keeps the order of the ratings export
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of records.
    ///
    /// # Arguments
    /// * `records` - The records to filter (takes ownership)
    ///
    /// # Returns
    /// * `Ok(Vec<MergedRecord>)` - The records that passed
    /// * `Err` - If filtering fails
    fn apply(&self, records: Vec<MergedRecord>) -> Result<Vec<MergedRecord>>;
}
