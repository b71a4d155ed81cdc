//! Filtering and dashboard computations over the merged ratings table.
//!
//! This crate provides:
//! - Filter trait and implementations for narrowing the merged table
//! - FilterPipeline for composing filters
//! - Dashboard for the metrics, personality and chart series of a selection
//!
//! ## Architecture
//! The merged table from `data-loader` is processed in stages:
//! 1. Filters keep rows inside the rating range and genre selection
//! 2. Dashboard computes metrics and chart data for the remaining rows
//! 3. The front end renders the dashboard and the row table
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{Dashboard, FilterPipeline, FilterSettings};
//!
//! let settings = FilterSettings { min_rating: 3.5, ..FilterSettings::default() };
//! let filtered = FilterPipeline::from_settings(&settings)?.apply(table.records.clone())?;
//!
//! match Dashboard::build(table.len(), &filtered) {
//!     Some(dashboard) => println!("{}", dashboard.personality.summary()),
//!     None => println!("No movies found for the selected filters."),
//! }
//! ```

pub mod dashboard;
pub mod filter_pipeline;
pub mod filters;
pub mod personality;
pub mod traits;

// Re-export main types
pub use dashboard::{Dashboard, GenreShare, Metrics, RatingPoint, YearSummary, genre_options};
pub use filter_pipeline::{FilterPipeline, FilterSettings};
pub use personality::Personality;
pub use traits::Filter;
