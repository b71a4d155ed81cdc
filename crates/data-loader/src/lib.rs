//! # Data Loader Crate
//!
//! This crate loads a Letterboxd ratings export, joins it against a
//! directory of genre reference tables, and hands back one merged table.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (RatingRecord, GenreRecord, MergedRecord, MergedTable)
//! - **parser**: Parse CSV/TSV tables into records, cleaning keys on the way
//! - **merge**: Genre consolidation and the inner join
//! - **loader**: The end-to-end merge pipeline
//! - **source**: Upload vs. default-path resolution of the ratings input
//! - **cache**: Memoized merge result keyed by input identity
//! - **config**: Paths and recognized table formats
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{LoaderConfig, RatingsSource, load_and_merge};
//!
//! let config = LoaderConfig::default();
//! let source = RatingsSource::resolve(None, &config);
//! let table = load_and_merge(&source, &config)?;
//!
//! for record in table.records() {
//!     println!("{} ({}) {} [{}]", record.title, record.year, record.rating, record.genre);
//! }
//! ```

// Public modules
pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod merge;
pub mod parser;
pub mod source;
pub mod types;

// Re-export commonly used types for convenience
pub use cache::{CacheKey, MergeCache};
pub use config::{LoaderConfig, TableFormat};
pub use error::{DataLoadError, Result};
pub use loader::{load_and_merge, load_genre_directory, load_ratings};
pub use merge::{consolidate_genres, inner_join};
pub use source::{RatingsSource, SourceFingerprint, Upload};
pub use types::{
    // Type aliases
    Year,
    // Core types
    ConsolidatedGenre,
    GenreRecord,
    JoinKey,
    LoadStats,
    MergedRecord,
    MergedTable,
    RatingRecord,
};
