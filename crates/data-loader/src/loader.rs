//! The merge pipeline: load both inputs, consolidate genres, join.
//!
//! Steps:
//! 1. Load the ratings table (upload, else default path)
//! 2. Load every recognized table in the genre directory, skipping unreadable ones
//! 3. Concatenate the genre rows in file-name order
//! 4. Consolidate genres per (title, year)
//! 5. Inner-join ratings against the consolidated genres
//!
//! Row cleaning (year coercion, title trimming) happens while parsing, see
//! `parser`.

use crate::config::{LoaderConfig, TableFormat};
use crate::error::{DataLoadError, Result};
use crate::merge::{consolidate_genres, inner_join};
use crate::parser::{self, ParsedTable};
use crate::source::{RatingsSource, not_found_as_missing_ratings};
use crate::types::*;
use rayon::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Concatenated rows of every genre table that loaded
#[derive(Debug, Clone, Default)]
pub struct GenreLoad {
    pub records: Vec<GenreRecord>,
    pub files_loaded: usize,
    /// Files that could not be read, with the reason
    pub skipped: Vec<(PathBuf, String)>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// Load the ratings table from its resolved source
pub fn load_ratings(source: &RatingsSource) -> Result<ParsedTable<RatingRecord>> {
    match source {
        RatingsSource::Upload(upload) => parser::parse_ratings(upload.bytes.as_slice(), &upload.name),
        RatingsSource::Path(path) => {
            let file = File::open(path).map_err(|e| not_found_as_missing_ratings(e, path))?;
            parser::parse_ratings(file, &path.display().to_string())
        }
    }
}

fn parse_genre_file(path: &Path, format: TableFormat) -> Result<ParsedTable<GenreRecord>> {
    let file = File::open(path)?;
    parser::parse_genre_table(file, format.delimiter(), &path.display().to_string())
}

/// List the genre tables in the configured directory, sorted by path
pub fn genre_table_paths(config: &LoaderConfig) -> Result<Vec<(PathBuf, TableFormat)>> {
    let dir = &config.genre_dir;
    if !dir.is_dir() {
        return Err(DataLoadError::GenreDirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut paths: Vec<(PathBuf, TableFormat)> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| config.genre_format_of(&path).map(|format| (path, format)))
        .collect();
    paths.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(paths)
}

/// Load and concatenate every genre table in the configured directory.
///
/// Files are parsed in parallel, but results are concatenated in file-name
/// order so the output does not depend on scheduling. A file that fails to
/// parse is skipped with a warning.
pub fn load_genre_directory(config: &LoaderConfig) -> Result<GenreLoad> {
    let paths = genre_table_paths(config)?;
    debug!(dir = %config.genre_dir.display(), files = paths.len(), "Found genre tables");

    let parsed: Vec<(PathBuf, Result<ParsedTable<GenreRecord>>)> = paths
        .into_par_iter()
        .map(|(path, format)| {
            let table = parse_genre_file(&path, format);
            (path, table)
        })
        .collect();

    let mut load = GenreLoad::default();
    for (path, table) in parsed {
        match table {
            Ok(table) => {
                debug!(
                    file = %path.display(),
                    rows = table.records.len(),
                    dropped = table.rows_dropped,
                    "Loaded genre table"
                );
                load.files_loaded += 1;
                load.rows_read += table.rows_read;
                load.rows_dropped += table.rows_dropped;
                load.records.extend(table.records);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping unreadable genre table");
                load.skipped.push((path, e.to_string()));
            }
        }
    }

    if load.files_loaded == 0 {
        return Err(DataLoadError::NoGenreTables {
            path: config.genre_dir.display().to_string(),
        });
    }

    Ok(load)
}

/// Run the whole merge pipeline.
///
/// Any error is terminal for the run: there is no partial result. An empty
/// join is reported as `DataLoadError::NoMatches`.
pub fn load_and_merge(source: &RatingsSource, config: &LoaderConfig) -> Result<MergedTable> {
    info!(
        ratings = %source.name(),
        genre_dir = %config.genre_dir.display(),
        "Loading ratings and genre tables"
    );

    // Both inputs are independent, so parse them side by side
    let (ratings, genres) = rayon::join(|| load_ratings(source), || load_genre_directory(config));

    // Ratings errors take precedence: without ratings there is nothing to show
    let ratings = ratings?;
    let genres = genres?;

    if ratings.rows_dropped > 0 {
        warn!(
            dropped = ratings.rows_dropped,
            "Dropped rating rows with a missing title, non-numeric year or invalid rating"
        );
    }
    if genres.rows_dropped > 0 {
        warn!(
            dropped = genres.rows_dropped,
            "Dropped genre rows with a missing title, non-numeric year or empty genre"
        );
    }

    let consolidated = consolidate_genres(&genres.records);
    let records = inner_join(&ratings.records, &consolidated);

    let stats = LoadStats {
        ratings_read: ratings.rows_read,
        ratings_dropped: ratings.rows_dropped,
        genre_files_loaded: genres.files_loaded,
        genre_files_skipped: genres.skipped.len(),
        genre_rows_read: genres.rows_read,
        genre_rows_dropped: genres.rows_dropped,
        consolidated_titles: consolidated.len(),
    };

    info!(
        ratings = ratings.records.len(),
        titles = consolidated.len(),
        matched = records.len(),
        "Merged ratings with genres"
    );

    if records.is_empty() {
        return Err(DataLoadError::NoMatches);
    }

    Ok(MergedTable::new(records, stats))
}
