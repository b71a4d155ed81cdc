//! Error types for the data-loader crate.
//!
//! Every variant here is terminal for a load. Unreadable individual genre
//! files never surface as errors: the loader skips them and counts them in
//! `LoadStats` instead.

use thiserror::Error;

/// Errors that can occur while loading and merging the tables
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Neither an uploaded ratings file nor the default one exists
    #[error("Could not find '{path}'. Please upload your Letterboxd ratings file to begin.")]
    RatingsNotFound { path: String },

    /// The genre reference directory does not exist
    #[error(
        "The '{path}' directory was not found. Please make sure it exists and contains the genre CSV files."
    )]
    GenreDirectoryNotFound { path: String },

    /// The genre directory held no table that could be loaded
    #[error("No readable genre tables found in '{path}'")]
    NoGenreTables { path: String },

    /// A table is missing one of the columns the merge needs
    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected the input
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// The inner join produced no rows
    #[error(
        "No movie matches were found between your ratings and the IMDb database. This could be due to differences in titles or release years."
    )]
    NoMatches,
}

impl DataLoadError {
    /// True for the "required input is absent" class of failures.
    ///
    /// These get a plain instruction for the user rather than a generic
    /// "unexpected error" wrapper.
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            DataLoadError::RatingsNotFound { .. } | DataLoadError::GenreDirectoryNotFound { .. }
        )
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_classification() {
        let missing = DataLoadError::RatingsNotFound {
            path: "ratings.csv".to_string(),
        };
        assert!(missing.is_missing_input());
        assert!(missing.to_string().contains("ratings.csv"));

        let dir = DataLoadError::GenreDirectoryNotFound {
            path: "imdb_data".to_string(),
        };
        assert!(dir.is_missing_input());

        assert!(!DataLoadError::NoMatches.is_missing_input());
        assert!(
            !DataLoadError::MissingColumn {
                file: "a.csv".to_string(),
                column: "genre".to_string(),
            }
            .is_missing_input()
        );
    }
}
