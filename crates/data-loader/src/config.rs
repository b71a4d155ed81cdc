//! Loader configuration: where the inputs live and which files count as tables.

use std::path::{Path, PathBuf};

/// Default location of the user's ratings export
pub const DEFAULT_RATINGS_PATH: &str = "ratings.csv";

/// Default directory of genre reference tables
pub const DEFAULT_GENRE_DIR: &str = "imdb_data";

/// Tabular file formats the genre loader recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableFormat {
    Csv,
    Tsv,
}

impl TableFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(TableFormat::Csv),
            "tsv" => Some(TableFormat::Tsv),
            _ => None,
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            TableFormat::Csv => b',',
            TableFormat::Tsv => b'\t',
        }
    }
}

/// Settings for one merge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Ratings file used when nothing was uploaded
    pub default_ratings_path: PathBuf,
    /// Directory scanned for genre tables
    pub genre_dir: PathBuf,
    /// Formats accepted in `genre_dir`; other files are ignored
    pub genre_formats: Vec<TableFormat>,
}

impl LoaderConfig {
    pub fn new(default_ratings_path: impl Into<PathBuf>, genre_dir: impl Into<PathBuf>) -> Self {
        Self {
            default_ratings_path: default_ratings_path.into(),
            genre_dir: genre_dir.into(),
            ..Self::default()
        }
    }

    /// The format of `path` if it is a genre table this config accepts
    pub fn genre_format_of(&self, path: &Path) -> Option<TableFormat> {
        TableFormat::from_path(path).filter(|format| self.genre_formats.contains(format))
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            default_ratings_path: PathBuf::from(DEFAULT_RATINGS_PATH),
            genre_dir: PathBuf::from(DEFAULT_GENRE_DIR),
            genre_formats: vec![TableFormat::Csv, TableFormat::Tsv],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_format_detection() {
        assert_eq!(TableFormat::from_path(Path::new("action.csv")), Some(TableFormat::Csv));
        assert_eq!(TableFormat::from_path(Path::new("DRAMA.CSV")), Some(TableFormat::Csv));
        assert_eq!(TableFormat::from_path(Path::new("horror.tsv")), Some(TableFormat::Tsv));
        assert_eq!(TableFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(TableFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_config_restricts_formats() {
        let mut config = LoaderConfig::default();
        config.genre_formats = vec![TableFormat::Csv];

        assert!(config.genre_format_of(Path::new("a.csv")).is_some());
        assert!(config.genre_format_of(Path::new("a.tsv")).is_none());
    }
}
