//! Parsers for the ratings export and the genre reference tables.
//!
//! Both inputs are delimited text with a header row:
//! - ratings: `Date,Name,Year,Letterboxd URI,Rating` (only `Name`, `Year`, `Rating` required)
//! - genres: `movie_name,year,genre` (extra columns are ignored)
//!
//! Row-level cleaning happens here. A row whose year does not coerce to a
//! number, whose title is blank, or whose rating/genre is unusable is
//! dropped and counted, never patched with a sentinel value.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use tracing::debug;

// Column names of the Letterboxd ratings export
pub const RATINGS_TITLE_COLUMN: &str = "Name";
pub const RATINGS_YEAR_COLUMN: &str = "Year";
pub const RATINGS_RATING_COLUMN: &str = "Rating";
pub const RATINGS_DATE_COLUMN: &str = "Date";
pub const RATINGS_URI_COLUMN: &str = "Letterboxd URI";

// Column names of the genre reference tables
pub const GENRE_TITLE_COLUMN: &str = "movie_name";
pub const GENRE_YEAR_COLUMN: &str = "year";
pub const GENRE_LABEL_COLUMN: &str = "genre";

/// Lowest and highest star ratings Letterboxd allows
pub const MIN_RATING: f32 = 0.5;
pub const MAX_RATING: f32 = 5.0;

/// Records parsed from one table, plus how many data rows were rejected
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable<T> {
    pub records: Vec<T>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

impl<T> ParsedTable<T> {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            rows_read: 0,
            rows_dropped: 0,
        }
    }
}

fn csv_reader<R: Read>(input: R, delimiter: u8) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input)
}

fn csv_error(file: &str, source: csv::Error) -> DataLoadError {
    DataLoadError::Csv {
        file: file.to_string(),
        source,
    }
}

fn find_column(headers: &StringRecord, name: &str, file: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DataLoadError::MissingColumn {
            file: file.to_string(),
            column: name.to_string(),
        })
}

fn find_optional_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Coerce a raw year cell to an integer year.
///
/// Accepts integers and finite decimals (truncated toward zero).
///
/// Example: "2010" -> Some(2010)
///          "2010.0" -> Some(2010)
///          "N/A" -> None
pub fn coerce_year(raw: &str) -> Option<Year> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(year) = trimmed.parse::<i64>() {
        return Year::try_from(year).ok();
    }

    let value = trimmed.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < f64::from(Year::MIN) || truncated > f64::from(Year::MAX) {
        return None;
    }
    Some(truncated as Year)
}

/// Trim a title; blank titles cannot be joined on
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// True for 0.5 to 5.0 in half-star steps
pub fn is_valid_rating(rating: f32) -> bool {
    rating.is_finite()
        && (MIN_RATING..=MAX_RATING).contains(&rating)
        && (rating * 2.0).fract() == 0.0
}

/// Parse a rating cell, rejecting anything off the half-star scale
pub fn parse_rating(raw: &str) -> Option<f32> {
    let rating = raw.trim().parse::<f32>().ok()?;
    is_valid_rating(rating).then_some(rating)
}

fn optional_cell(record: &StringRecord, column: Option<usize>) -> Option<String> {
    column
        .and_then(|idx| record.get(idx))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Parse the user's ratings export.
///
/// `source` names the input in errors and logs (a file name or upload name).
/// A missing required column or a malformed CSV fails the whole parse.
pub fn parse_ratings<R: Read>(input: R, source: &str) -> Result<ParsedTable<RatingRecord>> {
    let mut reader = csv_reader(input, b',');
    let headers = reader.headers().map_err(|e| csv_error(source, e))?.clone();

    let title_col = find_column(&headers, RATINGS_TITLE_COLUMN, source)?;
    let year_col = find_column(&headers, RATINGS_YEAR_COLUMN, source)?;
    let rating_col = find_column(&headers, RATINGS_RATING_COLUMN, source)?;
    let date_col = find_optional_column(&headers, RATINGS_DATE_COLUMN);
    let uri_col = find_optional_column(&headers, RATINGS_URI_COLUMN);

    let mut table = ParsedTable::new();
    for (idx, row) in reader.records().enumerate() {
        let record = row.map_err(|e| csv_error(source, e))?;
        // Header is line 1
        let line_no = idx + 2;
        table.rows_read += 1;

        let title = record.get(title_col).and_then(normalize_title);
        let year = record.get(year_col).and_then(coerce_year);
        let rating = record.get(rating_col).and_then(parse_rating);

        match (title, year, rating) {
            (Some(title), Some(year), Some(rating)) => table.records.push(RatingRecord {
                title,
                year,
                rating,
                date: optional_cell(&record, date_col),
                letterboxd_uri: optional_cell(&record, uri_col),
            }),
            (title, year, rating) => {
                table.rows_dropped += 1;
                debug!(
                    source,
                    line = line_no,
                    has_title = title.is_some(),
                    has_year = year.is_some(),
                    has_rating = rating.is_some(),
                    "Dropping unusable rating row"
                );
            }
        }
    }

    Ok(table)
}

/// Parse one genre reference table.
///
/// `delimiter` comes from the file's `TableFormat`. Errors here make the
/// loader skip the file; they never abort the load.
pub fn parse_genre_table<R: Read>(
    input: R,
    delimiter: u8,
    source: &str,
) -> Result<ParsedTable<GenreRecord>> {
    let mut reader = csv_reader(input, delimiter);
    let headers = reader.headers().map_err(|e| csv_error(source, e))?.clone();

    let title_col = find_column(&headers, GENRE_TITLE_COLUMN, source)?;
    let year_col = find_column(&headers, GENRE_YEAR_COLUMN, source)?;
    let genre_col = find_column(&headers, GENRE_LABEL_COLUMN, source)?;

    let mut table = ParsedTable::new();
    for (idx, row) in reader.records().enumerate() {
        let record = row.map_err(|e| csv_error(source, e))?;
        let line_no = idx + 2;
        table.rows_read += 1;

        let title = record.get(title_col).and_then(normalize_title);
        let year = record.get(year_col).and_then(coerce_year);
        let genre = record
            .get(genre_col)
            .map(str::trim)
            .filter(|g| !g.is_empty());

        match (title, year, genre) {
            (Some(title), Some(year), Some(genre)) => table.records.push(GenreRecord {
                title,
                year,
                genre: genre.to_string(),
            }),
            _ => {
                table.rows_dropped += 1;
                debug!(source, line = line_no, "Dropping unusable genre row");
            }
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_year() {
        assert_eq!(coerce_year("2010"), Some(2010));
        assert_eq!(coerce_year(" 1999 "), Some(1999));
        assert_eq!(coerce_year("2010.0"), Some(2010));
        assert_eq!(coerce_year("N/A"), None);
        assert_eq!(coerce_year(""), None);
        assert_eq!(coerce_year("nan"), None);
        assert_eq!(coerce_year("inf"), None);
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("4.5"), Some(4.5));
        assert_eq!(parse_rating("0.5"), Some(0.5));
        assert_eq!(parse_rating("5"), Some(5.0));
        assert_eq!(parse_rating("0"), None);
        assert_eq!(parse_rating("5.5"), None);
        assert_eq!(parse_rating("3.7"), None);
        assert_eq!(parse_rating(""), None);
    }

    #[test]
    fn test_parse_ratings_letterboxd_export() {
        let data = "\
Date,Name,Year,Letterboxd URI,Rating
2023-01-02,Inception,2010,https://boxd.it/1skk,4.5
2023-01-03,  Heat  ,1995,https://boxd.it/2bbs,5
2023-01-04,Mystery Film,N/A,https://boxd.it/xxxx,3
";
        let table = parse_ratings(data.as_bytes(), "ratings.csv").unwrap();

        assert_eq!(table.rows_read, 3);
        assert_eq!(table.rows_dropped, 1);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].title, "Inception");
        assert_eq!(table.records[0].date.as_deref(), Some("2023-01-02"));
        assert_eq!(table.records[1].title, "Heat");
        assert_eq!(table.records[1].rating, 5.0);
    }

    #[test]
    fn test_parse_ratings_missing_column() {
        let data = "Name,Year\nInception,2010\n";
        let err = parse_ratings(data.as_bytes(), "ratings.csv").unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::MissingColumn { ref column, .. } if column == "Rating"
        ));
    }

    #[test]
    fn test_parse_genre_table_tab_delimited() {
        let data = "movie_name\tyear\tgenre\nInception\t2010\tAction\nInception\t2010\t\n";
        let table = parse_genre_table(data.as_bytes(), b'\t', "action.tsv").unwrap();

        assert_eq!(table.records, vec![GenreRecord::new("Inception", 2010, "Action")]);
        assert_eq!(table.rows_dropped, 1);
    }
}
