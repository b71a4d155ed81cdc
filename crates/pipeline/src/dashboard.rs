//! Dashboard figures for a filtered selection of the merged table.
//!
//! This module computes everything the dashboard shows:
//! - headline metrics (count, average rating, most watched year)
//! - the film personality from the top genre
//! - the genre distribution (pie chart data)
//! - ratings against release year (scatter chart data)

use crate::personality::Personality;
use data_loader::{MergedRecord, Year};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Headline numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    /// Rows in the merged table before filtering
    pub total_rated: usize,
    /// Rows left after filtering
    pub movies_analyzed: usize,
    pub average_rating: f32,
    pub most_watched_year: Year,
}

/// One slice of the genre distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreShare {
    pub genre: String,
    pub count: usize,
    /// Fraction of all genre labels in the selection, 0.0 to 1.0
    pub share: f32,
}

/// One point of the ratings vs. release year chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingPoint {
    pub year: Year,
    pub rating: f32,
    pub title: String,
}

/// Ratings of one release year, aggregated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: Year,
    pub count: usize,
    pub average_rating: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub metrics: Metrics,
    pub personality: Personality,
    pub genre_distribution: Vec<GenreShare>,
    pub ratings_by_year: Vec<YearSummary>,
    pub points: Vec<RatingPoint>,
}

impl Dashboard {
    /// Compute the dashboard for a filtered selection.
    ///
    /// Returns None for an empty selection: there is no average or mode
    /// to show, and the caller reports "no movies found" instead.
    ///
    /// # Arguments
    /// * `total_rated` - Size of the unfiltered merged table
    /// * `filtered` - Rows that passed the filters
    pub fn build(total_rated: usize, filtered: &[MergedRecord]) -> Option<Self> {
        let average_rating = average_rating(filtered)?;
        let most_watched_year = most_watched_year(filtered)?;
        let top_genre = top_genre(filtered)?;

        let points = filtered
            .iter()
            .map(|r| RatingPoint {
                year: r.year,
                rating: r.rating,
                title: r.title.clone(),
            })
            .collect();

        Some(Self {
            metrics: Metrics {
                total_rated,
                movies_analyzed: filtered.len(),
                average_rating,
                most_watched_year,
            },
            personality: Personality::for_genre(&top_genre),
            genre_distribution: genre_distribution(filtered),
            ratings_by_year: ratings_by_year(filtered),
            points,
        })
    }
}

/// Most frequent value; ties go to the smallest value
fn mode<T, I>(items: I) -> Option<T>
where
    T: Ord + Hash,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(a, count_a), (b, count_b)| count_a.cmp(count_b).then_with(|| b.cmp(a)))
        .map(|(value, _)| value)
}

pub fn average_rating(records: &[MergedRecord]) -> Option<f32> {
    if records.is_empty() {
        return None;
    }
    let total: f64 = records.iter().map(|r| f64::from(r.rating)).sum();
    Some((total / records.len() as f64) as f32)
}

pub fn most_watched_year(records: &[MergedRecord]) -> Option<Year> {
    mode(records.iter().map(|r| r.year))
}

/// Most frequent genre label across all rows
pub fn top_genre(records: &[MergedRecord]) -> Option<String> {
    mode(records.iter().flat_map(|r| r.genres())).map(str::to_string)
}

/// Unique genre labels in order of first appearance.
///
/// These are the choices offered by the genre filter.
pub fn genre_options(records: &[MergedRecord]) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for genre in records.iter().flat_map(|r| r.genres()) {
        if !options.iter().any(|o| o == genre) {
            options.push(genre.to_string());
        }
    }
    options
}

/// Label counts, most frequent first (ties alphabetical)
pub fn genre_distribution(records: &[MergedRecord]) -> Vec<GenreShare> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for genre in records.iter().flat_map(|r| r.genres()) {
        *counts.entry(genre).or_insert(0) += 1;
    }
    let total: usize = counts.values().sum();

    let mut shares: Vec<GenreShare> = counts
        .into_iter()
        .map(|(genre, count)| GenreShare {
            genre: genre.to_string(),
            count,
            share: if total == 0 {
                0.0
            } else {
                count as f32 / total as f32
            },
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.genre.cmp(&b.genre)));
    shares
}

/// Per-year count and mean rating, oldest year first
pub fn ratings_by_year(records: &[MergedRecord]) -> Vec<YearSummary> {
    let mut by_year: BTreeMap<Year, (usize, f64)> = BTreeMap::new();
    for record in records {
        let entry = by_year.entry(record.year).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += f64::from(record.rating);
    }

    by_year
        .into_iter()
        .map(|(year, (count, total))| YearSummary {
            year,
            count,
            average_rating: (total / count as f64) as f32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, year: Year, rating: f32, genre: &str) -> MergedRecord {
        MergedRecord {
            title: title.to_string(),
            year,
            rating,
            genre: genre.to_string(),
            date: None,
            letterboxd_uri: None,
        }
    }

    fn sample() -> Vec<MergedRecord> {
        vec![
            record("Inception", 2010, 4.5, "Action, Sci-fi"),
            record("Black Swan", 2010, 4.0, "Drama, Thriller"),
            record("Heat", 1995, 5.0, "Action, Crime, Drama"),
            record("Toy Story", 1995, 3.5, "Animation, Comedy"),
            record("Mad Max: Fury Road", 2015, 4.5, "Action, Adventure"),
        ]
    }

    #[test]
    fn test_metrics() {
        let records = sample();
        let dashboard = Dashboard::build(10, &records).unwrap();

        assert_eq!(dashboard.metrics.total_rated, 10);
        assert_eq!(dashboard.metrics.movies_analyzed, 5);
        assert!((dashboard.metrics.average_rating - 4.3).abs() < 1e-5);
        // 1995 and 2010 tie with two rows each; the earlier year wins
        assert_eq!(dashboard.metrics.most_watched_year, 1995);
        assert_eq!(dashboard.points.len(), 5);
    }

    #[test]
    fn test_top_genre_and_personality() {
        let dashboard = Dashboard::build(5, &sample()).unwrap();

        assert_eq!(dashboard.personality.top_genre, "Action");
        assert_eq!(dashboard.personality.archetype, Some("Action Enthusiast"));
    }

    #[test]
    fn test_top_genre_tie_is_alphabetical() {
        let records = vec![
            record("A", 2000, 3.0, "Western"),
            record("B", 2000, 3.0, "Drama"),
        ];
        assert_eq!(top_genre(&records).as_deref(), Some("Drama"));
    }

    #[test]
    fn test_empty_selection_has_no_dashboard() {
        assert!(Dashboard::build(3, &[]).is_none());
    }

    #[test]
    fn test_genre_distribution_order() {
        let distribution = genre_distribution(&sample());

        assert_eq!(distribution[0].genre, "Action");
        assert_eq!(distribution[0].count, 3);
        assert_eq!(distribution[1].genre, "Drama");
        assert_eq!(distribution[1].count, 2);
        // Remaining single counts are alphabetical
        assert_eq!(distribution[2].genre, "Adventure");

        let total_share: f32 = distribution.iter().map(|g| g.share).sum();
        assert!((total_share - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_genre_options_first_appearance() {
        let options = genre_options(&sample());
        assert_eq!(
            options,
            vec![
                "Action",
                "Sci-fi",
                "Drama",
                "Thriller",
                "Crime",
                "Animation",
                "Comedy",
                "Adventure"
            ]
        );
    }

    #[test]
    fn test_ratings_by_year() {
        let years = ratings_by_year(&sample());

        let listed: Vec<Year> = years.iter().map(|y| y.year).collect();
        assert_eq!(listed, vec![1995, 2010, 2015]);
        assert_eq!(years[0].count, 2);
        assert!((years[0].average_rating - 4.25).abs() < 1e-5);
    }
}
