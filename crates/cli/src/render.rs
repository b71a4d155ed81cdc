//! Text rendering of the dashboard.
//!
//! Each section of the dashboard gets its own `print_*` helper so the
//! report command and the explore loop share one layout.

use colored::Colorize;
use data_loader::{LoadStats, MergedRecord};
use pipeline::{Dashboard, GenreShare, Metrics, Personality, YearSummary};

const BAR_WIDTH: usize = 30;
const TITLE_WIDTH: usize = 40;
const GENRE_WIDTH: usize = 36;

/// Render a rating as stars, e.g. 3.5 -> "★★★½"
pub fn rating_stars(rating: f32) -> String {
    let half_stars = (rating * 2.0).round().max(0.0) as usize;
    let mut stars = "★".repeat(half_stars / 2);
    if half_stars % 2 == 1 {
        stars.push('½');
    }
    stars
}

fn bar(fraction: f32) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
    "█".repeat(filled)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

pub fn print_header(total_rated: usize) {
    println!("{}", "🎬 Letterboxd Replay".bold().blue());
    println!(
        "Exploring the cinematic taste of {} rated movies.\n",
        total_rated.to_string().bold()
    );
}

pub fn print_load_stats(stats: &LoadStats) {
    if stats.ratings_dropped > 0 {
        println!(
            "{} {} rating rows had no usable title, year or rating and were left out",
            "!".yellow(),
            stats.ratings_dropped
        );
    }
    if stats.genre_files_skipped > 0 {
        println!(
            "{} {} genre tables could not be read and were skipped",
            "!".yellow(),
            stats.genre_files_skipped
        );
    }
}

pub fn print_metrics(metrics: &Metrics) {
    println!("{}", "Overall Stats".bold().blue());
    println!(
        "{}Movies Analyzed (after filters): {}",
        "• ".green(),
        metrics.movies_analyzed
    );
    println!(
        "{}Average Rating: {:.2} ⭐",
        "• ".green(),
        metrics.average_rating
    );
    println!(
        "{}Most Watched Year: {}",
        "• ".green(),
        metrics.most_watched_year
    );
    println!();
}

pub fn print_personality(personality: &Personality) {
    println!("{}", "✨ Your Film Personality".bold().blue());
    println!("{}\n", personality.summary().green());
}

pub fn print_genre_distribution(distribution: &[GenreShare]) {
    println!("{}", "Genre Distribution".bold().blue());
    for share in distribution {
        println!(
            "  {:<14} {:>4} {:>5.1}% {}",
            share.genre,
            share.count,
            share.share * 100.0,
            bar(share.share).cyan()
        );
    }
    println!();
}

pub fn print_ratings_by_year(years: &[YearSummary]) {
    println!("{}", "Ratings vs. Release Year".bold().blue());
    for summary in years {
        println!(
            "  {}  {:>3} films  avg {:.2}  {}",
            summary.year,
            summary.count,
            summary.average_rating,
            rating_stars(summary.average_rating).yellow()
        );
    }
    println!();
}

pub fn print_table(records: &[MergedRecord], limit: usize) {
    println!("{}", "Filtered Data Set".bold().blue());
    println!(
        "  {:<title$} {:>4}  {:<6} {}",
        "Name".bold(),
        "Year".bold(),
        "Rating".bold(),
        "Genre".bold(),
        title = TITLE_WIDTH
    );
    for record in records.iter().take(limit) {
        println!(
            "  {:<title$} {:>4}  {:<6} {}",
            truncate(&record.title, TITLE_WIDTH),
            record.year,
            rating_stars(record.rating),
            truncate(&record.genre, GENRE_WIDTH),
            title = TITLE_WIDTH
        );
    }
    if records.len() > limit {
        println!("  … {} more rows", records.len() - limit);
    }
}

/// Print every section of the dashboard followed by the row table
pub fn print_dashboard(dashboard: &Dashboard, records: &[MergedRecord], limit: usize) {
    print_header(dashboard.metrics.total_rated);
    print_metrics(&dashboard.metrics);
    print_personality(&dashboard.personality);
    print_genre_distribution(&dashboard.genre_distribution);
    print_ratings_by_year(&dashboard.ratings_by_year);
    print_table(records, limit);
}

pub fn print_no_matches_for_filters() {
    println!("{}", "No movies found for the selected filters.".yellow());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_stars() {
        assert_eq!(rating_stars(5.0), "★★★★★");
        assert_eq!(rating_stars(3.5), "★★★½");
        assert_eq!(rating_stars(0.5), "½");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Heat", 10), "Heat");
        assert_eq!(truncate("Eternal Sunshine", 8), "Eternal…");
    }

    #[test]
    fn test_bar_is_clamped() {
        assert_eq!(bar(0.0), "");
        assert_eq!(bar(2.0).chars().count(), BAR_WIDTH);
    }
}
