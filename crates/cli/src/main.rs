mod explore;
mod render;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::config::{DEFAULT_GENRE_DIR, DEFAULT_RATINGS_PATH};
use data_loader::parser::{MAX_RATING, MIN_RATING};
use data_loader::{DataLoadError, LoaderConfig, MergeCache, MergedRecord, MergedTable, RatingsSource, Upload};
use pipeline::dashboard::genre_distribution;
use pipeline::{Dashboard, FilterPipeline, FilterSettings, genre_options};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

/// Letterboxd Replay - explore your film taste by genre
#[derive(Parser)]
#[command(name = "replay")]
#[command(about = "Merge a Letterboxd ratings export with IMDb genre tables and explore it", long_about = None)]
struct Cli {
    /// Ratings export to use instead of the default file
    #[arg(short, long)]
    ratings: Option<PathBuf>,

    /// Ratings file used when none is given with --ratings
    #[arg(long, default_value = DEFAULT_RATINGS_PATH)]
    default_ratings: PathBuf,

    /// Directory of genre reference tables (.csv/.tsv)
    #[arg(short, long, default_value = DEFAULT_GENRE_DIR)]
    genre_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// Lowest rating to include
    #[arg(long, default_value_t = MIN_RATING)]
    min_rating: f32,

    /// Highest rating to include
    #[arg(long, default_value_t = MAX_RATING)]
    max_rating: f32,

    /// Genres to include (repeat or comma-separate); all genres when omitted
    #[arg(long = "genre", value_delimiter = ',')]
    genres: Vec<String>,
}

impl From<FilterArgs> for FilterSettings {
    fn from(args: FilterArgs) -> Self {
        FilterSettings {
            min_rating: args.min_rating,
            max_rating: args.max_rating,
            genres: args.genres,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard for a filtered selection
    Report {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of table rows to print
        #[arg(long, default_value = "25")]
        limit: usize,

        /// Print the dashboard as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the genres available for filtering
    Genres,

    /// Write the filtered table to a CSV file
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Interactive session: change filters and re-render without reloading
    Explore,
}

/// Loaded inputs plus the memoized merge, shared by every command
pub struct Session {
    config: LoaderConfig,
    upload: Option<Upload>,
    cache: MergeCache,
}

impl Session {
    fn new(config: LoaderConfig, upload: Option<Upload>) -> Self {
        Self {
            config,
            upload,
            cache: MergeCache::new(),
        }
    }

    /// The merged table, reusing the cached one when the inputs are unchanged
    pub fn table(&mut self) -> Result<Arc<MergedTable>> {
        let source = RatingsSource::resolve(self.upload.clone(), &self.config);
        let start = Instant::now();
        let table = self.cache.get_or_load(&source, &self.config)?;
        tracing::debug!(source = %source.name(), elapsed = ?start.elapsed(), "Merged table ready");
        Ok(table)
    }

    /// Drop the cached table so the next access reparses the inputs
    pub fn reload(&mut self) {
        self.cache.invalidate();
    }
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = LoaderConfig::new(cli.default_ratings, cli.genre_dir);
    let upload = cli.ratings.as_deref().map(Upload::from_path).transpose()?;
    let mut session = Session::new(config, upload);

    let start = Instant::now();
    let table = session.table()?;

    // JSON output stays machine-readable
    let quiet = matches!(cli.command, Commands::Report { json: true, .. });
    if !quiet {
        println!(
            "{} Merged {} rated movies with genre data in {:?}",
            "✓".green(),
            table.len(),
            start.elapsed()
        );
        render::print_load_stats(&table.stats);
    }

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Report {
            filters,
            limit,
            json,
        } => handle_report(&table, &filters.into(), limit, json)?,
        Commands::Genres => handle_genres(&table),
        Commands::Export { filters, output } => handle_export(&table, &filters.into(), &output)?,
        Commands::Explore => explore::run(&mut session)?,
    }

    Ok(())
}

/// Print the error the way the user should see it.
///
/// Missing inputs get the bare instruction, an empty merge gets a warning,
/// and anything else is wrapped as an unexpected loading failure.
fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<DataLoadError>() {
        Some(load_err) if load_err.is_missing_input() => {
            eprintln!("{}", load_err.to_string().red());
        }
        Some(DataLoadError::NoMatches) => {
            eprintln!("{}", DataLoadError::NoMatches.to_string().yellow());
        }
        Some(load_err) => {
            eprintln!(
                "{}",
                format!("An unexpected error occurred during data loading: {}", load_err).red()
            );
        }
        None => eprintln!("{} {:#}", "Error:".red(), err),
    }
}

/// Run the filters over the merged table
pub fn apply_filters(table: &MergedTable, settings: &FilterSettings) -> Result<Vec<MergedRecord>> {
    FilterPipeline::from_settings(settings)?.apply(table.records.clone())
}

/// Handle the 'report' command
fn handle_report(
    table: &MergedTable,
    settings: &FilterSettings,
    limit: usize,
    json: bool,
) -> Result<()> {
    let filtered = apply_filters(table, settings)?;

    let Some(dashboard) = Dashboard::build(table.len(), &filtered) else {
        render::print_no_matches_for_filters();
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        render::print_dashboard(&dashboard, &filtered, limit);
    }
    Ok(())
}

/// Handle the 'genres' command
fn handle_genres(table: &MergedTable) {
    let counts: HashMap<String, usize> = genre_distribution(table.records())
        .into_iter()
        .map(|share| (share.genre, share.count))
        .collect();

    println!("{}", "Available genres:".bold().blue());
    for genre in genre_options(table.records()) {
        let count = counts.get(&genre).copied().unwrap_or(0);
        println!("  - {} ({})", genre, count);
    }
}

/// Handle the 'export' command
fn handle_export(table: &MergedTable, settings: &FilterSettings, output: &Path) -> Result<()> {
    let filtered = apply_filters(table, settings)?;
    if filtered.is_empty() {
        render::print_no_matches_for_filters();
        return Ok(());
    }

    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    write_csv(&filtered, file)?;

    println!(
        "{} Wrote {} rows to {}",
        "✓".green(),
        filtered.len(),
        output.display()
    );
    Ok(())
}

/// Serialize rows as CSV with the display column names as header
fn write_csv<W: Write>(records: &[MergedRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, year: i32, rating: f32, genre: &str) -> MergedRecord {
        MergedRecord {
            title: title.to_string(),
            year,
            rating,
            genre: genre.to_string(),
            date: None,
            letterboxd_uri: None,
        }
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["replay", "genres"]).unwrap();
        assert_eq!(cli.default_ratings, PathBuf::from("ratings.csv"));
        assert_eq!(cli.genre_dir, PathBuf::from("imdb_data"));
        assert!(cli.ratings.is_none());
    }

    #[test]
    fn test_report_filter_args() {
        let cli = Cli::try_parse_from([
            "replay",
            "report",
            "--min-rating",
            "3.5",
            "--genre",
            "Drama,Comedy",
            "--genre",
            "Horror",
        ])
        .unwrap();

        let Commands::Report { filters, limit, json } = cli.command else {
            panic!("expected report");
        };
        let settings: FilterSettings = filters.into();
        assert_eq!(settings.min_rating, 3.5);
        assert_eq!(settings.max_rating, 5.0);
        assert_eq!(settings.genres, vec!["Drama", "Comedy", "Horror"]);
        assert_eq!(limit, 25);
        assert!(!json);
    }

    #[test]
    fn test_write_csv_uses_display_headers() {
        let records = vec![
            record("Inception", 2010, 4.5, "Action, Sci-fi"),
            record("Heat", 1995, 5.0, "Crime"),
        ];
        let mut out = Vec::new();
        write_csv(&records, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Name,Year,Rating,Genre,Date,Letterboxd URI"));
        assert_eq!(lines.next(), Some("Inception,2010,4.5,\"Action, Sci-fi\",,"));
        assert_eq!(lines.next(), Some("Heat,1995,5.0,Crime,,"));
    }

    #[test]
    fn test_apply_filters() {
        let table = MergedTable::new(
            vec![
                record("Inception", 2010, 4.5, "Action, Sci-fi"),
                record("Heat", 1995, 2.0, "Crime"),
            ],
            Default::default(),
        );
        let settings = FilterSettings {
            min_rating: 3.0,
            ..FilterSettings::default()
        };

        let filtered = apply_filters(&table, &settings).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Inception");
    }

    #[test]
    fn test_session_reuses_cached_table() {
        let dir = tempfile::tempdir().unwrap();
        let ratings = dir.path().join("ratings.csv");
        std::fs::write(&ratings, "Name,Year,Rating\nHeat,1995,5\n").unwrap();
        let genre_dir = dir.path().join("imdb_data");
        std::fs::create_dir(&genre_dir).unwrap();
        std::fs::write(genre_dir.join("crime.csv"), "movie_name,year,genre\nHeat,1995,Crime\n")
            .unwrap();

        let mut session = Session::new(LoaderConfig::new(ratings, genre_dir), None);
        let first = session.table().unwrap();
        let second = session.table().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        session.reload();
        let third = session.table().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.len(), 1);
    }
}
