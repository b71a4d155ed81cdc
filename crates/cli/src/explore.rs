//! Interactive session over one merged table.
//!
//! Filter changes re-render from the cached merge; only `reload` reparses
//! the inputs.

use crate::render;
use crate::{Session, apply_filters};
use anyhow::{Result, anyhow, bail};
use colored::Colorize;
use pipeline::filters::RatingRangeFilter;
use pipeline::{Dashboard, FilterSettings, genre_options};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

const ROW_LIMIT: usize = 15;

const HELP: &str = "\
Commands:
  rating <min> <max>   keep ratings in [min, max] (half-star steps)
  genre <a,b,...>      keep rows with any of these genres
  clear                reset all filters
  genres               list the available genres
  show                 render the dashboard
  reload               reparse the input files
  help                 show this message
  quit                 leave the session";

#[derive(Debug, Clone, PartialEq)]
enum ExploreCommand {
    Rating { min: f32, max: f32 },
    Genre(Vec<String>),
    Clear,
    Genres,
    Show,
    Reload,
    Help,
    Quit,
}

impl FromStr for ExploreCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word.to_ascii_lowercase().as_str() {
            "rating" => {
                let mut bounds = rest.split_whitespace();
                let (Some(min), Some(max), None) = (bounds.next(), bounds.next(), bounds.next())
                else {
                    bail!("usage: rating <min> <max>");
                };
                let min: f32 = min.parse().map_err(|_| anyhow!("not a rating: {}", min))?;
                let max: f32 = max.parse().map_err(|_| anyhow!("not a rating: {}", max))?;
                // Validate now so a bad range never reaches the settings
                RatingRangeFilter::new(min, max)?;
                Ok(ExploreCommand::Rating { min, max })
            }
            "genre" => {
                let genres: Vec<String> = rest
                    .split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect();
                if genres.is_empty() {
                    bail!("usage: genre <a,b,...> (use 'clear' to select all genres)");
                }
                Ok(ExploreCommand::Genre(genres))
            }
            "clear" => Ok(ExploreCommand::Clear),
            "genres" => Ok(ExploreCommand::Genres),
            "show" | "" => Ok(ExploreCommand::Show),
            "reload" => Ok(ExploreCommand::Reload),
            "help" | "?" => Ok(ExploreCommand::Help),
            "quit" | "exit" | "q" => Ok(ExploreCommand::Quit),
            other => Err(anyhow!("unknown command '{}', try 'help'", other)),
        }
    }
}

fn describe(settings: &FilterSettings) -> String {
    let genres = if settings.genres.is_empty() {
        "all genres".to_string()
    } else {
        settings.genres.join(", ")
    };
    format!(
        "rating {:.1}-{:.1}, {}",
        settings.min_rating, settings.max_rating, genres
    )
}

fn show(session: &mut Session, settings: &FilterSettings) -> Result<()> {
    let table = session.table()?;
    let filtered = apply_filters(&table, settings)?;
    match Dashboard::build(table.len(), &filtered) {
        Some(dashboard) => render::print_dashboard(&dashboard, &filtered, ROW_LIMIT),
        None => render::print_no_matches_for_filters(),
    }
    Ok(())
}

/// Read commands from stdin until `quit` or end of input.
///
/// Command mistakes are reported and the loop continues; a failed load
/// ends the session with that error.
pub fn run(session: &mut Session) -> Result<()> {
    let mut settings = FilterSettings::default();
    show(session, &settings)?;
    println!("\n{}", "Type 'help' for commands.".dimmed());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", "replay> ".bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let command = match line?.parse::<ExploreCommand>() {
            Ok(command) => command,
            Err(err) => {
                println!("{}", err.to_string().red());
                continue;
            }
        };

        match command {
            ExploreCommand::Rating { min, max } => {
                settings.min_rating = min;
                settings.max_rating = max;
                show(session, &settings)?;
            }
            ExploreCommand::Genre(genres) => {
                settings.genres = genres;
                show(session, &settings)?;
            }
            ExploreCommand::Clear => {
                settings = FilterSettings::default();
                show(session, &settings)?;
            }
            ExploreCommand::Genres => {
                let table = session.table()?;
                println!("{}", genre_options(table.records()).join(", "));
            }
            ExploreCommand::Show => show(session, &settings)?,
            ExploreCommand::Reload => {
                session.reload();
                let table = session.table()?;
                println!("{} Reloaded {} rated movies", "✓".green(), table.len());
                show(session, &settings)?;
            }
            ExploreCommand::Help => println!("{}", HELP),
            ExploreCommand::Quit => break,
        }
        tracing::debug!(filters = %describe(&settings), "Explore step done");
    }

    Ok(())
}
