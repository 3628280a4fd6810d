use campus_compass::location::{loader, reconcile, Discrepancy, LocationResolver, MatchResult, LEGACY_BUILDINGS};
use campus_compass::points::{level_for, PointsTable};
use campus_compass::{annotate_meetup, server};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Campus Compass: resolve campus locations and compute meetup points.
///
/// Examples:
///   compass resolve "ECSW Courtyard"
///   compass describe "Pizza social. Location: the Plinth"
///   compass classify 8
///   compass level 22
///   compass serve --port 8080
#[derive(Parser)]
#[command(name = "compass", version, about, long_about = None)]
struct Cli {
    /// Gazetteer JSON override (defaults to ~/.campus-compass/gazetteer.json if present).
    #[arg(long, global = true)]
    gazetteer: Option<PathBuf>,

    /// Point tier JSON override.
    #[arg(long, global = true)]
    tiers: Option<PathBuf>,

    /// Log filter, e.g. "info" or "campus_compass=debug". RUST_LOG wins if set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a location string to one campus location.
    Resolve { query: String },
    /// Resolve the location mentioned in an event description.
    Describe { text: String },
    /// Look up a location by exact id.
    Locate { id: String },
    /// List locations whose name or alias contains the query.
    Search { query: String },
    /// List every location in the gazetteer.
    Locations,
    /// Point tier for a lobby size.
    Classify {
        #[arg(allow_hyphen_values = true)]
        lobby_size: i64,
    },
    /// Level and progress for a point total.
    Level {
        #[arg(allow_hyphen_values = true)]
        points: i64,
    },
    /// Coordinates and reward for a new meetup.
    Meetup {
        location: String,
        #[arg(allow_hyphen_values = true)]
        lobby_size: i64,
    },
    /// Compare the legacy building table against the gazetteer.
    Audit,
    /// Write the active gazetteer as JSON (a starting point for overrides).
    Export { path: PathBuf },
    /// Run the HTTP API.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let gazetteer = loader::load_configured(cli.gazetteer.as_deref())?;
    let tiers = match cli.tiers.as_deref() {
        Some(path) => PointsTable::load(path)?,
        None => PointsTable::builtin().clone(),
    };
    let resolver = LocationResolver::new(&gazetteer);

    match cli.command {
        Command::Resolve { query } => Ok(print_match(&query, resolver.resolve(&query))?),
        Command::Describe { text } => Ok(print_match(&text, resolver.resolve_description(&text))?),
        Command::Locate { id } => match resolver.get_by_id(&id) {
            Some(loc) => {
                eprintln!("  {}", loc.display_line());
                print_json(loc)?;
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("Location not found: '{}'", id);
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Search { query } => {
            print_json(&resolver.search_prefix(&query))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Locations => {
            print_json(gazetteer.locations())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Classify { lobby_size } => {
            print_json(tiers.classify(lobby_size)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Level { points } => {
            print_json(&level_for(points)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Meetup { location, lobby_size } => {
            let annotation = annotate_meetup(&resolver, &tiers, &location, lobby_size)?;
            if annotation.used_default() {
                eprintln!("  \u{26A0}\u{FE0F}  '{}' unresolved, using {}", location, annotation.location.name);
            }
            print_json(&annotation)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Audit => {
            let report = reconcile(&gazetteer, LEGACY_BUILDINGS)?;
            print_json(&AuditReport {
                refined: &report.refined,
                discrepancies: &report.discrepancies,
                unmatched: &report.unmatched,
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Export { path } => {
            loader::export_gazetteer(&gazetteer, &path)?;
            eprintln!("  Wrote {} locations to {}", gazetteer.len(), path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Serve { host, port } => {
            let state = server::AppState::new(gazetteer.clone(), tiers);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::start(&host, port, state))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[derive(Serialize)]
struct AuditReport<'a> {
    refined: &'a [String],
    discrepancies: &'a [Discrepancy],
    unmatched: &'a [String],
}

fn print_match(query: &str, result: MatchResult<'_>) -> Result<ExitCode, serde_json::Error> {
    match result {
        MatchResult::Matched { location, rule } => {
            eprintln!("  {} (via {})", location.display_line(), rule);
            print_json(location)?;
            Ok(ExitCode::SUCCESS)
        }
        MatchResult::Unresolved => {
            eprintln!("Location unresolved: '{}'", query);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
