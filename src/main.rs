//! CLI entry point for bike-share trip statistics.
//!
//! Provides subcommands for a one-shot summary of a city's trips, an
//! interactive exploration session, and listing the configured cities.

mod interactive;

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use bikeshare_stats::output::{self, Summary};
use bikeshare_stats::{
    City, CityRegistry, Dataset, DayFilter, FilterSpec, MonthFilter, RecordStore, filter,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::interactive::Session;

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Descriptive statistics over US bike-share trip data", long_about = None)]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// JSON file mapping city names to CSV paths (overrides --data-dir)
    #[arg(long, global = true, value_name = "FILE")]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize one city's trips, optionally restricted to a month and weekday
    Summarize {
        /// Chicago, New York City or Washington
        #[arg(short, long)]
        city: City,

        /// January to June, or "all"
        #[arg(short, long, default_value = "all")]
        month: MonthFilter,

        /// Monday to Sunday, or "all"
        #[arg(short, long, default_value = "all")]
        day: DayFilter,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Print this many raw rows after the summary
        #[arg(long, default_value_t = 0)]
        raw_rows: usize,

        /// CSV file to append a one-line summary to
        #[arg(long, value_name = "FILE")]
        append_csv: Option<PathBuf>,
    },
    /// Prompt for filters and explore the data interactively
    Explore,
    /// List the configured cities and their data files
    Cities,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let _log_guard = init_tracing()?;

    let cli = Cli::parse();
    let store = RecordStore::new(resolve_registry(cli.data_dir, cli.registry)?);

    match cli.command {
        Commands::Summarize {
            city,
            month,
            day,
            format,
            raw_rows,
            append_csv,
        } => {
            let spec = FilterSpec::new(city, month, day);
            let dataset = load_city(&store, city)?;
            let filtered = filter(&dataset, &spec);
            let summary = summarize(&filtered, &spec)?;

            let mut stdout = io::stdout().lock();
            match format {
                Format::Text => {
                    writeln!(stdout, "{}", output::render_summary(&summary))?;
                    if raw_rows > 0 {
                        writeln!(stdout, "{}", output::SEPARATOR)?;
                        let rows = filtered.page(0, raw_rows);
                        writeln!(stdout, "{}", output::render_rows(filtered.schema(), 0, rows))?;
                    }
                }
                Format::Json => writeln!(stdout, "{}", output::to_json(&summary)?)?,
            }

            if let Some(path) = append_csv {
                output::append_summary(&path, &summary)?;
                info!(path = %path.display(), "Summary appended");
            }
        }
        Commands::Explore => {
            let stdin = io::stdin().lock();
            let stdout = io::stdout().lock();
            Session::new(stdin, stdout).run(&store)?;
        }
        Commands::Cities => {
            let mut stdout = io::stdout().lock();
            for (city, path) in store.registry().iter() {
                writeln!(stdout, "{city}: {}", path.display())?;
            }
        }
    }

    Ok(())
}

/// Colored stderr output plus a JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}

/// `--registry` wins; otherwise default file names under `--data-dir`,
/// `BIKESHARE_DATA_DIR`, or the working directory.
fn resolve_registry(
    data_dir: Option<PathBuf>,
    registry: Option<PathBuf>,
) -> Result<CityRegistry> {
    if let Some(path) = registry {
        return Ok(CityRegistry::load(path)?);
    }
    let data_dir = data_dir
        .or_else(|| std::env::var_os("BIKESHARE_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(CityRegistry::with_defaults(data_dir))
}

/// Loads a city's trips, logging how many were read.
#[tracing::instrument(skip(store))]
pub(crate) fn load_city(store: &RecordStore, city: City) -> Result<Dataset> {
    let dataset = store.load(city)?;
    info!(records = dataset.len(), schema = ?dataset.schema(), "Trip data loaded");
    Ok(dataset)
}

/// Computes every statistic for an already filtered dataset.
#[tracing::instrument(skip(dataset), fields(records = dataset.len()))]
pub(crate) fn summarize(dataset: &Dataset, spec: &FilterSpec) -> Result<Summary> {
    let summary = Summary::compute(dataset, spec)?;
    if summary.durations.non_positive_trips > 0 {
        warn!(
            count = summary.durations.non_positive_trips,
            "Trips ending at or before their start are included in duration totals"
        );
    }
    Ok(summary)
}
