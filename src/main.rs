//! CLI entry point for the trip aggregates tool.
//!
//! Loads one quarter of origin-destination travel-time aggregates (monthly,
//! daily and hourly files) and answers lookups and rankings over them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use trip_aggregates::{
    config::{RowSampling, SourceConfig},
    granularity::{Granularity, Quarter},
    output::{
        RankingRow, append_ranking, render_lookup, render_ranking, render_summary, to_json,
    },
    store::AggregationStore,
};

#[derive(Parser)]
#[command(name = "trip_aggregates")]
#[command(about = "Query quarterly zone-to-zone travel time aggregates", long_about = None)]
struct Cli {
    /// JSON config file (data_dir, dataset, row_sampling)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the aggregate CSV files
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Load only every second data row, like the legacy loader
    #[arg(long, global = true, default_value_t = false)]
    legacy_row_skip: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a quarter and report zone bounds and record counts
    Load {
        /// Quarter to load (1-4)
        #[arg(short, long)]
        quarter: Quarter,

        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Mean travel time and standard deviation between two zones
    Lookup {
        /// Quarter to load (1-4)
        #[arg(short, long)]
        quarter: Quarter,

        /// Origin zone id
        #[arg(long)]
        origin: u32,

        /// Destination zone id
        #[arg(long)]
        destination: u32,

        /// 0|month, 1|day or 2|hour
        #[arg(short, long)]
        granularity: Granularity,

        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// The N trips with the largest mean travel time
    Top {
        /// Quarter to load (1-4)
        #[arg(short, long)]
        quarter: Quarter,

        /// Number of trips to report
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// 0|month, 1|day or 2|hour
        #[arg(short, long)]
        granularity: Granularity,

        /// CSV file to append the ranking to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the ranking as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Walk the records of one granularity in file order
    List {
        /// Quarter to load (1-4)
        #[arg(short, long)]
        quarter: Quarter,

        /// 0|month, 1|day or 2|hour
        #[arg(short, long)]
        granularity: Granularity,

        /// Walk from the last record back to the first
        #[arg(short, long, default_value_t = false)]
        reverse: bool,

        /// Stop after this many records
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _log_guard = init_tracing()?;

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    info!(
        data_dir = %config.data_dir.display(),
        dataset = %config.dataset,
        row_sampling = ?config.row_sampling,
        "Source configuration resolved"
    );

    match cli.command {
        Commands::Load { quarter, json } => {
            let mut store = AggregationStore::new();
            let result = store.load(quarter, &config);
            if let Err(e) = &result {
                error!(error = %e, "Quarter load incomplete");
            }

            let summary = store.summary();
            if json {
                println!("{}", to_json(&summary)?);
            } else {
                println!("{}", render_summary(&summary));
            }
            result.with_context(|| format!("loading quarter {quarter}"))?;
        }
        Commands::Lookup {
            quarter,
            origin,
            destination,
            granularity,
            json,
        } => {
            let store = load_store(quarter, &config)?;
            let lookup = store.average_and_deviation(origin, destination, granularity);
            if json {
                println!("{}", to_json(&lookup)?);
            } else {
                println!("{}", render_lookup(origin, destination, granularity, &lookup));
            }
        }
        Commands::Top {
            quarter,
            count,
            granularity,
            output,
            json,
        } => {
            let store = load_store(quarter, &config)?;
            let ranked = store.top_n_by_mean_travel_time(count, granularity);
            if ranked.len() < count {
                info!(
                    requested = count,
                    available = ranked.len(),
                    "Fewer trips than requested"
                );
            }

            let rows = RankingRow::from_ranking(granularity, &ranked);
            if json {
                println!("{}", to_json(&rows)?);
            } else {
                println!("{}", render_ranking(granularity, &ranked));
            }

            if let Some(path) = output {
                append_ranking(&path, &rows)?;
                info!(path = %path.display(), rows = rows.len(), "Ranking written");
            }
        }
        Commands::List {
            quarter,
            granularity,
            reverse,
            limit,
        } => {
            let store = load_store(quarter, &config)?;
            let mut cursor = store.cursor(granularity);
            let limit = limit.unwrap_or(usize::MAX);

            let mut records = Vec::new();
            if reverse {
                let mut last = None;
                while let Some(record) = cursor.next() {
                    last = Some(*record);
                }
                records.extend(last);
                while records.len() < limit {
                    match cursor.previous() {
                        Some(record) => records.push(*record),
                        None => break,
                    }
                }
            } else {
                while records.len() < limit {
                    match cursor.next() {
                        Some(record) => records.push(*record),
                        None => break,
                    }
                }
            }

            println!("{} {} records", cursor.len(), granularity);
            for record in records.iter().take(limit) {
                println!("{}", record);
            }
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/trip_aggregates.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("trip_aggregates.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
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

/// Defaults, then the optional JSON file, then environment, then flags.
fn resolve_config(cli: &Cli) -> Result<SourceConfig> {
    let mut config = match &cli.config {
        Some(path) => SourceConfig::load(path)?,
        None => SourceConfig::default(),
    }
    .with_env_overrides();

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if cli.legacy_row_skip {
        config.row_sampling = RowSampling::EveryOther;
    }
    Ok(config)
}

/// Loads `quarter`, failing if any of its files could not be read.
fn load_store(quarter: Quarter, config: &SourceConfig) -> Result<AggregationStore> {
    let mut store = AggregationStore::new();
    store
        .load(quarter, config)
        .with_context(|| format!("loading quarter {quarter}"))?;
    Ok(store)
}
