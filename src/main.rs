//! CLI entry point for the bikeshare explorer.
//!
//! Provides an interactive `explore` session and a one-shot `report`
//! subcommand over the same load/filter/statistics pipeline.

use anyhow::{Result, bail};
use bikeshare::{
    config::CityConfig,
    console::Terminal,
    dataset::{Loader, MalformedRowPolicy},
    error::LoadError,
    filter::{FilterCriteria, Selection, apply_filters},
    output::{self, ReportRow, append_record},
    session,
    stats::Report,
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory holding the default city CSV files
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// JSON file mapping city names to CSV paths (overrides --data-dir)
    #[arg(long, global = true)]
    cities: Option<PathBuf>,

    /// Drop rows with unparseable timestamps or numbers instead of failing
    #[arg(long, global = true, default_value_t = false)]
    skip_malformed: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively pick filters and browse statistics (default)
    Explore,
    /// Print statistics for one set of filters without prompting
    Report {
        /// City to analyze
        #[arg(long)]
        city: String,

        /// Month name or "all"
        #[arg(long, default_value = "all")]
        month: String,

        /// Day-of-week name or "all"
        #[arg(long, default_value = "all")]
        day: String,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append a summary row to
        #[arg(long)]
        append: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: stderr (quiet by default, prompts share the terminal) + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

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

    let cli = Cli::parse();

    let config = match &cli.cities {
        Some(path) => CityConfig::load(path)?,
        None => CityConfig::builtin(&cli.data_dir),
    };
    let policy = if cli.skip_malformed {
        MalformedRowPolicy::Skip
    } else {
        MalformedRowPolicy::Abort
    };
    let loader = Loader::new(config).with_policy(policy);

    let result = match cli.command.unwrap_or(Commands::Explore) {
        Commands::Explore => session::run(&mut Terminal::new(), &loader),
        Commands::Report {
            city,
            month,
            day,
            json,
            append,
        } => report(&loader, &city, &month, &day, json, append.as_deref()),
    };

    if let Err(e) = &result {
        let missing_data = e
            .downcast_ref::<LoadError>()
            .is_some_and(LoadError::is_data_not_found);
        if missing_data {
            error!(
                error = %e,
                data_dir = %cli.data_dir.display(),
                cities = ?cli.cities,
                "City data unavailable, check --data-dir or --cities"
            );
        } else {
            error!(error = %e, "bikeshare failed");
        }
    }
    result
}

/// Parses command-line filter values, rejecting anything outside the allowed sets.
fn criteria_from_args(loader: &Loader, city: &str, month: &str, day: &str) -> Result<FilterCriteria> {
    let city = city.trim().to_lowercase();
    let cities = loader.config().city_names();
    if !cities.contains(&city.as_str()) {
        bail!("unknown city '{city}', expected one of: {}", cities.join(", "));
    }

    let Some(month) = Selection::<chrono::Month>::parse_month(month) else {
        bail!("unknown month '{month}', expected 'all' or a full month name");
    };
    let Some(weekday) = Selection::<chrono::Weekday>::parse_weekday(day) else {
        bail!("unknown day '{day}', expected 'all' or a full day name");
    };

    Ok(FilterCriteria {
        city,
        month,
        weekday,
    })
}

/// Loads, filters and reports once, printing to stdout.
#[tracing::instrument(skip(loader))]
fn report(
    loader: &Loader,
    city: &str,
    month: &str,
    day: &str,
    json: bool,
    append: Option<&Path>,
) -> Result<()> {
    let criteria = criteria_from_args(loader, city, month, day)?;
    let dataset = loader.load(&criteria.city)?;
    let filtered = apply_filters(&dataset, &criteria);

    if filtered.is_empty() {
        println!("{}", session::NO_MATCHING_DATA);
        return Ok(());
    }

    let report = Report::compute(&filtered);

    if json {
        println!("{}", output::to_json(&report)?);
    } else {
        for line in output::report_lines(&report) {
            println!("{line}");
        }
    }

    if let Some(path) = append {
        append_record(path, &ReportRow::new(&criteria, &report))?;
        info!(path = %path.display(), "Summary row appended");
    }

    Ok(())
}
