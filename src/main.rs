//! CLI entry point for the Berlin school aggregation job.
//!
//! `run` executes the full pipeline and writes the output artifacts;
//! `summarize` only loads and aggregates the extracts and prints the report.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use schulen_plz::config::{PipelineConfig, WritePolicy};
use schulen_plz::output::WriteOutcome;
use schulen_plz::pipeline::{self, Summaries};
use schulen_plz::report::{RULE, category_table, extremes_report, timestamp_line};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "schulen_plz")]
#[command(about = "Summarize Berlin schools by postal code", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate all school CSVs, join onto postal-code polygons and write the results
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// GeoJSON FeatureCollection of postal-code polygons
        #[arg(short, long)]
        boundaries: Option<PathBuf>,

        /// Directory to write the artifacts into
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Replace the output directory if it already exists instead of skipping
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
    /// Aggregate all school CSVs and print the report without writing anything
    Summarize {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Directory containing the semicolon-separated school CSVs
    #[arg(short = 'd', long)]
    input_dir: Option<PathBuf>,

    /// JSON file with column names and paths; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl InputArgs {
    fn load_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(dir) = &self.input_dir {
            config.input_dir = dir.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/schulen_plz.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("schulen_plz.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

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

    let cli = Cli::parse();

    let start = Local::now();
    println!("{RULE}");
    println!("{}", timestamp_line("Starting process,", &start));
    println!();

    match cli.command {
        Commands::Run {
            input,
            boundaries,
            output_dir,
            overwrite,
        } => {
            let mut config = input.load_config()?;
            if let Some(path) = boundaries {
                config.boundaries = path;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if overwrite {
                config.write_policy = WritePolicy::Overwrite;
            }

            let report = pipeline::run(&config).context("pipeline run failed")?;
            print_summaries(&report.summaries, &config);

            info!(
                polygons = report.polygons,
                matched = report.matched_polygons,
                "Boundary join complete"
            );
            match report.outcome {
                WriteOutcome::Written { dir, files } => {
                    info!(dir = %dir.display(), files = files.len(), "Artifacts written");
                }
                WriteOutcome::Skipped { dir } => {
                    warn!(
                        dir = %dir.display(),
                        "Output directory exists; remove it or pass --overwrite to regenerate"
                    );
                }
            }
        }
        Commands::Summarize { input } => {
            let config = input.load_config()?;
            let summaries = pipeline::summarize(&config).context("summarizing extracts failed")?;
            print_summaries(&summaries, &config);
        }
    }

    let end = Local::now();
    println!();
    println!("{RULE}");
    println!("{RULE}");
    println!("{}", timestamp_line("start", &start));
    println!("{}", timestamp_line("end", &end));
    println!();

    Ok(())
}

/// Prints the extremal postal codes and the per-type breakdown to stdout.
fn print_summaries(summaries: &Summaries, config: &PipelineConfig) {
    info!(
        loaded = summaries.loaded_rows,
        schools = summaries.schools.len(),
        postal_codes = summaries.by_postal_code.len(),
        "Summaries ready"
    );

    println!("{}", extremes_report(&summaries.extremes));
    println!("{RULE}");
    println!("{}", category_table(&summaries.by_category, &config.columns));
}
