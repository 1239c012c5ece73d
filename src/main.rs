//! efh_grouper - batch analysis of a maintenance task list
//!
//! Reads a CSV task list, groups tasks by EFH interval, checks compliance
//! and nesting, prints a summary and optionally writes a JSON report.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use efh_grouper::config::{AnalysisConfig, load_config};
use efh_grouper::ingest::task_list::load_task_list;
use efh_grouper::logging::{self, LogLevel, Stage};
use efh_grouper::model::AnalysisError;
use efh_grouper::report::{build_report, render_summary, write_json};
use efh_grouper::run_analysis;

/// Command-line arguments for efh_grouper
#[derive(Parser, Debug)]
#[command(name = "efh_grouper")]
#[command(about = "Group maintenance tasks by EFH interval and check compliance")]
#[command(version)]
struct Args {
    /// Task list in CSV format
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long, env = "EFH_CONFIG")]
    config: Option<PathBuf>,

    /// Write the full report as JSON to this path
    #[arg(short, long, env = "EFH_REPORT")]
    output: Option<PathBuf>,

    /// Append log entries to this file
    #[arg(long, env = "EFH_LOG_FILE")]
    log_file: Option<String>,

    /// Show per-task debug messages
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: &Args) -> Result<(), AnalysisError> {
    let config = match &args.config {
        Some(path) => {
            let config = load_config(path)?;
            logging::info(Stage::System, None, &format!("Loaded config from {}", path.display()));
            config
        }
        None => AnalysisConfig::default(),
    };

    let records = load_task_list(&args.input, &config.columns)?;
    let run = run_analysis(&records, &config)?;

    println!();
    print!("{}", render_summary(&run));

    if let Some(path) = &args.output {
        let report = build_report(run, chrono::Utc::now());
        write_json(&report, path)?;
        logging::info(Stage::System, None, &format!("Report written to {}", path.display()));
    }

    Ok(())
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let min_level = if args.verbose { LogLevel::Debug } else { LogLevel::Info };
    logging::init_logger(min_level, args.log_file.as_deref(), false);
    logging::info(
        Stage::System,
        None,
        &format!("efh_grouper v{} analysing {}", env!("CARGO_PKG_VERSION"), args.input.display()),
    );

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ AnalysisError::NoValidIntervals { .. }) => {
            logging::warn(Stage::System, None, &e.to_string());
            ExitCode::from(2)
        }
        Err(e) => {
            logging::error(Stage::System, None, &e.to_string());
            ExitCode::FAILURE
        }
    }
}
