//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dqprofile: data-quality profiling for tabular data
#[derive(Parser)]
#[command(name = "dqprofile")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile a data file and write the report
    Profile {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dataset name used in the report (default: file name without extension)
        #[arg(short, long)]
        name: Option<String>,

        /// Directory for latest_profile.json and snapshots
        #[arg(short, long, env = "DQPROFILE_RESULTS_DIR", default_value = "results")]
        results_dir: PathBuf,

        /// JSON file overriding thresholds, weights and heuristics
        #[arg(short, long, env = "DQPROFILE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Profile the newest CSV in the intake directory and archive it
    Ingest {
        /// Directory scanned for new CSV files
        #[arg(short, long, env = "DQPROFILE_INPUT_DIR", default_value = "input")]
        input_dir: PathBuf,

        /// Directory processed files are moved to
        #[arg(short, long, env = "DQPROFILE_ARCHIVE_DIR", default_value = "archive")]
        archive_dir: PathBuf,

        /// Directory for latest_profile.json and snapshots
        #[arg(short, long, env = "DQPROFILE_RESULTS_DIR", default_value = "results")]
        results_dir: PathBuf,

        /// JSON file overriding thresholds, weights and heuristics
        #[arg(short, long, env = "DQPROFILE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Show the most recent profile
    Show {
        /// Directory holding latest_profile.json
        #[arg(short, long, env = "DQPROFILE_RESULTS_DIR", default_value = "results")]
        results_dir: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
