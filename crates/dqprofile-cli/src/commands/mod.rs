//! CLI command implementations.

pub mod ingest;
pub mod profile;
pub mod show;

use std::path::PathBuf;

use colored::{ColoredString, Colorize};
use dqprofile::{DatasetProfile, Profiler, ProfilerConfig};
use tracing::debug;

/// Build a profiler from an optional config file.
pub fn load_profiler(config: Option<PathBuf>) -> Result<Profiler, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => {
            debug!(config = %path.display(), "loading profiler config");
            ProfilerConfig::load(&path)?
        }
        None => ProfilerConfig::default(),
    };
    Ok(Profiler::with_config(config))
}

/// Colour a fraction green, yellow or red.
pub fn colored_pct(value: f64) -> ColoredString {
    let text = format!("{:.1}%", value * 100.0);
    if value >= 0.95 {
        text.green()
    } else if value >= 0.8 {
        text.yellow()
    } else {
        text.red()
    }
}

/// One-line outcome printed after a run.
pub fn print_outcome(profile: &DatasetProfile) {
    println!(
        "Profiled {} rows x {} columns: DQ score {}",
        profile.row_count.to_string().white().bold(),
        profile.summary.n_columns.to_string().white().bold(),
        colored_pct(profile.summary.dq_score).bold()
    );
    if profile.warnings.is_empty() {
        println!("{}", "There are no warnings.".green());
    } else {
        for warning in &profile.warnings {
            println!("  {} {}", "!".yellow().bold(), warning.message.yellow());
        }
    }
}
