//! Profile command - profile one file and persist the report.

use std::path::PathBuf;

use colored::Colorize;
use dqprofile::{ReportWriter, run_profile};

use super::{load_profiler, print_outcome};

pub fn run(
    file: PathBuf,
    name: Option<String>,
    results_dir: PathBuf,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    println!(
        "{} {}",
        "Profiling".cyan().bold(),
        file.display().to_string().white()
    );

    let profiler = load_profiler(config)?;
    let writer = ReportWriter::new(&results_dir);
    let profile = run_profile(&file, name.as_deref(), &profiler, &writer)?;

    if verbose {
        println!();
        println!("{}", "Columns:".yellow().bold());
        for column in &profile.columns {
            println!(
                "  {:24} {:10} null {:>6.1}%  invalid {}",
                column.name,
                column.inferred_type.as_str(),
                column.null_pct * 100.0,
                column.invalid_count
            );
        }
        println!();
    }

    print_outcome(&profile);
    println!(
        "Report written to {}",
        writer.latest_path().display().to_string().cyan()
    );

    Ok(())
}
