//! Ingest command - process the newest file in the intake directory.

use std::path::PathBuf;

use colored::Colorize;
use dqprofile::{Intake, ReportWriter};

use super::{load_profiler, print_outcome};

pub fn run(
    input_dir: PathBuf,
    archive_dir: PathBuf,
    results_dir: PathBuf,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let profiler = load_profiler(config)?;
    let writer = ReportWriter::new(&results_dir);
    let intake = Intake::new(&input_dir, &archive_dir, profiler, writer.clone());

    match intake.process_latest()? {
        Some(profile) => {
            println!(
                "{} {}",
                "Processed".cyan().bold(),
                profile.dataset_name.white()
            );
            print_outcome(&profile);
            println!(
                "Report written to {}",
                writer.latest_path().display().to_string().cyan()
            );
        }
        None => {
            println!(
                "No CSV files found in {}",
                input_dir.display().to_string().white()
            );
        }
    }

    Ok(())
}
