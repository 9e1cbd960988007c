//! Show command - display the most recent profile. Read-only.

use std::path::PathBuf;

use colored::Colorize;
use dqprofile::{DatasetProfile, FeatureStats, ReportWriter, describe_sample};

pub fn run(results_dir: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let writer = ReportWriter::new(&results_dir);
    let latest = writer.latest_path();

    if !latest.exists() {
        return Err(format!(
            "No profile found at {}\nRun 'dqprofile profile <FILE>' or 'dqprofile ingest' first.",
            latest.display()
        )
        .into());
    }

    let profile = writer.load_latest()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_profile(&profile);
    }

    Ok(())
}

fn print_profile(profile: &DatasetProfile) {
    let s = &profile.summary;

    println!(
        "{} {}",
        "Data quality for".cyan().bold(),
        profile.dataset_name.white()
    );
    println!(
        "Profiled at {} ({} rows)",
        profile.execution_timestamp.to_rfc3339(),
        profile.row_count
    );
    println!();

    println!("{}", "Scores:".yellow().bold());
    println!("  DQ score:     {}", super::colored_pct(s.dq_score).bold());
    println!("  Completeness: {}", super::colored_pct(s.completeness_score));
    println!("  Uniqueness:   {}", super::colored_pct(s.uniqueness_score));
    println!("  Validity:     {}", super::colored_pct(s.validity_score));
    println!("  Consistency:  {}", super::colored_pct(s.consistency_score));
    println!();

    println!("{}", "Rows:".yellow().bold());
    println!("  Complete:     {:.1}%", s.complete_rows_pct * 100.0);
    println!("  Duplicated:   {:.1}%", s.duplicated_rows_pct * 100.0);
    println!("  Inconsistent: {:.1}%", s.inconsistency_pct * 100.0);
    println!();

    println!("{}", "Warnings:".yellow().bold());
    if profile.warnings.is_empty() {
        println!("  {}", "There are no warnings.".green());
    } else {
        for warning in &profile.warnings {
            println!(
                "  {} {}",
                format!("[{}]", warning.kind.label()).yellow(),
                warning.message
            );
        }
    }
    println!();

    println!("{}", "Columns:".yellow().bold());
    println!(
        "  {:24} {:10} {:>7} {:>8} {:>8} {:>12} {:>12}",
        "name", "type", "null", "unique", "invalid", "min", "max"
    );
    for column in &profile.columns {
        println!(
            "  {:24} {:10} {:>6.1}% {:>8} {:>8} {:>12} {:>12}",
            column.name,
            column.inferred_type.as_str(),
            column.null_pct * 100.0,
            column.unique_count,
            column.invalid_count,
            format_stat(column.min),
            format_stat(column.max)
        );
    }

    print_sample_stats(profile);
}

/// Statistics by feature, computed from the report's row sample only.
fn print_sample_stats(profile: &DatasetProfile) {
    println!();
    println!("{}", "Statistics by feature (sample):".yellow().bold());
    if profile.sample.is_empty() {
        println!("  There is no sample in the profile to calculate statistics.");
        return;
    }

    for feature in describe_sample(profile) {
        println!(
            "  {} {}",
            feature.column.white().bold(),
            format!("({})", feature.inferred_type).dimmed()
        );
        match feature.stats {
            FeatureStats::Numeric {
                min,
                max,
                mean,
                std,
                p25,
                p50,
                p75,
            } => {
                println!(
                    "    min {:.2}  max {:.2}  mean {:.2}  std {}",
                    min,
                    max,
                    mean,
                    std.map(|s| format!("{:.2}", s)).unwrap_or_else(|| "-".to_string())
                );
                println!("    p25 {:.2}  p50 {:.2}  p75 {:.2}", p25, p50, p75);
            }
            FeatureStats::Text { unique, mode, top } => {
                println!(
                    "    unique {}  mode {}",
                    unique,
                    mode.unwrap_or_else(|| "-".to_string())
                );
                for (value, count) in top {
                    println!("    {:>6}  {}", count, value);
                }
            }
            FeatureStats::Datetime { earliest, latest } => {
                println!(
                    "    earliest {}  latest {}",
                    earliest.format("%Y-%m-%d"),
                    latest.format("%Y-%m-%d")
                );
            }
            FeatureStats::NoValues => println!("    There are no valid values."),
            FeatureStats::Missing => println!("    There is no sample data for this column."),
        }
    }
}

fn format_stat(value: Option<f64>) -> String {
    value.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "-".to_string())
}
