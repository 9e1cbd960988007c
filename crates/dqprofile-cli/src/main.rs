//! dqprofile CLI - data-quality profiling for CSV files.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Profile {
            file,
            name,
            results_dir,
            config,
        } => commands::profile::run(file, name, results_dir, config, cli.verbose),

        Commands::Ingest {
            input_dir,
            archive_dir,
            results_dir,
            config,
        } => commands::ingest::run(input_dir, archive_dir, results_dir, config),

        Commands::Show { results_dir, json } => commands::show::run(results_dir, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
