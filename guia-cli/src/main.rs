//! Guia CLI - Command-line interface
//!
//! This binary provides a command-line interface to the guia library:
//! it streams raw positions through the pipeline and prints the
//! announcements a speech driver would speak, or resolves a single
//! coordinate pair.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use guia::config::ConfigFile;
use guia::logging::init_logging;
use guia::position::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

mod commands;
mod error;

#[derive(Parser)]
#[command(name = "guia")]
#[command(version = guia::VERSION)]
#[command(about = "Announce address changes as you move", long_about = None)]
struct Cli {
    /// Path to a config file (default: ~/.guia/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stream JSON-line positions through the pipeline
    Run {
        /// Read positions from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Reverse-geocode a single coordinate pair
    Resolve {
        /// Latitude in decimal degrees
        #[arg(long)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long)]
        lon: f64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _logging_guard = match init_logging("logs", "guia.log") {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: could not initialize logging: {}", e);
            None
        }
    };

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Run { input } => commands::run(config, input).await,
        Command::Resolve { lat, lon } => {
            if !(MIN_LAT..=MAX_LAT).contains(&lat) {
                eprintln!("Error: latitude must be between {} and {}", MIN_LAT, MAX_LAT);
                process::exit(1);
            }
            if !(MIN_LON..=MAX_LON).contains(&lon) {
                eprintln!("Error: longitude must be between {} and {}", MIN_LON, MAX_LON);
                process::exit(1);
            }
            commands::resolve(config, lat, lon).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_config(path: &Option<PathBuf>) -> Result<ConfigFile, guia::config::ConfigFileError> {
    match path {
        Some(path) => ConfigFile::load_from(path),
        None => ConfigFile::load(),
    }
}
