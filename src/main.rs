//! ragchunk command-line entry point.

use clap::Parser;
use std::path::{Path, PathBuf};

use ragchunk::cli::commands::{chunk, init};
use ragchunk::cli::{Cli, Commands};
use ragchunk::config::Settings;
use ragchunk::logging;

/// Load settings from `--config` or the workspace and set up logging.
fn load_settings(config: Option<&Path>) -> Settings {
    let loaded = match config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    match loaded {
        Ok(settings) => {
            logging::init_with_config(&settings.logging);
            tracing::debug!(
                target: "cli",
                "Workspace root: {:?}",
                settings.workspace_root
            );
            settings
        }
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        // Init creates the settings file, so it must not require one
        Commands::Init { force } => {
            let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            init::run_init(&dir, force);
        }
        Commands::Config => {
            let settings = load_settings(config_path);
            init::run_config(&settings, config_path);
        }
        Commands::Chunk(args) => {
            let settings = load_settings(config_path);
            if let Err(e) = chunk::run(args, &settings) {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}
