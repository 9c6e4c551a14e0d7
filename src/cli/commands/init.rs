//! Init and Config commands.

use std::path::Path;

use crate::config::{CONFIG_DIR, Settings};

/// Run init command - create `.ragchunk/settings.toml` under `dir`.
pub fn run_init(dir: &Path, force: bool) {
    match Settings::init_config_file(dir, force) {
        Ok(path) => {
            println!("Created configuration file at: {}", path.display());
            println!("Edit this file to customize your settings.");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Run config command - display the merged configuration and where it came from.
pub fn run_config(config: &Settings, explicit: Option<&Path>) {
    let source = match (explicit, &config.workspace_root) {
        (Some(path), _) => path.display().to_string(),
        (None, Some(root)) => root.join(CONFIG_DIR).display().to_string(),
        (None, None) => "defaults (no settings file found)".to_string(),
    };

    println!("Current Configuration ({source}):");
    println!("{}", "=".repeat(50));
    match toml::to_string_pretty(config) {
        Ok(toml_str) => println!("{toml_str}"),
        Err(e) => eprintln!("Error displaying config: {e}"),
    }
}
