//! CLI command implementations.

pub mod manifest;
pub mod process;
pub mod verify;

use std::fs;

use colored::Colorize;
use safpack::{LoaderConfig, PackagerConfig, Placement, Report, default_registry_url};

use crate::cli::RunOptions;

/// Build a packager configuration from command-line options.
pub fn packager_config(options: &RunOptions) -> Result<PackagerConfig, Box<dyn std::error::Error>> {
    if !options.delimiter.is_ascii() {
        return Err(format!("Delimiter must be a single ASCII character, got '{}'", options.delimiter).into());
    }

    let mut config = PackagerConfig {
        loader: LoaderConfig {
            delimiter: options.delimiter as u8,
            ..LoaderConfig::default()
        },
        ..PackagerConfig::default()
    };

    if options.link {
        config.placement = Placement::Symlink;
    }

    if let Some(path) = &options.license {
        config.license_text = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read license file {}: {}", path.display(), e))?;
    }

    if options.validate_collections {
        config.registry_url = Some(options.registry.clone().unwrap_or_else(default_registry_url));
    }

    Ok(config)
}

/// Print a report as colorized text or JSON.
pub fn print_report(report: &Report, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    for line in report.lines() {
        if line.starts_with("[OK]") {
            println!("{}", line.green());
        } else if line.starts_with("[CRITICAL ERROR]") || line.starts_with("[ERROR]") {
            println!("{}", line.red().bold());
        } else if line.starts_with("[INFO]") {
            println!("{}", line.yellow());
        } else if line.starts_with("At least one critical error") {
            println!("{}", line.red().bold());
        } else if line.starts_with('#') {
            println!("{}", line.cyan());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}
