//! Verify command - check a table and content directory.

use std::path::PathBuf;

use colored::Colorize;
use safpack::Packager;

use crate::cli::RunOptions;

use super::{packager_config, print_report};

pub fn run(
    table: PathBuf,
    source: PathBuf,
    options: RunOptions,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let packager = Packager::with_config(packager_config(&options)?);

    if verbose && !options.json {
        println!(
            "{} {} against {}",
            "Verifying".cyan().bold(),
            table.display(),
            source.display()
        );
    }

    let report = packager.verify(&table, &source)?;
    print_report(&report, options.json)?;

    if report.has_critical_errors() {
        return Err("verification found critical errors".into());
    }
    Ok(())
}
