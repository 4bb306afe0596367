//! Process command - build the package.

use std::path::PathBuf;

use colored::Colorize;
use safpack::{ArchiveOutcome, Packager};

use crate::cli::RunOptions;

use super::{packager_config, print_report};

pub fn run(
    table: PathBuf,
    source: PathBuf,
    output: PathBuf,
    zip: bool,
    options: RunOptions,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let packager = Packager::with_config(packager_config(&options)?);

    if verbose && !options.json {
        println!(
            "{} {} from {} into {}",
            "Packaging".cyan().bold(),
            table.display(),
            source.display(),
            output.display()
        );
    }

    let report = packager.process(&table, &source, &output, zip)?;
    print_report(&report, options.json)?;

    if report.materialization_skipped {
        return Err("package not created".into());
    }

    if !options.json {
        let written = report.items.iter().filter(|o| o.is_ok()).count();
        println!();
        println!(
            "{} {} item(s) in {}",
            "Done:".green().bold(),
            written,
            output.display()
        );
        if let Some(ArchiveOutcome::Written { path, .. }) = &report.archive {
            println!("{} {}", "Archive:".green().bold(), path.display());
        }
    }

    let mut failures = report.failed_items().filter_map(|o| o.failure());
    if let Some(first) = failures.next() {
        let more = failures.count();
        if more == 0 {
            return Err(first.into());
        }
        return Err(format!("{} (and {} more failed row(s))", first, more).into());
    }
    Ok(())
}
