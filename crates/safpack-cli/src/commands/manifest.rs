//! Manifest command - write a starter metadata table.

use std::path::PathBuf;

use colored::Colorize;

pub fn run(
    source: PathBuf,
    output: Option<PathBuf>,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !source.is_dir() {
        return Err(format!("Not a directory: {}", source.display()).into());
    }

    let output = output.unwrap_or_else(|| source.join("metadata.csv"));
    let rows = safpack::generate_manifest(&source, &output)?;

    println!(
        "{} {} with {} file(s)",
        "Wrote".green().bold(),
        output.display(),
        rows
    );
    Ok(())
}
