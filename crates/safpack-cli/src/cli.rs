//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// safpack: build Simple Archive Format deposit packages from a metadata CSV
#[derive(Parser)]
#[command(name = "safpack")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a metadata table against a content directory without writing anything
    Verify {
        /// Path to the metadata CSV
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Directory holding the content files
        #[arg(value_name = "SOURCE_DIR")]
        source: PathBuf,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Verify, then build one item directory per row
    Process {
        /// Path to the metadata CSV
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Directory holding the content files
        #[arg(value_name = "SOURCE_DIR")]
        source: PathBuf,

        /// Directory the package is written to
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Also compress the package into a zip file inside OUTPUT_DIR
        #[arg(long)]
        zip: bool,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Write a starter metadata CSV listing every file in a directory
    Manifest {
        /// Directory holding the content files
        #[arg(value_name = "SOURCE_DIR")]
        source: PathBuf,

        /// Output path (default: <SOURCE_DIR>/metadata.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Options shared by verify and process.
#[derive(Args, Debug, Clone)]
pub struct RunOptions {
    /// CSV field delimiter
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// Symlink content files instead of copying them
    #[arg(long)]
    pub link: bool,

    /// File whose text replaces the default deposit license
    #[arg(long, value_name = "FILE")]
    pub license: Option<PathBuf>,

    /// Reject collection handles unknown to the repository
    #[arg(long)]
    pub validate_collections: bool,

    /// Collection registry endpoint (default: $SAFPACK_REGISTRY_URL or the local repository)
    #[arg(long, value_name = "URL", requires = "validate_collections")]
    pub registry: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
