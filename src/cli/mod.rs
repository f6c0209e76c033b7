//! Command-line interface for ignore-zip

use crate::config::CompressionKind;
use clap::Parser;
use std::path::PathBuf;

pub mod commands;
pub mod context;

/// Exit code for invalid arguments
pub const EXIT_USAGE: u8 = 1;

/// Exit code for failures after arguments were accepted
pub const EXIT_FAILURE: u8 = 2;

/// ignore-zip - archive a folder while honoring .gitignore and .customignore rules
#[derive(Parser, Debug)]
#[command(
    name = "ignore-zip",
    version,
    about = "Archive a folder into a zip file, leaving out everything its ignore files exclude",
    long_about = "Walks ROOT_FOLDER, loads every .gitignore and .customignore found in the tree, and writes all files that are not ignored into OUTPUT_ARCHIVE. Rules from .customignore files always win over .gitignore rules, and .git directories are never archived."
)]
pub struct Cli {
    /// Folder to archive
    #[arg(value_name = "ROOT_FOLDER")]
    pub root: PathBuf,

    /// Zip file to create (replaced if it exists)
    #[arg(value_name = "OUTPUT_ARCHIVE")]
    pub output: PathBuf,

    /// Show what would be archived without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress per-rule and per-file output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(long, env = "IGNORE_ZIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Compression method for archive entries
    #[arg(long, value_enum)]
    pub compression: Option<CompressionKind>,

    /// Follow symbolic links while walking the tree
    #[arg(long)]
    pub follow_links: bool,
}

impl Cli {
    /// Default log filter when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "info"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}
