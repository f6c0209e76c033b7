//! ignore-zip CLI
//!
//! Archives a folder into a zip file, honoring hierarchical .gitignore and .customignore rules.

use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use ignore_zip::cli::context::CliContext;
use ignore_zip::cli::{commands, Cli, EXIT_FAILURE, EXIT_USAGE};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse command line arguments
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_USAGE,
            };
            let _ = e.print();
            return ExitCode::from(code);
        },
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    CliContext::set(CliContext {
        verbose: cli.verbose,
        quiet: cli.quiet,
        dry_run: cli.dry_run,
    });

    match commands::archive::execute(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(EXIT_FAILURE)
        },
    }
}
