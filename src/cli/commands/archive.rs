//! Archive command implementation

use crate::archive::{ArchiveSummary, Archiver, EntryEvent, EntryKind, EntryOutcome};
use crate::cli::context::CliContext;
use crate::cli::Cli;
use crate::config::ArchiveConfig;
use crate::ignore::RuleSet;
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Execute the archive command
pub fn execute(cli: &Cli) -> Result<ArchiveSummary> {
    let mut config =
        ArchiveConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(compression) = cli.compression {
        config.archive.compression = compression;
    }
    if cli.follow_links {
        config.archive.follow_links = true;
    }

    let quiet = CliContext::is_quiet();
    let dry_run = CliContext::is_dry_run();

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress
    };

    let reporter_progress = progress.clone();
    let archiver = Archiver::new(&cli.root)?
        .with_settings(config.archive.clone())
        .dry_run(dry_run)
        .with_reporter(move |event| {
            reporter_progress.set_message(event.path.clone());
            if !quiet {
                reporter_progress.suspend(|| print_event(event));
            }
        });

    println!("{}", "Loading ignore patterns...".bright_blue());
    let rules = archiver.load_rules()?;
    if !quiet {
        print_rules(&rules);
    }
    println!("Total ignore patterns loaded: {}\n", rules.len());

    println!("{}", "Scanning files and directories...".bright_blue());
    let summary = archiver.archive_with_rules(&rules, &cli.output)?;
    progress.finish_and_clear();

    print_summary(cli, &summary);
    Ok(summary)
}

fn print_rules(rules: &RuleSet) {
    for rule in rules.rules() {
        let tier = if rule.is_override() {
            " (override)".magenta().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} Loaded pattern '{}' as regex '{}' from '{}'{}",
            "•".cyan(),
            rule.original_text(),
            rule.pattern().as_str().dimmed(),
            rule.source_file().display(),
            tier
        );
    }
}

fn print_event(event: &EntryEvent) {
    match (event.outcome, event.kind) {
        (EntryOutcome::Included, EntryKind::File) => {
            println!("  {} Included file: {}", "✓".green(), event.path);
        },
        (EntryOutcome::Included, EntryKind::Directory) => {},
        (EntryOutcome::Excluded, EntryKind::Directory) => {
            println!(
                "  {} Ignored directory: {} ({})",
                "•".yellow(),
                event.path,
                event.reason.dimmed()
            );
        },
        (EntryOutcome::Excluded, EntryKind::File) => {
            println!(
                "  {} Ignored: {} ({})",
                "•".yellow(),
                event.path,
                event.reason.dimmed()
            );
        },
        (EntryOutcome::Skipped, _) => {
            println!(
                "  {} Skipped: {} ({})",
                "!".red(),
                event.path,
                event.reason
            );
        },
    }
}

fn print_summary(cli: &Cli, summary: &ArchiveSummary) {
    println!();
    if summary.dry_run {
        println!(
            "{} Dry run: no archive written to {}",
            "•".cyan(),
            cli.output.display()
        );
    } else {
        println!(
            "{} Archive created successfully at {}",
            "✓".green().bold(),
            cli.output.display()
        );
    }

    println!("{}", "Summary:".bold());
    println!("  • Total files included: {}", summary.files_included);
    println!("  • Total paths ignored: {}", summary.entries_excluded);
    if summary.entries_skipped > 0 {
        println!(
            "  {} Entries skipped: {}",
            "!".yellow(),
            summary.entries_skipped
        );
    }
    if CliContext::is_verbose() {
        for name in &summary.included_entries {
            println!("    {}", name.dimmed());
        }
    }
}
