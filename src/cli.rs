//! Command-line interface module for c64tidy.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing and the immutable run configuration
//! - Run orchestration (traverse, classify, place)
//! - The interactive overwrite confirmation
//! - Per-run reporting

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::ProgressBar;

use crate::file_category::CategoryTable;
use crate::file_placer::{OrganizeResult, OverwritePrompt, PlaceOutcome, Placer};
use crate::output::OutputFormatter;
use crate::traversal::discover_files;

/// Organize files into directories based on file type and first character.
#[derive(Parser, Debug)]
#[command(
    name = "c64tidy",
    version,
    about = "Organize Commodore image files into per-format directories, bucketed by leading character"
)]
pub struct Cli {
    /// Source directory containing the files to organize
    pub source: PathBuf,

    /// Destination base directory, created as needed
    pub destination: PathBuf,

    /// Action to perform on matching files
    #[arg(short, long, value_enum, default_value_t = Action::Move)]
    pub action: Action,

    /// Recursively search for files in the source directory
    #[arg(short, long)]
    pub recursive: bool,

    /// Enable verbose output showing each operation
    #[arg(short, long)]
    pub verbose: bool,

    /// Simulate all actions without making any changes
    #[arg(short, long)]
    pub dry_run: bool,

    /// TOML file replacing the built-in category table
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// How matching files are transferred into the destination tree.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move files out of the source directory.
    Move,
    /// Copy files, leaving the source directory untouched.
    Copy,
}

impl Action {
    /// Lowercase verb for messages ("move" or "copy").
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Move => "move",
            Action::Copy => "copy",
        }
    }
}

/// Immutable settings for one organizing run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory whose files are classified.
    pub source: PathBuf,
    /// Base directory the category tree is built under.
    pub destination: PathBuf,
    /// Move or copy.
    pub action: Action,
    /// Descend into nested subdirectories of the source.
    pub recursive: bool,
    /// Report every directory creation and file operation.
    pub verbose: bool,
    /// Report intended actions without touching the filesystem.
    pub dry_run: bool,
}

impl From<&Cli> for RunConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            source: cli.source.clone(),
            destination: cli.destination.clone(),
            action: cli.action,
            recursive: cli.recursive,
            // Dry-run reports the same decisions verbose mode does.
            verbose: cli.verbose || cli.dry_run,
            dry_run: cli.dry_run,
        }
    }
}

/// Per-run tally of what happened to each discovered file.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files actually moved or copied.
    pub placed: usize,
    /// Files whose action was reported in dry-run mode.
    pub simulated: usize,
    /// Move collisions where the overwrite was declined.
    pub declined: usize,
    /// Files whose extension matched no category (skipped, not an error).
    pub unmatched: usize,
    /// Placed or simulated files per category.
    pub by_category: HashMap<String, usize>,
}

impl RunReport {
    /// Total number of files considered by the run.
    pub fn total(&self) -> usize {
        self.placed + self.simulated + self.declined + self.unmatched
    }
}

/// Interactive confirmation read from stdin.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl OverwritePrompt for StdinPrompt {
    fn confirm_overwrite(&self, destination: &Path) -> io::Result<bool> {
        print!(
            "{}",
            format!("Overwrite {}? (y/n): ", destination.display()).magenta()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().eq_ignore_ascii_case("y"))
    }
}

/// Pauses the progress bar while the inner prompt reads its answer, so the
/// question and the bar never interleave on screen.
struct SuspendingPrompt<'a> {
    inner: &'a dyn OverwritePrompt,
    bar: &'a ProgressBar,
}

impl OverwritePrompt for SuspendingPrompt<'_> {
    fn confirm_overwrite(&self, destination: &Path) -> io::Result<bool> {
        self.bar.suspend(|| self.inner.confirm_overwrite(destination))
    }
}

/// Runs one organizing pass with the interactive stdin prompt.
///
/// This is the entry point the binary uses. It traverses the source,
/// classifies every candidate against `table`, and places (or simulates)
/// each match. The first filesystem error halts the run.
pub fn run(config: &RunConfig, table: &CategoryTable) -> OrganizeResult<RunReport> {
    run_with_prompt(config, table, &StdinPrompt)
}

/// Runs one organizing pass with an injected overwrite prompt.
///
/// Tests supply deterministic prompts here instead of real interactive
/// input.
///
/// # Examples
///
/// ```no_run
/// use c64tidy::cli::{Action, RunConfig, run};
/// use c64tidy::file_category::CategoryTable;
/// use std::path::PathBuf;
///
/// let config = RunConfig {
///     source: PathBuf::from("/collection/unsorted"),
///     destination: PathBuf::from("/collection/sorted"),
///     action: Action::Copy,
///     recursive: false,
///     verbose: false,
///     dry_run: false,
/// };
/// match run(&config, &CategoryTable::builtin()) {
///     Ok(report) => println!("Placed {} files", report.placed),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_with_prompt(
    config: &RunConfig,
    table: &CategoryTable,
    prompt: &dyn OverwritePrompt,
) -> OrganizeResult<RunReport> {
    let verbose = config.verbose || config.dry_run;

    if config.dry_run {
        OutputFormatter::info(&format!(
            "DRY RUN: Analyzing contents of: {}",
            config.source.display()
        ));
    } else if verbose {
        OutputFormatter::info(&format!(
            "Organizing contents of: {}",
            config.source.display()
        ));
    }

    let files = discover_files(&config.source, config.recursive)?;

    let mut report = RunReport::default();
    if files.is_empty() {
        if verbose {
            OutputFormatter::plain("No files found to organize.");
        }
        return Ok(report);
    }

    // Dry-run implies verbose, so the bar only appears on silent real runs.
    let bar = (!verbose).then(|| OutputFormatter::create_progress_bar(files.len() as u64));

    let suspending;
    let placer = match &bar {
        Some(bar) => {
            suspending = SuspendingPrompt { inner: prompt, bar };
            Placer::new(config, &suspending)
        }
        None => Placer::new(config, prompt),
    };

    for file in &files {
        // Names that are not valid UTF-8 cannot match the table and are
        // skipped like any other unmatched file.
        let placement = file
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|name| table.placement_for(name));

        let Some(placement) = placement else {
            report.unmatched += 1;
            if let Some(bar) = &bar {
                bar.inc(1);
            }
            continue;
        };

        match placer.place(file, &placement)? {
            PlaceOutcome::Moved | PlaceOutcome::Copied => {
                report.placed += 1;
                *report.by_category.entry(placement.category).or_insert(0) += 1;
            }
            PlaceOutcome::Simulated => {
                report.simulated += 1;
                *report.by_category.entry(placement.category).or_insert(0) += 1;
            }
            PlaceOutcome::Declined => report.declined += 1,
        }

        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }

    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    if verbose {
        OutputFormatter::summary_table(&report.by_category, report.placed + report.simulated);
    }

    Ok(report)
}
