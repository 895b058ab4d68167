//! c64tidy - organize Commodore image files by format and leading character
//!
//! This library classifies files by extension into category directories
//! (PRG, D64, TAP, ...) and buckets each file under the lowercased first
//! letter of its name (or `0_9` for non-alphabetic leads). Files can be
//! moved or copied, with recursive traversal, verbose reporting, an
//! overwrite confirmation on moves, and a dry-run mode that reports intended
//! actions without touching the filesystem.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_placer;
pub mod output;
pub mod traversal;

pub use config::{CategoryConfig, ConfigError};
pub use file_category::{Bucket, CategoryTable, Placement};
pub use file_placer::{OrganizeError, OrganizeResult, OverwritePrompt, PlaceOutcome, Placer};
pub use traversal::discover_files;

pub use cli::{Action, Cli, RunConfig, RunReport, StdinPrompt, run, run_with_prompt};
