//! Command-line interface definitions for Lunch Digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Directory options can also be provided via environment variables.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Lunch Digest application.
///
/// # Examples
///
/// ```sh
/// # Today's digest with the default config and directories
/// lunch_digest
///
/// # Replay a past day and keep a copy of the digest
/// lunch_digest --date 2025-05-05 --output ./out/digest.txt
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML file listing the menu sources
    #[arg(short, long, default_value = "lunch_digest.yaml")]
    pub config: PathBuf,

    /// Directory holding one weekly cache file per source
    #[arg(long, env = "LUNCH_CACHE_DIR", default_value = "./cache")]
    pub cache_dir: PathBuf,

    /// Directory where new weekly menus are dropped as JSON
    #[arg(long, env = "LUNCH_INBOX_DIR", default_value = "./inbox")]
    pub inbox_dir: PathBuf,

    /// Build the digest for this date (YYYY-MM-DD) instead of today
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Also write the digest to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
