//! # Lunch Digest
//!
//! Collects the day's cafeteria menus from several independent sources and
//! composes them into one readable digest.
//!
//! ## Sources
//!
//! - A section of a web page, scraped and filtered down to today's dishes
//! - Weekly structured menus (JSON) cached per calendar week, with a
//!   "next available day" fallback when today is empty
//!
//! ## Usage
//!
//! ```sh
//! lunch_digest --config lunch_digest.yaml --cache-dir ./cache --inbox-dir ./inbox
//! ```
//!
//! ## Architecture
//!
//! 1. **Registry**: Build the ordered source list from the YAML config
//! 2. **Fetching**: Ask each source, one at a time, for today's lines
//! 3. **Composition**: Join the non-empty blocks; failed sources are left out
//! 4. **Output**: Print the digest to stdout (and optionally to a file)
//!
//! Delivery, scheduling and the mailbox/extraction pipeline that fills the
//! inbox live outside this program.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod aggregator;
mod cache;
mod classify;
mod cli;
mod config;
mod document;
mod error;
mod fallback;
mod models;
mod sources;
mod utils;

use aggregator::Digest;
use cli::Cli;
use utils::ensure_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("lunch_digest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = config::load_config(&args.config).await?;
    let sources = config::build_sources(&config, &args.cache_dir, &args.inbox_dir)?;
    info!(count = sources.len(), "Registered menu sources");

    let digest = Digest::new(sources);
    let text = match args.date {
        Some(date) => digest.digest_for(date).await,
        None => digest.todays_digest().await,
    };
    println!("{text}");

    if let Some(path) = &args.output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent).await?;
        }
        if let Err(e) = tokio::fs::write(path, &text).await {
            error!(path = %path.display(), error = %e, "Failed writing digest file");
            return Err(e.into());
        }
        info!(path = %path.display(), "Wrote digest file");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        date = %args.date.unwrap_or_else(|| Local::now().date_naive()),
        "Execution complete"
    );

    Ok(())
}
