//! Compose the registered sources into one digest message.
//!
//! Sources are fetched one after another, in registration order. A source
//! that fails is logged and treated as having nothing to show; it never
//! prevents the remaining sources from being composed.

use crate::models::{weekday_name, Line};
use crate::sources::MenuSource;
use chrono::{Datelike, Local, NaiveDate};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use tracing::{error, info, instrument};

/// Shown when no source has anything for the day.
pub const NO_ITEMS_NOTICE: &str = "No menu items found for today.";

/// The registry of sources, in display order.
pub struct Digest {
    sources: Vec<Box<dyn MenuSource>>,
}

impl Digest {
    pub fn new(sources: Vec<Box<dyn MenuSource>>) -> Self {
        Digest { sources }
    }

    /// Digest for the current local date.
    pub async fn todays_digest(&self) -> String {
        self.digest_for(Local::now().date_naive()).await
    }

    pub async fn digest_for(&self, today: NaiveDate) -> String {
        compose(&self.sources, today).await
    }
}

/// Fetch every source for `today` and render the digest text.
#[instrument(level = "info", skip_all, fields(%today, sources = sources.len()))]
pub async fn compose(sources: &[Box<dyn MenuSource>], today: NaiveDate) -> String {
    let blocks: Vec<String> = stream::iter(sources)
        .then(|source| async move {
            match source.fetch(today).await {
                Ok(lines) if lines.is_empty() => {
                    info!(source = source.name(), "Source has nothing for today");
                    None
                }
                Ok(lines) => {
                    info!(source = source.name(), count = lines.len(), "Source contributed");
                    Some(render_block(&**source, &lines))
                }
                Err(e) => {
                    error!(source = source.name(), error = %e, "Source failed; leaving it out");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await;

    let header = format!(
        "*Lunch menus for {} {}*",
        weekday_name(today.weekday()),
        today.format("%-d %B %Y")
    );
    info!(contributing = blocks.len(), "Composed digest");

    if blocks.is_empty() {
        format!("{header}\n\n{NO_ITEMS_NOTICE}")
    } else {
        format!("{header}\n\n{}", blocks.join("\n\n"))
    }
}

fn render_block(source: &dyn MenuSource, lines: &[Line]) -> String {
    let mut block = format!("*{}*", source.name());
    if !source.info().is_empty() {
        block.push_str(&format!("\n_{}_", source.info()));
    }
    block.push('\n');
    block.push_str(&lines.iter().join("\n"));
    block
}
