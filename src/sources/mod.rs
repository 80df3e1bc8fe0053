//! Menu sources feeding the digest.
//!
//! Every source implements [`MenuSource`]: a display name, a one-line info
//! text, and a `fetch` that yields the lines to show for a given date.
//!
//! # Supported Sources
//!
//! | Kind | Module | Method | Notes |
//! |------|--------|--------|-------|
//! | Web page section | [`html`] | HTML scraping | Day-prefixed list items filtered by weekday |
//! | Weekly structured menu | [`weekly`] | JSON cache + refresh | Falls back to the next day with content |
//!
//! Weekly sources refresh from an inbox directory ([`inbox`]) where the
//! upstream extraction pipeline drops one JSON file per source.
//!
//! A failing source never stops the others; see [`crate::aggregator`].

pub mod html;
pub mod inbox;
pub mod weekly;

use crate::error::MenuError;
use crate::models::Line;
use async_trait::async_trait;
use chrono::NaiveDate;

/// One entry of the digest registry.
#[async_trait]
pub trait MenuSource: Send + Sync {
    /// Title shown above the source's block.
    fn name(&self) -> &str;

    /// Short metadata line shown under the title (location, opening hours).
    fn info(&self) -> &str;

    /// Lines to show for `today`. An empty `Vec` means nothing to show.
    async fn fetch(&self, today: NaiveDate) -> Result<Vec<Line>, MenuError>;
}
