//! Menu scraped from one section of a web page.
//!
//! The page lists the week's dishes under a heading such as "This week's
//! menu". Items may carry a weekday prefix (`Monday – Pasta`) and calorie
//! annotations; both are handled by [`crate::classify`].

use crate::classify::{classify_section, ClassifierConfig};
use crate::document::{extract_section, HtmlNode};
use crate::error::MenuError;
use crate::models::Line;
use crate::sources::MenuSource;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Selector used when a source does not name its content container.
pub const DEFAULT_CONTENT_SELECTOR: &str = "body";

/// A source backed by a section of an HTML page.
#[derive(Debug)]
pub struct HtmlMenuSource {
    name: String,
    info: String,
    url: Url,
    section: String,
    content_selector: String,
    classifier: ClassifierConfig,
    client: Client,
}

impl HtmlMenuSource {
    pub fn new(
        name: impl Into<String>,
        info: impl Into<String>,
        url: &str,
        section: impl Into<String>,
        content_selector: impl Into<String>,
        classifier: ClassifierConfig,
    ) -> Result<Self, MenuError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(HtmlMenuSource {
            name: name.into(),
            info: info.into(),
            url: Url::parse(url)?,
            section: section.into(),
            content_selector: content_selector.into(),
            classifier,
            client,
        })
    }
}

#[async_trait]
impl MenuSource for HtmlMenuSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> &str {
        &self.info
    }

    #[instrument(level = "info", skip_all, fields(source = %self.name, url = %self.url))]
    async fn fetch(&self, today: NaiveDate) -> Result<Vec<Line>, MenuError> {
        let html = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(bytes = html.len(), "Fetched menu page");

        let lines = lines_from_html(
            &html,
            &self.content_selector,
            &self.section,
            today.weekday(),
            &self.classifier,
        )?;
        info!(count = lines.len(), "Extracted menu lines");
        Ok(lines)
    }
}

/// Parse `html` and produce the lines of `section` for `today`.
///
/// A missing container or section yields an empty `Vec`.
pub fn lines_from_html(
    html: &str,
    content_selector: &str,
    section: &str,
    today: Weekday,
    classifier: &ClassifierConfig,
) -> Result<Vec<Line>, MenuError> {
    let document = Html::parse_document(html);
    let first = HtmlNode::first_in(&document, content_selector)?;
    let nodes = extract_section(first, section);
    if nodes.is_empty() {
        debug!(%section, "Section not found on page");
    }
    Ok(classify_section(&nodes, today, classifier))
}
