//! YAML configuration: the ordered list of menu sources.
//!
//! ```yaml
//! sources:
//!   - name: Canteen
//!     info: Ground floor, 12:00-14:00
//!     kind: html
//!     url: https://example.com/canteen
//!     section: Lunch Menu
//!     content_selector: .entry-content
//!     classifier:
//!       skip_section_pattern: panini|wraps
//!       skip_line_pattern: allergen
//!   - name: Hot Counter
//!     info: Level 2
//!     kind: hot_meals
//! ```
//!
//! Registration order is digest order. Weekly kinds keep their cache at
//! `<cache_dir>/<slug>.json` and pick up new weeks from
//! `<inbox_dir>/<slug>.json`.

use crate::cache::WeeklyCache;
use crate::classify::{ClassifierConfig, DEFAULT_HEADING_LENGTH_THRESHOLD};
use crate::error::MenuError;
use crate::models::HotMeal;
use crate::sources::html::{HtmlMenuSource, DEFAULT_CONTENT_SELECTOR};
use crate::sources::inbox::InboxRefresher;
use crate::sources::weekly::WeeklyMenuSource;
use crate::sources::MenuSource;
use crate::utils::slugify;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

#[derive(Debug, Default, Deserialize)]
pub struct DigestConfig {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    #[serde(default)]
    pub info: String,
    #[serde(flatten)]
    pub kind: SourceKind,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceKind {
    /// A section of a web page.
    Html(HtmlSettings),
    /// Weekday to `{meat, veg, side}`.
    HotMeals,
    /// Weekday to a list of dishes.
    DailyList,
    /// Weekday to `{category: [dishes]}`.
    Categorised,
}

#[derive(Debug, Deserialize)]
pub struct HtmlSettings {
    pub url: String,
    pub section: String,
    #[serde(default = "default_content_selector")]
    pub content_selector: String,
    #[serde(default)]
    pub classifier: ClassifierSettings,
}

fn default_content_selector() -> String {
    DEFAULT_CONTENT_SELECTOR.to_string()
}

#[derive(Debug, Deserialize)]
pub struct ClassifierSettings {
    #[serde(default)]
    pub skip_section_pattern: Option<String>,
    #[serde(default)]
    pub skip_line_pattern: Option<String>,
    #[serde(default = "default_heading_length_threshold")]
    pub heading_length_threshold: usize,
}

fn default_heading_length_threshold() -> usize {
    DEFAULT_HEADING_LENGTH_THRESHOLD
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        ClassifierSettings {
            skip_section_pattern: None,
            skip_line_pattern: None,
            heading_length_threshold: DEFAULT_HEADING_LENGTH_THRESHOLD,
        }
    }
}

impl TryFrom<&ClassifierSettings> for ClassifierConfig {
    type Error = MenuError;

    fn try_from(settings: &ClassifierSettings) -> Result<Self, Self::Error> {
        ClassifierConfig::new(
            settings.skip_section_pattern.as_deref(),
            settings.skip_line_pattern.as_deref(),
            settings.heading_length_threshold,
        )
    }
}

/// Read the YAML config. A missing file gives an empty registry.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_config(path: &Path) -> Result<DigestConfig, MenuError> {
    match fs::read_to_string(path).await {
        Ok(raw) => {
            let config: DigestConfig = serde_yaml::from_str(&raw)?;
            info!(sources = config.sources.len(), "Loaded configuration");
            Ok(config)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Config file not found; no sources registered");
            Ok(DigestConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Instantiate every configured source in registration order.
pub fn build_sources(
    config: &DigestConfig,
    cache_dir: &Path,
    inbox_dir: &Path,
) -> Result<Vec<Box<dyn MenuSource>>, MenuError> {
    config
        .sources
        .iter()
        .map(|source| build_source(source, cache_dir, inbox_dir))
        .collect()
}

fn build_source(
    source: &SourceConfig,
    cache_dir: &Path,
    inbox_dir: &Path,
) -> Result<Box<dyn MenuSource>, MenuError> {
    let file_name = format!("{}.json", slugify(&source.name));
    let cache = WeeklyCache::new(cache_dir.join(&file_name));
    let inbox = InboxRefresher::new(inbox_dir.join(&file_name));
    let name = source.name.clone();
    let info = source.info.clone();

    let built: Box<dyn MenuSource> = match &source.kind {
        SourceKind::Html(html) => Box::new(HtmlMenuSource::new(
            name,
            info,
            &html.url,
            html.section.clone(),
            html.content_selector.clone(),
            ClassifierConfig::try_from(&html.classifier)?,
        )?),
        SourceKind::HotMeals => Box::new(WeeklyMenuSource::<HotMeal>::new(
            name,
            info,
            cache,
            Box::new(inbox),
        )),
        SourceKind::DailyList => Box::new(WeeklyMenuSource::<Vec<String>>::new(
            name,
            info,
            cache,
            Box::new(inbox),
        )),
        SourceKind::Categorised => Box::new(WeeklyMenuSource::<BTreeMap<String, Vec<String>>>::new(
            name,
            info,
            cache,
            Box::new(inbox),
        )),
    };
    Ok(built)
}
