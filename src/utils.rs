//! Utility functions for text normalization, logging, and file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - Whitespace collapsing and calorie-annotation stripping for menu text
//! - String truncation for logging
//! - Slugification for per-source cache and inbox file names
//! - Directory creation for cache files

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Calorie annotations such as `- ~450 kcal`, `— 1,200kcal` or `(~650 kcal)`.
static CALORIES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\s*(?:[-—–]\s*~?\s*\d[\d,]*(?:\.\d+)?\s*kcal\b|\(\s*~?\s*\d[\d,]*(?:\.\d+)?\s*kcal\s*\))",
    )
    .unwrap()
});

/// Collapse every run of whitespace (newlines included) into a single space
/// and trim both ends.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(collapse_whitespace("  Fish\n  and   chips "), "Fish and chips");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove calorie annotations anywhere in `s`, then collapse the whitespace
/// left behind.
///
/// Only numbers directly followed by a `kcal` unit are touched, so prices,
/// portion sizes and the like survive. Removing one annotation can bring the
/// pieces around it together into another, so passes repeat until the text
/// settles. Applying it twice is a no-op.
pub fn strip_calories(s: &str) -> String {
    let mut text = collapse_whitespace(s);
    loop {
        let next = collapse_whitespace(&CALORIES_RE.replace_all(&text, " "));
        if next == text {
            return text;
        }
        text = next;
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes (backed off to a char
/// boundary) with an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Convert a source name into a file-system friendly slug.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("Hot Counter"), "hot-counter");
/// assert_eq!(slugify("Café & Deli!"), "café-deli");
/// ```
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Create a directory (and its parents) if it does not exist yet.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if fs::try_exists(path).await.unwrap_or(false) {
        return Ok(());
    }
    fs::create_dir_all(path).await?;
    debug!("Created directory");
    Ok(())
}
