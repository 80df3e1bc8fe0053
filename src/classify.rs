//! Turn the nodes of a menu section into digest lines for one weekday.
//!
//! Each node is classified as a heading (explicit, or a short paragraph that
//! introduces a list), a list of dishes, or free text. List items prefixed
//! with a weekday (`Monday – Pasta`) only show on that day; items without a
//! prefix show every day. Headings matching the skip-section pattern hide
//! everything up to the next heading. Only paragraphs count as free text;
//! tables, scripts, figures and other containers are ignored.

use crate::document::{DocumentNode, NodeKind};
use crate::error::MenuError;
use crate::models::{parse_weekday, Line};
use crate::utils::{collapse_whitespace, strip_calories};
use chrono::Weekday;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// Default upper bound (exclusive, in chars) for a paragraph to pass as a heading.
pub const DEFAULT_HEADING_LENGTH_THRESHOLD: usize = 60;

const BULLET_MARKERS: [char; 5] = ['•', '●', '▪', '◦', '·'];

static DAY_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)\s*[–—-]\s*")
        .unwrap()
});

/// Per-source rules for classifying section nodes.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Matched case-insensitively against the whole heading text.
    pub skip_section_pattern: Option<Regex>,
    /// Matched case-insensitively anywhere in a free-text line.
    pub skip_line_pattern: Option<Regex>,
    pub heading_length_threshold: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            skip_section_pattern: None,
            skip_line_pattern: None,
            heading_length_threshold: DEFAULT_HEADING_LENGTH_THRESHOLD,
        }
    }
}

impl ClassifierConfig {
    /// Compile the configured patterns.
    ///
    /// The skip-section pattern is anchored so it must cover the full heading.
    pub fn new(
        skip_section: Option<&str>,
        skip_line: Option<&str>,
        heading_length_threshold: usize,
    ) -> Result<Self, MenuError> {
        let skip_section_pattern = skip_section
            .map(|p| Regex::new(&format!("(?i)^(?:{p})$")))
            .transpose()?;
        let skip_line_pattern = skip_line
            .map(|p| Regex::new(&format!("(?i){p}")))
            .transpose()?;
        Ok(ClassifierConfig {
            skip_section_pattern,
            skip_line_pattern,
            heading_length_threshold,
        })
    }

    fn skips_section(&self, heading: &str) -> bool {
        self.skip_section_pattern
            .as_ref()
            .is_some_and(|re| re.is_match(heading))
    }

    fn skips_line(&self, text: &str) -> bool {
        self.skip_line_pattern
            .as_ref()
            .is_some_and(|re| re.is_match(text))
    }
}

/// Split a leading weekday prefix off `text`.
///
/// `"Monday – Pasta"` gives `Some((Weekday::Mon, "Pasta"))`. The weekday must
/// be spelled in full with its capital; the separator may be a hyphen, en
/// dash or em dash.
pub fn day_prefix(text: &str) -> Option<(Weekday, &str)> {
    let caps = DAY_PREFIX_RE.captures(text)?;
    let day = parse_weekday(caps.get(1)?.as_str())?;
    let rest = &text[caps.get(0)?.end()..];
    Some((day, rest))
}

/// Whether a paragraph should be read as a heading.
///
/// True for short, non-empty text without bullet markers or a weekday
/// prefix that is immediately followed by a list.
pub fn is_implicit_heading(text: &str, next_kind: Option<NodeKind>, config: &ClassifierConfig) -> bool {
    !text.is_empty()
        && text.chars().count() < config.heading_length_threshold
        && !text.contains(BULLET_MARKERS)
        && day_prefix(text).is_none()
        && next_kind == Some(NodeKind::List)
}

/// Format one list item for `today`, or `None` when it belongs to another day
/// or is empty.
fn item_line(raw: &str, today: Weekday) -> Option<Line> {
    let text = collapse_whitespace(raw);
    let dish = match day_prefix(&text) {
        Some((day, rest)) if day == today => strip_calories(rest),
        Some(_) => return None,
        None => strip_calories(&text),
    };
    (!dish.is_empty()).then_some(Line::Bullet(dish))
}

/// Produce the lines a section contributes on `today`.
pub fn classify_section<N: DocumentNode>(
    nodes: &[N],
    today: Weekday,
    config: &ClassifierConfig,
) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut skipping = false;

    for (i, node) in nodes.iter().enumerate() {
        let kind = node.kind();
        let next_kind = nodes.get(i + 1).map(DocumentNode::kind);
        let text = collapse_whitespace(&node.text());

        let is_heading = match kind {
            NodeKind::Heading(_) => true,
            NodeKind::Paragraph => is_implicit_heading(&text, next_kind, config),
            _ => false,
        };

        if is_heading {
            skipping = config.skips_section(&text);
            if skipping {
                trace!(heading = %text, "Skipping section");
            } else if !text.is_empty() {
                lines.push(Line::Heading(text));
            }
            continue;
        }
        if skipping {
            continue;
        }

        match kind {
            NodeKind::List => lines.extend(
                node.children()
                    .iter()
                    .filter(|child| child.kind() == NodeKind::ListItem)
                    .filter_map(|item| item_line(&item.text(), today)),
            ),
            NodeKind::ListItem => lines.extend(item_line(&text, today)),
            NodeKind::Paragraph => {
                if !text.is_empty() && !config.skips_line(&text) {
                    lines.push(Line::Text(text));
                }
            }
            _ => trace!(kind = ?kind, "Ignoring non-text node"),
        }
    }
    lines
}
