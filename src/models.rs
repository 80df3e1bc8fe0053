//! Data models for digest lines and weekly menu payloads.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Line`]: One output unit of a source's contribution to the digest
//! - [`WeekMenu`]: A weekday-name keyed menu as delivered by the upstream extractor
//! - [`WeeklyPayload`]: The persisted cache record for one source
//! - Menu shapes: plain item lists, [`HotMeal`], and category mappings
//!
//! The persisted field names use camelCase to match the JSON the upstream
//! extraction pipeline emits.

use crate::utils::{collapse_whitespace, strip_calories};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Calendar weekdays in week order with their full English names.
pub const WEEKDAYS: [(Weekday, &str); 7] = [
    (Weekday::Mon, "Monday"),
    (Weekday::Tue, "Tuesday"),
    (Weekday::Wed, "Wednesday"),
    (Weekday::Thu, "Thursday"),
    (Weekday::Fri, "Friday"),
    (Weekday::Sat, "Saturday"),
    (Weekday::Sun, "Sunday"),
];

/// Full English name of a weekday, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAYS[day.num_days_from_monday() as usize].1
}

/// Parse a full English weekday name. Matching is exact and case-sensitive.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    WEEKDAYS
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(day, _)| *day)
}

/// A single line of a source's output. Ordering follows the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A sub-heading; renders as a paragraph break followed by bold text.
    Heading(String),
    /// A menu item.
    Bullet(String),
    /// Label announcing that the content below belongs to another day.
    Fallback(Weekday),
    /// Free text copied verbatim.
    Text(String),
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Heading(text) => write!(f, "\n*{text}*"),
            Line::Bullet(text) => write!(f, "• {text}"),
            Line::Fallback(day) => write!(f, "_Next available: {}_", weekday_name(*day)),
            Line::Text(text) => f.write_str(text),
        }
    }
}

/// Content for one weekday that knows whether it is empty and how to render itself.
pub trait MenuContent {
    /// `true` when there is nothing worth showing for the day.
    fn is_empty(&self) -> bool;

    /// Format the day's content as digest lines.
    fn to_lines(&self) -> Vec<Line>;
}

fn clean_item(item: &str) -> Option<String> {
    let text = strip_calories(&collapse_whitespace(item));
    (!text.is_empty()).then_some(text)
}

/// A plain list of dishes.
impl MenuContent for Vec<String> {
    fn is_empty(&self) -> bool {
        self.iter().all(|item| clean_item(item).is_none())
    }

    fn to_lines(&self) -> Vec<Line> {
        self.iter()
            .filter_map(|item| clean_item(item))
            .map(Line::Bullet)
            .collect()
    }
}

/// A hot counter serving one meat dish, one vegetarian dish and a side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HotMeal {
    #[serde(default)]
    pub meat: Option<String>,
    #[serde(default)]
    pub veg: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
}

impl HotMeal {
    fn labelled(&self) -> [(&'static str, Option<&String>); 3] {
        [
            ("Meat", self.meat.as_ref()),
            ("Veg", self.veg.as_ref()),
            ("Side", self.side.as_ref()),
        ]
    }
}

impl MenuContent for HotMeal {
    fn is_empty(&self) -> bool {
        self.labelled()
            .into_iter()
            .all(|(_, dish)| dish.and_then(|d| clean_item(d)).is_none())
    }

    fn to_lines(&self) -> Vec<Line> {
        self.labelled()
            .into_iter()
            .filter_map(|(label, dish)| {
                dish.and_then(|d| clean_item(d))
                    .map(|d| Line::Bullet(format!("{label}: {d}")))
            })
            .collect()
    }
}

/// Category name to dishes, rendered alphabetically by category.
impl MenuContent for BTreeMap<String, Vec<String>> {
    fn is_empty(&self) -> bool {
        self.values().all(|items| MenuContent::is_empty(items))
    }

    fn to_lines(&self) -> Vec<Line> {
        let mut lines = Vec::new();
        for (category, items) in self {
            if MenuContent::is_empty(items) {
                continue;
            }
            lines.push(Line::Heading(collapse_whitespace(category)));
            lines.extend(items.to_lines());
        }
        lines
    }
}

/// Menu content keyed by weekday name, as produced by the upstream extractor.
///
/// Keys are matched against full weekday names ignoring ASCII case; unknown
/// keys are ignored. Usually five to seven days are present. Keys are kept
/// sorted, so lookups and the persisted JSON are stable across runs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct WeekMenu<T>(pub BTreeMap<String, T>);

impl<T> WeekMenu<T> {
    /// Content stored for `day`, if the day is present.
    ///
    /// An exactly spelled key wins; otherwise the first key in sorted order
    /// that matches ignoring case is used.
    pub fn get(&self, day: Weekday) -> Option<&T> {
        let name = weekday_name(day);
        self.0.get(name).or_else(|| {
            self.0
                .iter()
                .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
                .map(|(_, content)| content)
        })
    }

    /// Present days in calendar order, Monday first.
    pub fn ordered(&self) -> Vec<(Weekday, &T)> {
        WEEKDAYS
            .iter()
            .filter_map(|(day, _)| self.get(*day).map(|content| (*day, content)))
            .collect()
    }
}

impl<T> FromIterator<(Weekday, T)> for WeekMenu<T> {
    fn from_iter<I: IntoIterator<Item = (Weekday, T)>>(iter: I) -> Self {
        WeekMenu(
            iter.into_iter()
                .map(|(day, content)| (weekday_name(day).to_string(), content))
                .collect(),
        )
    }
}

/// The persisted cache record for one source.
///
/// `week_commencing` is always the Monday that starts the week the menu is
/// valid for.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPayload<T> {
    pub week_commencing: NaiveDate,
    pub menu: WeekMenu<T>,
}
