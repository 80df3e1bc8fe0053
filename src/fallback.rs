//! "Next available day" lookup for weekly menus.
//!
//! When today has nothing on the menu, the digest shows the next day that
//! does. The search runs forward through the rest of the week and then wraps
//! around to the earliest day with content, so late in the week the label
//! can point back to a day that has already passed.

use crate::models::{MenuContent, WeekMenu};
use chrono::Weekday;

/// Find the day to show instead of `today`.
///
/// Days are searched in calendar order starting strictly after `today`,
/// then from the start of the week. Returns `None` when no day has content.
/// Callers check today's own content first; this does not.
pub fn next_available<T: MenuContent>(menu: &WeekMenu<T>, today: Weekday) -> Option<(Weekday, &T)> {
    let days = menu.ordered();
    let today_index = today.num_days_from_monday();

    days.iter()
        .filter(|(day, _)| day.num_days_from_monday() > today_index)
        .chain(days.iter())
        .find(|(_, content)| !content.is_empty())
        .copied()
}
