//! Sources whose menu is published once per week as structured data.
//!
//! The week is kept in a [`WeeklyCache`] and refreshed through a
//! [`MenuRefresher`] when it goes stale. If today has nothing on the menu,
//! the next day with content is shown under a "Next available" label.

use crate::cache::{MenuRefresher, WeeklyCache};
use crate::error::MenuError;
use crate::fallback::next_available;
use crate::models::{weekday_name, Line, MenuContent};
use crate::sources::MenuSource;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// A weekly structured menu of shape `T` per weekday.
pub struct WeeklyMenuSource<T> {
    name: String,
    info: String,
    cache: WeeklyCache,
    refresher: Box<dyn MenuRefresher<T>>,
}

impl<T> WeeklyMenuSource<T> {
    pub fn new(
        name: impl Into<String>,
        info: impl Into<String>,
        cache: WeeklyCache,
        refresher: Box<dyn MenuRefresher<T>>,
    ) -> Self {
        WeeklyMenuSource {
            name: name.into(),
            info: info.into(),
            cache,
            refresher,
        }
    }
}

#[async_trait]
impl<T> MenuSource for WeeklyMenuSource<T>
where
    T: MenuContent + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> &str {
        &self.info
    }

    #[instrument(level = "info", skip_all, fields(source = %self.name, %today))]
    async fn fetch(&self, today: NaiveDate) -> Result<Vec<Line>, MenuError> {
        let Some(payload) = self
            .cache
            .read_through::<T, _>(today, &*self.refresher)
            .await?
        else {
            debug!("No menu for this week");
            return Ok(Vec::new());
        };

        let weekday = today.weekday();
        if let Some(content) = payload.menu.get(weekday).filter(|c| !c.is_empty()) {
            return Ok(content.to_lines());
        }

        match next_available(&payload.menu, weekday) {
            Some((day, content)) => {
                info!(today = weekday_name(weekday), next = weekday_name(day), "Falling back to next available day");
                let mut lines = vec![Line::Fallback(day)];
                lines.extend(content.to_lines());
                Ok(lines)
            }
            None => {
                debug!("Menu has no content on any day");
                Ok(Vec::new())
            }
        }
    }
}
