//! Weekly JSON cache for sources whose menu arrives once per week.
//!
//! Each source owns one file holding a [`WeeklyPayload`]. The payload is
//! fresh while its `weekCommencing` date equals the Monday of the current
//! week; dates are compared as calendar dates, so the first read after
//! Sunday midnight is stale regardless of the time of day.
//!
//! # Concurrency
//!
//! A read-through is not atomic. Two overlapping digest requests for the same
//! source can both see a stale file and both call the refresher, doubling
//! the upstream work. Refreshes overwrite the file wholesale with the same
//! data, so the outcome is unchanged. Sources never share a cache file.

use crate::error::MenuError;
use crate::models::{WeekMenu, WeeklyPayload};
use crate::utils::ensure_dir;
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Monday of the week containing `date`. Sunday belongs to the week that
/// started six days earlier.
pub fn current_week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Whether `payload` was stored for the week containing `today`.
pub fn is_fresh<T>(payload: &WeeklyPayload<T>, today: NaiveDate) -> bool {
    payload.week_commencing == current_week_start(today)
}

/// Fetches a new week of menu content when the cache is stale.
///
/// `refresh` must not consume the upstream data: the cache calls `commit`
/// only once the refreshed week has been stored, so a failed write leaves
/// the data in place for the next read.
#[async_trait]
pub trait MenuRefresher<T>: Send + Sync {
    /// `Ok(None)` means no new data is available upstream.
    async fn refresh(&self) -> Result<Option<WeekMenu<T>>, MenuError>;

    /// Acknowledge that the last refreshed week is now cached.
    async fn commit(&self) -> Result<(), MenuError> {
        Ok(())
    }
}

/// Read-through cache backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct WeeklyCache {
    path: PathBuf,
}

impl WeeklyCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        WeeklyCache { path: path.into() }
    }

    /// Load the stored payload.
    ///
    /// A missing file gives `Ok(None)`. A file that cannot be read or does not
    /// decode is logged and also reported as `Ok(None)`, so it is refreshed
    /// like a miss.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    pub async fn load<T: DeserializeOwned>(&self) -> Result<Option<WeeklyPayload<T>>, MenuError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache file yet");
                return Ok(None);
            }
            Err(e) => {
                warn!(error = %e, "Cannot read cache file; treating it as missing");
                return Ok(None);
            }
        };
        match serde_json::from_str(&raw) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) => {
                let e = MenuError::MalformedCache(e);
                warn!(error = %e, "Ignoring unreadable cache file");
                Ok(None)
            }
        }
    }

    /// Replace the stored payload, creating the parent directory if needed.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    pub async fn store<T: Serialize>(&self, payload: &WeeklyPayload<T>) -> Result<(), MenuError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).await?;
        }
        let json = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, json).await?;
        info!(week_commencing = %payload.week_commencing, "Stored weekly menu");
        Ok(())
    }

    /// Return this week's payload, refreshing it first when the stored one is
    /// stale, missing or unreadable.
    ///
    /// When the refresher has nothing new the file is left untouched and
    /// `Ok(None)` is returned; an out-of-date week is never served.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), %today))]
    pub async fn read_through<T, R>(
        &self,
        today: NaiveDate,
        refresher: &R,
    ) -> Result<Option<WeeklyPayload<T>>, MenuError>
    where
        T: Serialize + DeserializeOwned,
        R: MenuRefresher<T> + ?Sized,
    {
        match self.load::<T>().await? {
            Some(payload) if is_fresh(&payload, today) => {
                debug!("Cache is fresh");
                return Ok(Some(payload));
            }
            Some(payload) => {
                info!(stored = %payload.week_commencing, "Cache is stale; refreshing");
            }
            None => info!("No usable cache; refreshing"),
        }

        let Some(menu) = refresher.refresh().await? else {
            warn!("Refresh yielded no new menu");
            return Ok(None);
        };
        let payload = WeeklyPayload {
            week_commencing: current_week_start(today),
            menu,
        };
        match self.store(&payload).await {
            Ok(()) => {
                if let Err(e) = refresher.commit().await {
                    warn!(error = %e, "Stored refreshed menu but could not acknowledge it upstream");
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to persist refreshed menu; serving it uncached");
            }
        }
        Ok(Some(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct CountingRefresher {
        menu: Option<WeekMenu<Vec<String>>>,
        calls: AtomicUsize,
        commits: AtomicUsize,
    }

    impl CountingRefresher {
        fn new(menu: Option<WeekMenu<Vec<String>>>) -> Self {
            CountingRefresher {
                menu,
                calls: AtomicUsize::new(0),
                commits: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MenuRefresher<Vec<String>> for CountingRefresher {
        async fn refresh(&self) -> Result<Option<WeekMenu<Vec<String>>>, MenuError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.menu.clone())
        }

        async fn commit(&self) -> Result<(), MenuError> {
            self.commits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn soup_menu() -> WeekMenu<Vec<String>> {
        [(Weekday::Mon, vec!["Soup".to_string()])].into_iter().collect()
    }

    #[test]
    fn test_week_start_is_constant_across_week() {
        // 2025-05-05 is a Monday.
        let monday = date(2025, 5, 5);
        for offset in 0..7 {
            let day = monday + Duration::days(offset);
            assert_eq!(current_week_start(day), monday, "offset {offset}");
        }
    }

    #[test]
    fn test_sunday_belongs_to_preceding_monday() {
        assert_eq!(current_week_start(date(2025, 5, 11)), date(2025, 5, 5));
        assert_eq!(current_week_start(date(2025, 5, 12)), date(2025, 5, 12));
        let next_monday = date(2025, 5, 12);
        let sunday_before = next_monday - Duration::days(1);
        assert_eq!(
            current_week_start(next_monday) - current_week_start(sunday_before),
            Duration::days(7)
        );
    }

    #[test]
    fn test_week_start_across_year_boundary() {
        // 2026-01-01 is a Thursday.
        assert_eq!(current_week_start(date(2026, 1, 1)), date(2025, 12, 29));
    }

    #[test]
    fn test_is_fresh_by_calendar_week() {
        let payload = WeeklyPayload {
            week_commencing: date(2025, 5, 5),
            menu: soup_menu(),
        };
        assert!(is_fresh(&payload, date(2025, 5, 5)));
        assert!(is_fresh(&payload, date(2025, 5, 11)));
        assert!(!is_fresh(&payload, date(2025, 5, 12)));
        assert!(!is_fresh(&payload, date(2025, 5, 4)));
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_refresh() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = WeeklyCache::new(tmp.path().join("menu.json"));
        let payload = WeeklyPayload {
            week_commencing: date(2025, 5, 5),
            menu: soup_menu(),
        };
        cache.store(&payload).await.unwrap();

        let refresher = CountingRefresher::new(None);
        let got = cache.read_through(date(2025, 5, 7), &refresher).await.unwrap();
        assert_eq!(got, Some(payload));
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stale_cache_is_replaced_wholesale() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = WeeklyCache::new(tmp.path().join("nested").join("menu.json"));
        let old: WeekMenu<Vec<String>> = [
            (Weekday::Mon, vec!["Old".to_string()]),
            (Weekday::Tue, vec!["Older".to_string()]),
        ]
        .into_iter()
        .collect();
        cache
            .store(&WeeklyPayload {
                week_commencing: date(2025, 4, 28),
                menu: old,
            })
            .await
            .unwrap();

        let refresher = CountingRefresher::new(Some(soup_menu()));
        let got = cache
            .read_through(date(2025, 5, 11), &refresher)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got.week_commencing, date(2025, 5, 5));
        assert_eq!(got.menu, soup_menu());
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(refresher.commits.load(Ordering::SeqCst), 1);

        let stored: WeeklyPayload<Vec<String>> = cache.load().await.unwrap().unwrap();
        assert_eq!(stored.menu.get(Weekday::Tue), None);
    }

    #[tokio::test]
    async fn test_malformed_cache_triggers_refresh() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("menu.json");
        fs::write(&path, "{ not json").await.unwrap();
        let cache = WeeklyCache::new(&path);

        assert!(cache.load::<Vec<String>>().await.unwrap().is_none());
        let refresher = CountingRefresher::new(Some(soup_menu()));
        let got = cache.read_through(date(2025, 5, 5), &refresher).await.unwrap();
        assert!(got.is_some());
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_refresh_leaves_stale_file_and_returns_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = WeeklyCache::new(tmp.path().join("menu.json"));
        let stale = WeeklyPayload {
            week_commencing: date(2025, 4, 28),
            menu: soup_menu(),
        };
        cache.store(&stale).await.unwrap();

        let refresher = CountingRefresher::new(None);
        let got = cache.read_through::<Vec<String>, _>(date(2025, 5, 6), &refresher).await.unwrap();
        assert!(got.is_none());
        assert_eq!(cache.load().await.unwrap(), Some(stale));
    }

    #[tokio::test]
    async fn test_absent_cache_stays_absent_on_empty_refresh() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("menu.json");
        let cache = WeeklyCache::new(&path);
        let refresher = CountingRefresher::new(None);
        let got = cache.read_through::<Vec<String>, _>(date(2025, 5, 6), &refresher).await.unwrap();
        assert!(got.is_none());
        assert!(!path.exists());
        assert_eq!(refresher.commits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_store_serves_menu_without_commit() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the cache directory should be.
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "").await.unwrap();
        let cache = WeeklyCache::new(blocker.join("menu.json"));

        let refresher = CountingRefresher::new(Some(soup_menu()));
        for _ in 0..2 {
            let got = cache.read_through(date(2025, 5, 5), &refresher).await.unwrap();
            assert_eq!(got.map(|p| p.menu), Some(soup_menu()));
        }
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(refresher.commits.load(Ordering::SeqCst), 0);
    }
}
