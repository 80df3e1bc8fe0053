//! Refresh weekly menus from files dropped into an inbox directory.
//!
//! The mailbox poller and the image-to-JSON extraction run outside this
//! program. They leave one `<source>.json` per source in the inbox. A drop
//! stays in place until its week has been cached, then it is renamed so it
//! is not picked up again. A drop that is not a valid menu is set aside
//! straight away.

use crate::cache::MenuRefresher;
use crate::error::MenuError;
use crate::models::WeekMenu;
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Refresher reading a single drop file.
#[derive(Debug, Clone)]
pub struct InboxRefresher {
    path: PathBuf,
}

impl InboxRefresher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        InboxRefresher { path: path.into() }
    }

    async fn retire(&self, suffix: &str) -> Result<(), MenuError> {
        let target = self.path.with_extension(format!("json.{suffix}"));
        fs::rename(&self.path, &target).await?;
        debug!(to = %target.display(), "Moved inbox file");
        Ok(())
    }
}

#[async_trait]
impl<T> MenuRefresher<T> for InboxRefresher
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn refresh(&self) -> Result<Option<WeekMenu<T>>, MenuError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Inbox is empty");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<WeekMenu<T>>(&raw) {
            Ok(menu) => {
                info!(days = menu.0.len(), "Read new weekly menu");
                Ok(Some(menu))
            }
            Err(e) => {
                warn!(
                    error = %e,
                    preview = %truncate_for_log(&raw, 200),
                    "Inbox file is not a valid menu; setting it aside"
                );
                self.retire("rejected").await?;
                Ok(None)
            }
        }
    }

    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn commit(&self) -> Result<(), MenuError> {
        self.retire("processed").await?;
        info!("Consumed weekly menu");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HotMeal;
    use chrono::Weekday;

    #[tokio::test]
    async fn test_missing_file_yields_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let refresher = InboxRefresher::new(tmp.path().join("hot.json"));
        let got: Option<WeekMenu<HotMeal>> = refresher.refresh().await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn test_drop_is_consumed_after_commit() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hot.json");
        fs::write(&path, r#"{"Monday": {"meat": "Lasagne", "veg": "Risotto"}}"#)
            .await
            .unwrap();
        let refresher = InboxRefresher::new(&path);

        let menu: WeekMenu<HotMeal> = refresher.refresh().await.unwrap().unwrap();
        assert_eq!(menu.get(Weekday::Mon).unwrap().meat.as_deref(), Some("Lasagne"));
        assert!(path.exists(), "drop is kept until the week is cached");

        MenuRefresher::<HotMeal>::commit(&refresher).await.unwrap();
        assert!(!path.exists());
        assert!(tmp.path().join("hot.json.processed").exists());

        let again: Option<WeekMenu<HotMeal>> = refresher.refresh().await.unwrap();
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn test_malformed_drop_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("list.json");
        fs::write(&path, r#"{"Monday": 42}"#).await.unwrap();
        let refresher = InboxRefresher::new(&path);

        let got: Option<WeekMenu<Vec<String>>> = refresher.refresh().await.unwrap();
        assert!(got.is_none());
        assert!(tmp.path().join("list.json.rejected").exists());
    }
}
