use crate::cms::ContentStore;
use crate::config::Config;
use crate::settings::{SettingsStore, StoreError};
use crate::sync::filter;
use crate::sync::post_builder;
use crate::sync::reader::{FeedReaderError, ReadFeed, RssReader};
use chrono::Utc;

#[derive(Debug, PartialEq, Eq)]
pub enum FeedSyncError {
    NoApiKey,
    FeedError { msg: String },
    StoreError { msg: String },
}

impl From<FeedReaderError> for FeedSyncError {
    fn from(error: FeedReaderError) -> Self {
        FeedSyncError::FeedError { msg: error.msg }
    }
}

impl From<StoreError> for FeedSyncError {
    fn from(error: StoreError) -> Self {
        FeedSyncError::StoreError { msg: error.msg }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The feed has not been rebuilt since the last successful run.
    NoUpdate,
    Processed { created: usize },
}

pub struct FeedSyncJob {
    base_url: String,
}

impl Default for FeedSyncJob {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSyncJob {
    pub fn new() -> Self {
        Self::with_base_url(Config::creators_base_url())
    }

    pub fn with_base_url(base_url: String) -> Self {
        FeedSyncJob { base_url }
    }

    /// One full cycle: fetch, gate on the feed's build date, then
    /// filter, resolve and post every qualifying item.
    ///
    /// The last-run timestamp is persisted before the items are
    /// iterated, so a crash mid-cycle drops the remaining items rather
    /// than replaying them (at-most-once; the feed is append-only and
    /// low-volume).
    pub fn execute(
        &self,
        store: &SettingsStore,
        cms: &mut dyn ContentStore,
    ) -> Result<SyncOutcome, FeedSyncError> {
        let mut settings = store.load()?;

        if settings.api_key.is_empty() {
            return Err(FeedSyncError::NoApiKey);
        }

        let reader = RssReader {
            url: format!("{}/feed/{}.rss", self.base_url, settings.api_key),
        };
        let feed = reader.read()?;

        let fresh = matches!(
            feed.last_build_date,
            Some(build_date) if build_date.timestamp() > settings.last_run
        );

        if !fresh {
            log::info!("Feed is stale, nothing to sync");

            return Ok(SyncOutcome::NoUpdate);
        }

        settings.last_run = Utc::now().timestamp();
        store.save(&settings)?;

        let mut created = 0;

        for item in &feed.items {
            let file_code = match item.author.as_deref().and_then(filter::extract_file_code) {
                Some(code) => code,
                None => continue,
            };

            if !settings.feature_enabled(&file_code) {
                continue;
            }

            let post = post_builder::build_post(item, &settings);

            if post.author.is_none() {
                log::warn!("No user mapped for {file_code}, posting unassigned");
            }

            match cms.insert_post(&post) {
                Ok(post_id) => {
                    log::info!("Created post {post_id} ({})", post.slug);
                    created += 1;
                }
                Err(err) => log::error!("Failed to create post {}: {err:?}", post.slug),
            }
        }

        log::info!("Sync finished, {created} posts created");

        Ok(SyncOutcome::Processed { created })
    }
}
