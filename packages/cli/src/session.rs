//! A portal opened from configuration, with the feed sources it can sync
//! from.

use std::path::PathBuf;

use course_portal::PortalError;
use course_portal::config::PortalConfig;
use course_portal::state::{Portal, SyncOutcome};
use course_portal_cache::{FileBackend, SnapshotCache};
use course_portal_cli_utils::{IndicatifProgress, MultiProgress};
use course_portal_feed::fetch::{FileFeed, HttpFeed};
use course_portal_feed::seed::all_seeds;
use course_portal_feed::{FeedError, FeedSource};

/// Picks the feed to sync from: `--file` wins over `--url`, which wins
/// over the configured feed URL. `None` when nothing is configured.
///
/// # Errors
///
/// Returns [`FeedError::Http`] if the HTTP client cannot be built.
pub fn feed_source(
    file: Option<PathBuf>,
    url: Option<&str>,
    config: &PortalConfig,
) -> Result<Option<Box<dyn FeedSource>>, FeedError> {
    if let Some(path) = file {
        return Ok(Some(Box::new(FileFeed::new(path))));
    }
    match url.or(config.feed_url.as_deref()) {
        Some(url) => Ok(Some(Box::new(HttpFeed::new(url)?))),
        None => Ok(None),
    }
}

/// Portal state for one CLI invocation.
pub struct Session {
    pub config: PortalConfig,
    pub portal: Portal<FileBackend>,
    pub multi: MultiProgress,
}

impl Session {
    /// Opens the portal and warm-starts it from the snapshot cache.
    pub fn open(config: PortalConfig, multi: MultiProgress) -> Self {
        let backend = FileBackend::new(config.cache_dir());
        let cache = SnapshotCache::new(&config.cache_key, backend);
        let mut portal = Portal::new(cache, all_seeds(), config.recent_limit);

        if !portal.warm_start() {
            log::debug!("No cached snapshot; starting empty");
        }

        Self {
            config,
            portal,
            multi,
        }
    }

    /// Syncs from `source` with a progress bar and prints what happened.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Sync`] when the sync failed and there is no
    /// data to fall back on.
    pub async fn sync(&mut self, source: &dyn FeedSource) -> Result<SyncOutcome, PortalError> {
        let progress = IndicatifProgress::sync_bar(&self.multi, "Syncing course files");
        let outcome = self.portal.sync_with_progress(source, progress).await?;
        match &outcome {
            SyncOutcome::Applied { modules, resources } => {
                println!("Synced {modules} module(s) with {resources} file(s).");
            }
            SyncOutcome::NoData => println!("Feed has no rows; keeping current data."),
            SyncOutcome::Superseded => println!("A newer sync already applied."),
            SyncOutcome::Stale { message } => {
                println!("Sync failed ({message}); showing cached data.");
            }
        }
        Ok(outcome)
    }

    /// Revalidates against the configured feed, if any. A failure with
    /// nothing to fall back on is left in `sync_error` for views to show.
    pub async fn refresh(&mut self) {
        let source = match feed_source(None, None, &self.config) {
            Ok(Some(source)) => source,
            Ok(None) => {
                log::debug!("No feed configured; using cached data only");
                return;
            }
            Err(e) => {
                log::warn!("Cannot build feed client: {e}");
                return;
            }
        };

        if let Err(e) = self.sync(source.as_ref()).await {
            log::error!("{e}");
        }
    }
}
