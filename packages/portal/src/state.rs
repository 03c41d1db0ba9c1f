//! Portal state and the feed sync pipeline.
//!
//! A sync pass is split into [`Portal::begin_sync`], which hands out a
//! [`SyncTicket`] carrying a monotonically increasing sequence number, and
//! [`Portal::complete_sync`], which applies the fetched feed. When passes
//! overlap, a result whose ticket is older than the one already applied is
//! discarded, so a slow request can never overwrite newer data.
//!
//! Failure policy: with no data held, a failure is recorded and returned;
//! with data held, it is logged and the stale data stays in place.

use std::sync::Arc;

use course_portal_cache::{CacheBackend, SnapshotCache};
use course_portal_catalog_models::{Module, RecentEntry, SeedModule, Snapshot};
use course_portal_feed::normalize::normalize_feed_with_progress;
use course_portal_feed::progress::{ProgressCallback, null_progress};
use course_portal_feed::{FeedError, FeedSource};

use crate::PortalError;
use crate::view::ViewContext;

/// Proof that a sync pass was started, ordered by issue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SyncTicket {
    seq: u64,
}

impl SyncTicket {
    /// Sequence number of this pass. The first pass is `1`.
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.seq
    }
}

/// What a completed sync pass did to the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The feed replaced the held catalog.
    Applied {
        /// Modules now held.
        modules: usize,
        /// Resources now held.
        resources: usize,
    },
    /// The feed had no data rows; nothing changed.
    NoData,
    /// A newer pass was already applied; this result was discarded.
    Superseded,
    /// The pass failed but previously held data remains displayed.
    Stale {
        /// Why the pass failed.
        message: String,
    },
}

/// In-memory portal state backed by a snapshot cache.
pub struct Portal<B: CacheBackend> {
    modules: Vec<Module>,
    recent: Vec<RecentEntry>,
    last_synced_at: Option<i64>,
    sync_error: Option<String>,
    cache: SnapshotCache<B>,
    seeds: Vec<SeedModule>,
    recent_limit: usize,
    next_seq: u64,
    applied_seq: u64,
}

impl<B: CacheBackend> Portal<B> {
    /// Creates an empty portal.
    #[must_use]
    pub const fn new(cache: SnapshotCache<B>, seeds: Vec<SeedModule>, recent_limit: usize) -> Self {
        Self {
            modules: Vec::new(),
            recent: Vec::new(),
            last_synced_at: None,
            sync_error: None,
            cache,
            seeds,
            recent_limit,
            next_seq: 0,
            applied_seq: 0,
        }
    }

    /// Loads the cached snapshot, if any, so there is something to show
    /// before the first sync completes.
    ///
    /// Returns whether a snapshot was loaded.
    pub fn warm_start(&mut self) -> bool {
        let Some(snapshot) = self.cache.load() else {
            return false;
        };
        log::info!(
            "Warm start from cache: {} module(s), {} recent",
            snapshot.modules.len(),
            snapshot.recent.len()
        );
        self.modules = snapshot.modules;
        self.recent = snapshot.recent;
        self.last_synced_at = Some(snapshot.time);
        true
    }

    /// Starts a sync pass.
    pub const fn begin_sync(&mut self) -> SyncTicket {
        self.next_seq += 1;
        SyncTicket { seq: self.next_seq }
    }

    /// Applies the result of fetching the feed for `ticket`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Sync`] when the pass failed and the portal
    /// holds no modules to fall back on.
    pub fn complete_sync(
        &mut self,
        ticket: SyncTicket,
        fetched: Result<String, FeedError>,
        progress: &dyn ProgressCallback,
    ) -> Result<SyncOutcome, PortalError> {
        if ticket.seq < self.applied_seq {
            log::info!(
                "Discarding sync #{} (sync #{} already applied)",
                ticket.seq,
                self.applied_seq
            );
            return Ok(SyncOutcome::Superseded);
        }

        let normalized = fetched.and_then(|text| {
            normalize_feed_with_progress(&text, &self.seeds, self.recent_limit, progress)
        });

        match normalized {
            Ok(catalog) => {
                let outcome = SyncOutcome::Applied {
                    modules: catalog.modules.len(),
                    resources: catalog.resource_count(),
                };
                let now = chrono::Utc::now().timestamp_millis();

                self.modules = catalog.modules;
                self.recent = catalog.recent;
                self.last_synced_at = Some(now);
                self.applied_seq = ticket.seq;
                self.sync_error = None;

                if let Err(e) = self.cache.save(&self.snapshot()) {
                    log::warn!("Failed to persist snapshot: {e}");
                }

                Ok(outcome)
            }
            Err(e) if e.is_no_data() => {
                log::info!("Feed has no data rows, keeping current state: {e}");
                Ok(SyncOutcome::NoData)
            }
            Err(e) => self.fail(&e),
        }
    }

    fn fail(&mut self, error: &FeedError) -> Result<SyncOutcome, PortalError> {
        let message = error.to_string();
        if self.modules.is_empty() {
            log::error!("Sync failed with no data to fall back on: {message}");
            self.sync_error = Some(message.clone());
            Err(PortalError::Sync { message })
        } else {
            log::warn!("Sync failed, keeping stale data: {message}");
            Ok(SyncOutcome::Stale { message })
        }
    }

    /// Runs a full sync pass against `source`.
    ///
    /// # Errors
    ///
    /// See [`Portal::complete_sync`].
    pub async fn sync(&mut self, source: &dyn FeedSource) -> Result<SyncOutcome, PortalError> {
        self.sync_with_progress(source, null_progress()).await
    }

    /// Runs a full sync pass, reporting per-row progress.
    ///
    /// # Errors
    ///
    /// See [`Portal::complete_sync`].
    pub async fn sync_with_progress(
        &mut self,
        source: &dyn FeedSource,
        progress: Arc<dyn ProgressCallback>,
    ) -> Result<SyncOutcome, PortalError> {
        let ticket = self.begin_sync();
        log::info!("Sync #{}: fetching {}", ticket.seq, source.describe());
        progress.set_message(format!("Fetching {}", source.describe()));

        let fetched = source.fetch().await;
        progress.set_message("Normalizing feed".to_string());
        let outcome = self.complete_sync(ticket, fetched, progress.as_ref());

        match &outcome {
            Ok(SyncOutcome::Applied { modules, resources }) => {
                progress.finish(format!("Synced {modules} module(s), {resources} file(s)"));
            }
            _ => progress.finish_and_clear(),
        }
        outcome
    }

    /// Removes the cached snapshot. In-memory state is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Cache`] if the backend write fails.
    pub fn clear_cache(&self) -> Result<(), PortalError> {
        Ok(self.cache.clear()?)
    }

    /// The current state as a persistable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            modules: self.modules.clone(),
            recent: self.recent.clone(),
            time: self.last_synced_at.unwrap_or_default(),
        }
    }

    /// Modules with at least one resource.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Looks up a module by id.
    #[must_use]
    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// Most recently ingested resources, newest first.
    #[must_use]
    pub fn recent(&self) -> &[RecentEntry] {
        &self.recent
    }

    /// The recorded sync error, if the last failure had nothing to fall
    /// back on.
    #[must_use]
    pub fn sync_error(&self) -> Option<&str> {
        self.sync_error.as_deref()
    }

    /// When the held data was synced, in epoch milliseconds.
    #[must_use]
    pub const fn last_synced_at(&self) -> Option<i64> {
        self.last_synced_at
    }

    /// The seed modules used for normalization.
    #[must_use]
    pub fn seeds(&self) -> &[SeedModule] {
        &self.seeds
    }

    /// The underlying snapshot cache.
    #[must_use]
    pub const fn cache(&self) -> &SnapshotCache<B> {
        &self.cache
    }

    /// Borrowed state for rendering views.
    #[must_use]
    pub fn view_context(&self) -> ViewContext<'_> {
        ViewContext {
            modules: &self.modules,
            recent: &self.recent,
            sync_error: self.sync_error.as_deref(),
            last_synced_at: self.last_synced_at,
        }
    }
}
