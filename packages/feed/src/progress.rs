//! Per-row progress for a sync pass.
//!
//! The normalizer reports one unit per data row. The CLI renders that as
//! an `indicatif` bar; library callers and tests pass [`NullProgress`].

use std::sync::Arc;

/// Receives progress from fetching and normalizing a feed.
pub trait ProgressCallback: Send + Sync {
    /// Number of data rows about to be normalized.
    fn set_total(&self, total: u64);

    /// `delta` more rows were processed.
    fn inc(&self, delta: u64);

    /// Current phase, e.g. the feed being fetched.
    fn set_message(&self, msg: String);

    /// The pass applied; `msg` summarizes the result.
    fn finish(&self, msg: String);

    /// The pass ended without applying anything.
    fn finish_and_clear(&self);
}

/// Ignores all progress.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

/// [`NullProgress`] behind an `Arc`, for [`crate::FeedSource`] callers that
/// want no output.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
