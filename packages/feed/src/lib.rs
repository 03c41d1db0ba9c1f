#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spreadsheet feed ingestion for the course portal.
//!
//! A [`FeedSource`] produces raw CSV text; [`normalize::normalize_feed`]
//! turns it into the module → resource mapping, merging the embedded seed
//! list ([`seed::all_seeds`]) with whatever modules the feed mentions.
//! Share links are rewritten by [`canonical`] and the "recent files" list
//! is picked by [`recency`].

pub mod canonical;
pub mod columns;
pub mod csv_line;
pub mod fetch;
pub mod normalize;
pub mod progress;
pub mod recency;
pub mod seed;
pub mod type_mapping;

use async_trait::async_trait;

/// Errors that can occur while fetching or parsing the feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed server answered with a non-success status.
    #[error("Failed to fetch feed: HTTP {status} from {url}")]
    Status {
        /// Status code returned by the server.
        status: u16,
        /// URL that was requested (without the cache-busting parameter).
        url: String,
    },

    /// I/O error (reading a local feed file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The feed has no data rows after the header.
    #[error("Feed has {lines} usable line(s); a header and at least one data row are required")]
    NotEnoughRows {
        /// Number of non-empty lines found.
        lines: usize,
    },
}

impl FeedError {
    /// Whether this error means "nothing to ingest" rather than a failure.
    ///
    /// Such feeds leave any held data untouched and are never surfaced.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NotEnoughRows { .. })
    }
}

/// A place raw CSV feed text can be read from.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable description for logs (URL or file path).
    fn describe(&self) -> String;

    /// Retrieves the raw CSV text.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] if the feed cannot be retrieved.
    async fn fetch(&self) -> Result<String, FeedError>;
}
