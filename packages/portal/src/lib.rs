#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The course portal: in-memory catalog state and the sync pipeline that
//! refreshes it, plus what the front end does with that state: search,
//! hash routing, share links, rendered views and download resolution.
//!
//! A [`state::Portal`] starts from the cached snapshot (if any), then
//! replaces it wholesale each time a feed sync succeeds. Once the portal
//! has held data, sync failures are logged and the stale data stays up.

pub mod config;
pub mod download;
pub mod route;
pub mod search;
pub mod share;
pub mod state;
pub mod view;

use course_portal_cache::CacheError;

/// Errors surfaced by portal operations.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// The feed could not be synced and there is no data to fall back on.
    #[error("Sync failed: {message}")]
    Sync {
        /// Human-readable reason, suitable for display.
        message: String,
    },

    /// Cache operation failed.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// No module has this id.
    #[error("Unknown module '{id}'")]
    UnknownModule {
        /// The requested module id.
        id: String,
    },

    /// The module has no resource with this id.
    #[error("Module '{module_id}' has no resource '{resource_id}'")]
    UnknownResource {
        /// The module searched.
        module_id: String,
        /// The requested resource id.
        resource_id: String,
    },

    /// The resource exists but has no download link.
    #[error("'{title}' has no download link")]
    Unavailable {
        /// Title of the resource.
        title: String,
    },
}
