#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the course portal binary: the sync progress bar,
//! a spinner for downloads, and a logger that stays out of the bars' way.

use std::sync::Arc;
use std::time::Duration;

use course_portal_feed::progress::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::{MultiProgress, ProgressDrawTarget};

/// Sync progress drawn with `indicatif`.
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Row-counter style used after the row total arrives.
    rows_style: ProgressStyle,
}

impl IndicatifProgress {
    /// Creates a bar for a sync pass. It spins while the feed is fetched
    /// and becomes a row counter once normalization reports a total.
    #[must_use]
    pub fn sync_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = spinner(multi, message);

        let rows_style = ProgressStyle::with_template(
            "  {msg} {wide_bar:.cyan/dim} {pos}/{len} rows {percent}%",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

        Arc::new(Self { bar, rows_style })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_style(self.rows_style.clone());
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }

    fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// Adds a ticking spinner with `message` to `multi`.
#[must_use]
pub fn spinner(multi: &MultiProgress, message: &str) -> ProgressBar {
    let bar = multi.add(ProgressBar::new_spinner());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar
}

/// Installs `pretty_env_logger` (level from `RUST_LOG`) behind
/// `indicatif-log-bridge`, and returns the [`MultiProgress`] every bar and
/// spinner must be added to so log lines do not tear them.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // Already initialized in tests.
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}
