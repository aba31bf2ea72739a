//! Progress indicators for MCM operations
//!
//! Two layers:
//!
//! - [`ProgressBar`] wraps `indicatif` with MCM's styling and hides itself
//!   when `MCM_NO_PROGRESS` is set (the `--no-progress` flag sets it)
//! - [`DownloadProgress`] is the per-download tracker: it owns the counters
//!   (bytes so far, expected total, start instant) and drives a bar. Each
//!   download creates its own tracker; there is no shared progress state.
//!
//! # Examples
//!
//! ```rust
//! use mcm_cli::utils::progress::DownloadProgress;
//!
//! let mut progress = DownloadProgress::new("paper-1.16.4-416.jar");
//! progress.start(Some(2048));
//! progress.advance(1024);
//! assert_eq!(progress.percent(), Some(50));
//! progress.advance(1024);
//! progress.finish();
//! assert_eq!(progress.bytes(), 2048);
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::{Duration, Instant};

use crate::constants::ENV_NO_PROGRESS;

/// Checks if progress bars should be disabled.
///
/// Progress bars are disabled when the `MCM_NO_PROGRESS` environment variable
/// is set to any value.
pub fn is_progress_disabled() -> bool {
    std::env::var(ENV_NO_PROGRESS).is_ok()
}

/// A progress bar with consistent styling.
///
/// Hidden (all calls are no-ops) when progress is disabled.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a byte-counting bar for a transfer of `len` bytes.
    pub fn new_bytes(len: u64) -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(len);
            bar.set_style(ProgressStyle::download());
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Creates a spinner for work of unknown size.
    pub fn new_spinner() -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(ProgressStyle::spinner());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Sets the message shown next to the bar.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Sets the prefix shown before the bar.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix.into());
    }

    /// Advances the bar by `delta` units.
    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    /// Completes the bar and removes it from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

/// Progress style utilities for consistent MCM progress bar appearance.
pub struct ProgressStyle;

impl ProgressStyle {
    /// Byte transfer style.
    ///
    /// ```text
    /// paper-1.16.4-416.jar [━━━━━━━━━━━━━━━━╸━━━━━━] 21.3 MiB/36.0 MiB 4.1 MiB/s (00:03)
    /// ```
    pub fn download() -> IndicatifStyle {
        IndicatifStyle::default_bar()
            .template(
                "{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {bytes_per_sec} ({eta})",
            )
            .unwrap_or_else(|_| IndicatifStyle::default_bar())
            .progress_chars("━╸━")
    }

    /// Spinner style for waits of unknown length.
    pub fn spinner() -> IndicatifStyle {
        IndicatifStyle::default_spinner()
            .template("{prefix:.bold} {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| IndicatifStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }
}

/// Tracks a single download.
pub struct DownloadProgress {
    label: String,
    bytes: u64,
    total: Option<u64>,
    started: Instant,
    bar: Option<ProgressBar>,
}

impl DownloadProgress {
    /// Creates a tracker for the artifact named `label`. Nothing is drawn
    /// until [`start`](Self::start).
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            bytes: 0,
            total: None,
            started: Instant::now(),
            bar: None,
        }
    }

    /// Marks the start of the transfer; `total` is the advertised length.
    pub fn start(&mut self, total: Option<u64>) {
        self.bytes = 0;
        self.total = total;
        self.started = Instant::now();
        let bar = match total {
            Some(len) => ProgressBar::new_bytes(len),
            None => {
                let spinner = ProgressBar::new_spinner();
                spinner.set_message("downloading");
                spinner
            }
        };
        bar.set_prefix(self.label.clone());
        self.bar = Some(bar);
    }

    /// Records `delta` more bytes written.
    pub fn advance(&mut self, delta: u64) {
        self.bytes += delta;
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    /// Completes the tracker and clears its bar.
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    /// Bytes written so far.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Advertised length, if upstream sent one.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Time since [`start`](Self::start) (or creation).
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Completion in whole percent, capped at 100.
    pub fn percent(&self) -> Option<u8> {
        match self.total {
            Some(0) => Some(100),
            Some(total) => Some((self.bytes.saturating_mul(100) / total).min(100) as u8),
            None => None,
        }
    }

    /// Average transfer rate in bytes per second.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 { self.bytes as f64 / secs } else { 0.0 }
    }
}

impl Drop for DownloadProgress {
    fn drop(&mut self) {
        self.finish();
    }
}
