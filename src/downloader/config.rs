//! Configuration structures and defaults for the downloader.
//!
//! # Examples
//!
//! ## Using Callbacks
//!
//! ```rust
//! use streamdl::downloader::OutcomeCallback;
//! use streamdl::download::{DownloadOutcome, DownloadRequest};
//!
//! let callback: OutcomeCallback = Box::new(|request: &DownloadRequest, outcome: &DownloadOutcome| {
//!     match outcome {
//!         DownloadOutcome::Completed { saved_as, .. } => {
//!             println!("✓ {} -> {}", request.suggested_name, saved_as.display())
//!         }
//!         DownloadOutcome::Failed { reason, .. } => {
//!             println!("✗ {}: {}", request.suggested_name, reason)
//!         }
//!     }
//! });
//! ```

use crate::download::{DownloadOutcome, DownloadRequest};
use crate::progress::{StyleOptions, DEFAULT_GRACE_DELAY};

use reqwest::{header::HeaderMap, Proxy};
use std::env::current_dir;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Callback type for download outcome events.
pub type OutcomeCallback = Box<dyn Fn(&DownloadRequest, &DownloadOutcome) + Send + Sync>;

/// Configuration structure for the downloader
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Directory where to store the downloaded files.
    pub directory: PathBuf,
    /// Replace existing files instead of picking a free name.
    pub overwrite: bool,
    /// Number of retries for obtaining a response.
    pub retries: u32,
    /// Deadline for a whole download, request and body included.
    pub timeout: Option<Duration>,
    /// Maximum time to establish a connection.
    pub connect_timeout: Option<Duration>,
    /// Number of maximum concurrent downloads in a batch.
    pub concurrent_downloads: usize,
    /// Progress bar style options.
    pub style_options: StyleOptions,
    /// How long a finished download stays on screen.
    pub grace_delay: Duration,
    /// Custom HTTP headers.
    pub headers: Option<HeaderMap>,
    /// Optional proxy.
    pub proxy: Option<Proxy>,
    /// Callback for when each download produces its outcome.
    pub on_outcome: Option<Arc<OutcomeCallback>>,
}

impl std::fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("directory", &self.directory)
            .field("overwrite", &self.overwrite)
            .field("retries", &self.retries)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("concurrent_downloads", &self.concurrent_downloads)
            .field("style_options", &self.style_options)
            .field("grace_delay", &self.grace_delay)
            .field("headers", &self.headers)
            .field("proxy", &self.proxy)
            .field("on_outcome", &self.on_outcome.is_some())
            .finish()
    }
}

impl DownloaderConfig {
    pub const DEFAULT_RETRIES: u32 = 3;
    pub const DEFAULT_CONCURRENT_DOWNLOADS: usize = 4;
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            directory: current_dir().unwrap_or_default(),
            overwrite: false,
            retries: Self::DEFAULT_RETRIES,
            timeout: None,
            connect_timeout: None,
            concurrent_downloads: Self::DEFAULT_CONCURRENT_DOWNLOADS,
            style_options: StyleOptions::default(),
            grace_delay: DEFAULT_GRACE_DELAY,
            headers: None,
            proxy: None,
            on_outcome: None,
        }
    }
}
