//! Builder pattern implementation for creating and configuring downloaders.
//!
//! # Examples
//!
//! ## Basic Builder Usage
//!
//! ```rust
//! use streamdl::downloader::DownloaderBuilder;
//! use std::path::PathBuf;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), streamdl::Error> {
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("./downloads"))
//!     .timeout(Duration::from_secs(120))
//!     .concurrent_downloads(2)
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Swapping collaborators
//!
//! ```rust
//! use streamdl::downloader::DownloaderBuilder;
//! use reqwest::Url;
//!
//! # fn example() -> Result<(), streamdl::Error> {
//! let downloader = DownloaderBuilder::hidden()
//!     .fallback(|url: &Url, hint: &str| println!("open {} manually ({})", url, hint))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use super::config::DownloaderConfig;
use super::downloader::Downloader;
use crate::download::{DownloadOutcome, DownloadRequest};
use crate::error::Result;
use crate::fallback::{DirectLinkNotice, Fallback};
use crate::http::{create_http_client, ByteSource, HttpClientConfig, HttpSource};
use crate::progress::StyleOptions;
use crate::sink::{DirectorySink, FileSink};

use reqwest::{
    header::{HeaderMap, HeaderValue, IntoHeaderName},
    Proxy,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A builder used to create a [`Downloader`].
#[derive(Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
    source: Option<Arc<dyn ByteSource>>,
    sink: Option<Arc<dyn FileSink>>,
    fallback: Option<Arc<dyn Fallback>>,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Convenience function to hide the progress bars.
    pub fn hidden() -> Self {
        DownloaderBuilder::default().style_options(StyleOptions::hidden())
    }

    /// Sets the directory where to store the downloaded files.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Replace existing files instead of picking a free name.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.config.overwrite = overwrite;
        self
    }

    /// Set the number of retries for obtaining a response.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set a deadline for each download.
    ///
    /// It covers the request and the whole body. Expiry fails the download
    /// with [`FailureReason::Timeout`](crate::download::FailureReason::Timeout)
    /// and triggers the fallback.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout of the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set the number of concurrent downloads in a batch.
    pub fn concurrent_downloads(mut self, concurrent_downloads: usize) -> Self {
        self.config.concurrent_downloads = concurrent_downloads.max(1);
        self
    }

    /// Set the progress bar style options.
    pub fn style_options(mut self, style_options: StyleOptions) -> Self {
        self.config.style_options = style_options;
        self
    }

    /// Set how long a finished download stays on screen.
    pub fn grace_delay(mut self, grace_delay: Duration) -> Self {
        self.config.grace_delay = grace_delay;
        self
    }

    /// Route requests through a proxy.
    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Add the http headers.
    ///
    /// You can call `.headers()` multiple times and all `HeaderMap` will be merged into a single one.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.config.headers.take().unwrap_or_default();
        new.extend(headers);
        self.config.headers = Some(new);
        self
    }

    /// Add the http header
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.config.headers.take().unwrap_or_default();
        new.insert(name, value);
        self.config.headers = Some(new);
        self
    }

    /// Set callback for when each download produces its outcome.
    ///
    /// The callback is called exactly once per download, after the last
    /// progress update.
    pub fn on_outcome<F>(mut self, callback: F) -> Self
    where
        F: Fn(&DownloadRequest, &DownloadOutcome) + Send + Sync + 'static,
    {
        self.config.on_outcome = Some(Arc::new(Box::new(callback)));
        self
    }

    /// Read bodies from a custom [`ByteSource`] instead of HTTP.
    pub fn source<S: ByteSource + 'static>(mut self, source: S) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Save payloads through a custom [`FileSink`] instead of the directory.
    pub fn sink<S: FileSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Use a custom [`Fallback`] instead of printing the direct link.
    pub fn fallback<F: Fallback + 'static>(mut self, fallback: F) -> Self {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    /// Create the [`Downloader`] with the specified options.
    ///
    /// Fails only if the HTTP client cannot be built.
    pub fn build(self) -> Result<Downloader> {
        let config = self.config;

        let source: Arc<dyn ByteSource> = match self.source {
            Some(source) => source,
            None => {
                let client = create_http_client(HttpClientConfig {
                    retries: config.retries,
                    proxy: config.proxy.clone(),
                    headers: config.headers.clone(),
                    connect_timeout: config.connect_timeout,
                })?;
                Arc::new(HttpSource::new(client))
            }
        };

        let sink: Arc<dyn FileSink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(
                DirectorySink::new(config.directory.clone()).overwrite(config.overwrite),
            ),
        };

        let fallback: Arc<dyn Fallback> = self
            .fallback
            .unwrap_or_else(|| Arc::new(DirectLinkNotice));

        Ok(Downloader::new(config, source, sink, fallback))
    }
}
