//! Core downloader implementation with the streaming read loop.
//!
//! # Examples
//!
//! ## Single download with a progress callback
//!
//! ```rust,no_run
//! use streamdl::download::{DownloadRequest, MediaKind, Percent};
//! use streamdl::downloader::DownloaderBuilder;
//! use reqwest::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::hidden().build()?;
//! let url = Url::parse("https://cdn.example.com/uploads/promo.jpg")?;
//! let request = DownloadRequest::for_media(&url, "Promo", MediaKind::Art);
//!
//! let outcome = downloader
//!     .download(&request, |progress| match progress.percent {
//!         Percent::Known(p) => println!("{}%", p),
//!         Percent::Indeterminate => println!("{} bytes", progress.received_bytes),
//!     })
//!     .await;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! ## Batch with progress bars
//!
//! ```rust,no_run
//! use streamdl::download::DownloadRequest;
//! use streamdl::downloader::DownloaderBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new().concurrent_downloads(2).build()?;
//! let requests = vec![
//!     DownloadRequest::try_from("https://cdn.example.com/uploads/a.png")?,
//!     DownloadRequest::try_from("https://cdn.example.com/uploads/b.png")?,
//! ];
//! let outcomes = downloader.download_many(&requests).await;
//! # Ok(())
//! # }
//! ```

use super::config::DownloaderConfig;
use super::slots::DownloadSlots;
use crate::download::{
    DownloadOutcome, DownloadProgress, DownloadRequest, FailureReason, Payload,
};
use crate::fallback::Fallback;
use crate::http::ByteSource;
use crate::progress::{ProgressDisplay, ProgressPresenter};
use crate::sink::FileSink;
use crate::utils::content_length::declared_total;

use bytes::BytesMut;
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Upper bound on what a declared size may preallocate.
const MAX_PREALLOCATION: u64 = 64 * 1024 * 1024;

/// Streams remote resources to a [`FileSink`] while reporting progress.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main() -> Result<(), streamdl::Error> {
/// use streamdl::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    config: DownloaderConfig,
    source: Arc<dyn ByteSource>,
    sink: Arc<dyn FileSink>,
    fallback: Arc<dyn Fallback>,
}

impl fmt::Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .finish()
    }
}

impl Downloader {
    /// Creates a new Downloader from its configuration and collaborators.
    pub(crate) fn new(
        config: DownloaderConfig,
        source: Arc<dyn ByteSource>,
        sink: Arc<dyn FileSink>,
        fallback: Arc<dyn Fallback>,
    ) -> Self {
        Self {
            config,
            source,
            sink,
            fallback,
        }
    }

    /// Gets the directory where files will be downloaded.
    pub fn directory(&self) -> &PathBuf {
        &self.config.directory
    }

    /// Gets the number of retries per download.
    pub fn retries(&self) -> u32 {
        self.config.retries
    }

    /// Gets the per-download deadline.
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.config.timeout
    }

    /// Gets the number of concurrent downloads in a batch.
    pub fn concurrent_downloads(&self) -> usize {
        self.config.concurrent_downloads
    }

    /// Gets whether existing files are overwritten.
    pub fn overwrite(&self) -> bool {
        self.config.overwrite
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&reqwest::header::HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Download one resource.
    ///
    /// `on_progress` is called once per received chunk, in order, and never
    /// after this future resolves. The returned outcome is the only result:
    /// failures are never raised as errors.
    pub async fn download<F>(&self, request: &DownloadRequest, on_progress: F) -> DownloadOutcome
    where
        F: FnMut(&DownloadProgress) + Send,
    {
        self.download_with_cancel(request, on_progress, &CancellationToken::new())
            .await
    }

    /// Download one resource, giving up as soon as `cancel` fires.
    ///
    /// A cancelled download saves nothing, stops calling `on_progress`, and
    /// does not trigger the fallback.
    pub async fn download_with_cancel<F>(
        &self,
        request: &DownloadRequest,
        mut on_progress: F,
        cancel: &CancellationToken,
    ) -> DownloadOutcome
    where
        F: FnMut(&DownloadProgress) + Send,
    {
        let file_name = request.file_name();

        let streamed = match self.config.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.stream(request, &mut on_progress, cancel))
                    .await
                {
                    Ok(streamed) => streamed,
                    Err(_) => {
                        debug!("Download of {} timed out after {:?}", request.source_url, limit);
                        Err(FailureReason::Timeout)
                    }
                }
            }
            None => self.stream(request, &mut on_progress, cancel).await,
        };

        let outcome = match streamed {
            Ok(_) if cancel.is_cancelled() => {
                self.fail(request, &file_name, FailureReason::Cancelled)
            }
            Ok(payload) => self.save(payload, &file_name).await,
            Err(reason) => self.fail(request, &file_name, reason),
        };

        if let Some(ref callback) = self.config.on_outcome {
            callback(request, &outcome);
        }

        outcome
    }

    /// Download one resource in a UI slot, superseding the slot's previous download.
    pub async fn download_in_slot<F>(
        &self,
        slots: &DownloadSlots,
        slot: &str,
        request: &DownloadRequest,
        on_progress: F,
    ) -> DownloadOutcome
    where
        F: FnMut(&DownloadProgress) + Send,
    {
        let guard = slots.claim(slot);
        self.download_with_cancel(request, on_progress, guard.token())
            .await
    }

    /// Download several resources, drawing progress bars.
    ///
    /// At most `concurrent_downloads` run at once. Outcomes are returned in
    /// request order.
    pub async fn download_many(&self, requests: &[DownloadRequest]) -> Vec<DownloadOutcome> {
        self.download_many_with_cancel(requests, &CancellationToken::new())
            .await
    }

    /// Same as [`download_many`](Self::download_many), abandoning every
    /// remaining download when `cancel` fires.
    pub async fn download_many_with_cancel(
        &self,
        requests: &[DownloadRequest],
        cancel: &CancellationToken,
    ) -> Vec<DownloadOutcome> {
        let display = ProgressDisplay::new(
            self.config.style_options.clone(),
            requests.len(),
            self.config.grace_delay,
        );

        let finished = stream::iter(requests)
            .map(|request| self.present(request, &display, cancel))
            .buffered(self.config.concurrent_downloads)
            .collect::<Vec<_>>()
            .await;

        let (outcomes, mut presenters): (Vec<_>, Vec<_>) = finished.into_iter().unzip();

        // Let the final states linger before clearing them.
        join_all(presenters.iter_mut().map(|p| p.settle())).await;
        display.finish();

        outcomes
    }

    async fn present(
        &self,
        request: &DownloadRequest,
        display: &ProgressDisplay,
        cancel: &CancellationToken,
    ) -> (DownloadOutcome, ProgressPresenter) {
        let mut presenter = display.create_presenter(&request.file_name());
        presenter.start();

        let outcome = self
            .download_with_cancel(request, |progress| presenter.update(progress), cancel)
            .await;

        presenter.finish(&outcome);
        display.increment_main();
        (outcome, presenter)
    }

    /// Read the body into a payload.
    async fn stream<F>(
        &self,
        request: &DownloadRequest,
        on_progress: &mut F,
        cancel: &CancellationToken,
    ) -> Result<Payload, FailureReason>
    where
        F: FnMut(&DownloadProgress) + Send,
    {
        let remote = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FailureReason::Cancelled),
            remote = self.source.open(&request.source_url) => remote,
        };
        let remote = remote.map_err(|e| FailureReason::Network(e.describe()))?;

        if !remote.status.is_success() {
            debug!("{} answered {}", request.source_url, remote.status);
            return Err(FailureReason::Status(remote.status.as_u16()));
        }

        let mut body = remote.body.ok_or(FailureReason::StreamUnsupported)?;
        let total = declared_total(&remote.headers);
        debug!("Retrieving chunks, declared size {:?}", total);

        let capacity = total.unwrap_or(0).min(MAX_PREALLOCATION) as usize;
        let mut buffer = BytesMut::with_capacity(capacity);
        let mut received: u64 = 0;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FailureReason::Cancelled),
                next = body.next() => next,
            };

            let chunk = match next {
                None => break,
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => {
                    debug!("Stream broke after {} bytes: {}", received, e.describe());
                    return Err(if received == 0 {
                        FailureReason::Network(e.describe())
                    } else {
                        FailureReason::PartialTransfer {
                            received_bytes: received,
                        }
                    });
                }
            };

            if chunk.is_empty() {
                continue;
            }

            received += chunk.len() as u64;
            buffer.extend_from_slice(&chunk);
            on_progress(&DownloadProgress::new(received, total));
        }

        Ok(Payload::new(buffer.freeze(), &request.mime_type))
    }

    async fn save(&self, payload: Payload, file_name: &str) -> DownloadOutcome {
        let final_bytes = payload.len();
        match self.sink.save(payload, file_name).await {
            Ok(saved_as) => DownloadOutcome::Completed {
                final_bytes,
                saved_as,
            },
            Err(e) => {
                warn!("Could not save {}: {}", file_name, e.describe());
                DownloadOutcome::failed(FailureReason::Save(e.describe()), false)
            }
        }
    }

    fn fail(
        &self,
        request: &DownloadRequest,
        file_name: &str,
        reason: FailureReason,
    ) -> DownloadOutcome {
        if !reason.wants_fallback() {
            debug!("Download of {} ended: {}", request.source_url, reason);
            return DownloadOutcome::failed(reason, false);
        }

        warn!(
            "Download of {} failed ({}), using the direct link",
            request.source_url, reason
        );
        self.fallback.navigate(&request.source_url, file_name);
        DownloadOutcome::failed(reason, true)
    }
}
