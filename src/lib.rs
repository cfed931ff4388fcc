//! streamdl downloads media files chunk by chunk, reporting progress as the
//! body arrives, falling back to a direct link when streaming fails, and
//! saving the result under a sanitized file name.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use streamdl::{DownloadRequest, DownloaderBuilder, MediaKind, Error};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let url = "https://cdn.example.com/uploads/promo_4f2a.jpg".parse().map_err(|_| {
//!     Error::InvalidUrl("bad url".into())
//! })?;
//! let request = DownloadRequest::for_media(&url, "Promo Black Friday", MediaKind::Art);
//!
//! let downloader = DownloaderBuilder::new().directory("output".into()).build()?;
//! let outcome = downloader
//!     .download(&request, |progress| println!("{}", progress.percent))
//!     .await;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`download`] - Requests, progress snapshots, payloads and outcomes
//! - [`downloader`] - The streaming [`Downloader`], its builder and slot registry
//! - [`catalog`] - Paginated media catalog client and session credentials
//! - [`http`] - HTTP client setup and the [`ByteSource`](http::ByteSource) seam
//! - [`sink`] - Where completed payloads are written
//! - [`fallback`] - What happens when streaming fails
//! - [`progress`] - Progress bar styling and presentation
//! - [`error`] - Centralized error handling with the [`Error`] enum
//! - [`utils`] - File name sanitization and content length helpers

pub mod catalog;
pub mod download;
pub mod downloader;
pub mod error;
pub mod fallback;
pub mod http;
pub mod progress;
pub mod sink;
pub mod utils;

pub use catalog::{CatalogClient, CatalogConfig, Collection, MediaItem, SessionCredentials};
pub use download::{
    DownloadOutcome, DownloadProgress, DownloadRequest, FailureReason, MediaKind, Payload,
    Percent,
};
pub use downloader::{DownloadSlots, Downloader, DownloaderBuilder};
pub use error::{Error, Result};
pub use fallback::{DirectLinkNotice, Fallback};
pub use http::{create_http_client, ByteSource, HttpClientConfig, HttpSource};
pub use progress::{ProgressBarOpts, StyleOptions};
pub use sink::{DirectorySink, FileSink};
pub use utils::{declared_total, sanitize_filename};
