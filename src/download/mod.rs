//! Download data model.
//!
//! This module holds the values that flow through a download: the
//! [`DownloadRequest`] describing what to fetch, the [`DownloadProgress`]
//! snapshots reported while reading the body, the assembled [`Payload`], and
//! the single [`DownloadOutcome`] each download produces.
//!
//! # Overview
//!
//! - [`request`] - Requests, media kinds and file naming
//! - [`progress`] - Progress snapshots and percentages
//! - [`outcome`] - Outcomes and failure reasons
//!
//! # Examples
//!
//! ```rust
//! use streamdl::download::{DownloadProgress, Percent};
//!
//! let progress = DownloadProgress::new(2_000, Some(10_000));
//! assert_eq!(progress.percent, Percent::Known(20));
//!
//! let progress = DownloadProgress::new(2_000, None);
//! assert_eq!(progress.percent, Percent::Indeterminate);
//! ```

pub mod outcome;
pub mod progress;
pub mod request;

pub use outcome::{DownloadOutcome, FailureReason};
pub use progress::{DownloadProgress, Percent};
pub use request::{DownloadRequest, MediaKind, DEFAULT_MIME_TYPE};

use bytes::Bytes;

/// A fully received body, tagged with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// The assembled bytes.
    pub bytes: Bytes,
    /// MIME type taken from the request.
    pub mime_type: String,
}

impl Payload {
    pub fn new(bytes: Bytes, mime_type: &str) -> Self {
        Self {
            bytes,
            mime_type: String::from(mime_type),
        }
    }

    /// Size of the payload in bytes.
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
