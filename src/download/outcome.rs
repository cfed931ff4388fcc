//! Download outcomes.
//!
//! Every call to [`Downloader::download`](crate::Downloader::download)
//! produces exactly one [`DownloadOutcome`].
//!
//! ```rust
//! use streamdl::download::{DownloadOutcome, FailureReason};
//!
//! let outcome = DownloadOutcome::failed(FailureReason::Timeout, true);
//! match &outcome {
//!     DownloadOutcome::Completed { final_bytes, saved_as } => {
//!         println!("saved {} bytes to {}", final_bytes, saved_as.display())
//!     }
//!     DownloadOutcome::Failed { reason, fallback_attempted } => {
//!         println!("failed: {} (fallback: {})", reason, fallback_attempted)
//!     }
//! }
//! assert!(!outcome.is_completed());
//! ```

use std::fmt;
use std::path::PathBuf;

/// Why a download did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The request never reached a usable response.
    Network(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The response carried no readable body stream.
    StreamUnsupported,
    /// The body stream broke after some bytes were received.
    PartialTransfer {
        /// Bytes received before the stream broke. They were discarded.
        received_bytes: u64,
    },
    /// The configured deadline expired.
    Timeout,
    /// The payload was fully received but could not be saved.
    Save(String),
    /// The caller abandoned the download.
    Cancelled,
}

impl FailureReason {
    /// Whether the direct-link fallback applies to this failure.
    ///
    /// Save failures already had the bytes in hand and cancelled downloads
    /// are no longer wanted.
    pub fn wants_fallback(&self) -> bool {
        !matches!(self, FailureReason::Save(_) | FailureReason::Cancelled)
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Network(msg) => write!(f, "network failure: {}", msg),
            FailureReason::Status(code) => write!(f, "server answered with status {}", code),
            FailureReason::StreamUnsupported => f.write_str("response body cannot be streamed"),
            FailureReason::PartialTransfer { received_bytes } => write!(
                f,
                "transfer interrupted after {} bytes",
                received_bytes
            ),
            FailureReason::Timeout => f.write_str("download timed out"),
            FailureReason::Save(msg) => write!(f, "could not save file: {}", msg),
            FailureReason::Cancelled => f.write_str("download cancelled"),
        }
    }
}

/// Result of one download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The payload was received and saved.
    Completed {
        /// Number of bytes saved.
        final_bytes: u64,
        /// Where the file sink put the payload.
        saved_as: PathBuf,
    },
    /// The download failed.
    Failed {
        /// What went wrong.
        reason: FailureReason,
        /// Whether the direct-link fallback was triggered.
        fallback_attempted: bool,
    },
}

impl DownloadOutcome {
    /// Create a [`DownloadOutcome::Failed`].
    pub fn failed(reason: FailureReason, fallback_attempted: bool) -> Self {
        DownloadOutcome::Failed {
            reason,
            fallback_attempted,
        }
    }

    /// Return `true` for [`DownloadOutcome::Completed`].
    pub fn is_completed(&self) -> bool {
        matches!(self, DownloadOutcome::Completed { .. })
    }

    /// Get the failure reason, if any.
    pub fn reason(&self) -> Option<&FailureReason> {
        match self {
            DownloadOutcome::Completed { .. } => None,
            DownloadOutcome::Failed { reason, .. } => Some(reason),
        }
    }
}
