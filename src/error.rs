//! Error handling for streamdl.
//!
//! Everything below the download boundary returns [`Result`]. The
//! [`Downloader`](crate::Downloader) converts these errors into a
//! [`FailureReason`](crate::download::FailureReason) so that callers of
//! `download` never see an `Err`.

use std::io;
use thiserror::Error;

/// Errors that can happen when using streamdl.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// I/O Error.
    ///
    /// Raised by the file sink while creating, writing or renaming files.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error raised by the middleware stack (retries, tracing).
    #[error("HTTP middleware error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },

    /// The server answered with a non-success status.
    #[error("Unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    /// The catalog rejected the bearer token.
    ///
    /// The session has already been torn down when this is returned.
    #[error("Authentication failed, please log in again")]
    Unauthorized,

    /// A catalog payload could not be decoded.
    #[error("Malformed catalog response")]
    Decode {
        #[from]
        source: serde_json::Error,
    },
}

impl Error {
    /// Render the error and its sources on one line.
    pub fn describe(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str(": ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}

/// Result type alias for operations that can fail with a streamdl error.
pub type Result<T> = std::result::Result<T, Error>;
