//! File sinks: where completed payloads are saved.
//!
//! A [`FileSink`] is the "save bytes as a file" primitive. The downloader
//! calls it at most once per download, only after the whole body was
//! received.
//!
//! # Examples
//!
//! ```rust,no_run
//! use streamdl::sink::{DirectorySink, FileSink};
//! use streamdl::download::Payload;
//! use bytes::Bytes;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = DirectorySink::new("downloads".into());
//! let payload = Payload::new(Bytes::from_static(b"\x89PNG"), "image/png");
//! let path = sink.save(payload, "sticker.png").await?;
//! println!("saved to {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod directory;

pub use directory::DirectorySink;

use crate::download::Payload;
use crate::error::Result;

use futures::future::BoxFuture;
use std::path::PathBuf;

/// Saves assembled payloads.
pub trait FileSink: Send + Sync {
    /// Save `payload` under `file_name` and return where it ended up.
    fn save<'a>(&'a self, payload: Payload, file_name: &'a str) -> BoxFuture<'a, Result<PathBuf>>;
}
