//! Downloader module containing the streaming downloader, its builder, and configuration.
//!
//! # Overview
//!
//! - `downloader` - The [`Downloader`] and its streaming read loop
//! - `builder` - [`DownloaderBuilder`] for configuration and collaborator injection
//! - `config` - Configuration structures and callback types
//! - `slots` - [`DownloadSlots`] for superseding a UI slot's download
//!
//! # Examples
//!
//! ```rust,no_run
//! use streamdl::downloader::{DownloaderBuilder, DownloadSlots};
//! use streamdl::download::DownloadRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::hidden().build()?;
//! let slots = DownloadSlots::new();
//! let request = DownloadRequest::try_from("https://cdn.example.com/uploads/a.png")?;
//!
//! // Starting another download in "tile-7" would cancel this one.
//! let outcome = downloader
//!     .download_in_slot(&slots, "tile-7", &request, |_| {})
//!     .await;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod downloader;
pub mod slots;

pub use builder::DownloaderBuilder;
pub use config::{DownloaderConfig, OutcomeCallback};
pub use downloader::Downloader;
pub use slots::{DownloadSlots, SlotGuard};
