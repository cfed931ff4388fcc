//! Progress module containing progress bar functionality.
//!
//! # Overview
//!
//! - `style` - Progress bar styling options and templates
//! - `presenter` - Rendering of a single download's progress
//! - `display` - Coordination of several presenters and the batch bar
//!
//! # Examples
//!
//! ```rust
//! use streamdl::downloader::DownloaderBuilder;
//! use streamdl::progress::StyleOptions;
//!
//! # fn example() -> Result<(), streamdl::Error> {
//! let downloader = DownloaderBuilder::new()
//!     .style_options(StyleOptions::hidden())
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub(crate) mod display;
pub(crate) mod presenter;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use presenter::{PresenterState, ProgressPresenter, DEFAULT_GRACE_DELAY};
pub use style::{ProgressBarOpts, StyleOptions};
