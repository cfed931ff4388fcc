//! Shared utility functions.
//!
//! # Overview
//!
//! - [`content_length`] - Declared body size extraction from response headers
//! - [`filename`] - Title to file name sanitization

pub mod content_length;
pub mod filename;

pub use content_length::{declared_total, parse_content_range_total};
pub use filename::{sanitize_filename, DEFAULT_FILE_NAME};
