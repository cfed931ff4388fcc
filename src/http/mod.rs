//! HTTP module containing HTTP client functionality.
//!
//! # Overview
//!
//! - [`client`] - HTTP client creation and middleware configuration
//! - [`source`] - The [`ByteSource`] abstraction the downloader reads from
//!
//! # Examples
//!
//! ```rust
//! use streamdl::http::{create_http_client, HttpClientConfig, HttpSource};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_http_client(HttpClientConfig::default())?;
//! let source = HttpSource::new(client);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod source;

pub use client::{create_http_client, HttpClientConfig};
pub use source::{BodyStream, ByteSource, HttpSource, RemoteBody};
