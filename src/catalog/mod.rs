//! Catalog collaborator: lists the media a user can download.
//!
//! - `client` - [`CatalogClient`] paging through collections
//! - `credentials` - [`CredentialsProvider`] and the in-memory [`SessionCredentials`]
//! - `models` - response decoding and validation into [`MediaItem`]s
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use streamdl::catalog::{CatalogClient, CatalogConfig, Collection, SessionCredentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CatalogConfig::new("https://cms.example.com/".parse()?);
//! let catalog = CatalogClient::new(config, Arc::new(SessionCredentials::new("jwt")))?;
//!
//! for item in catalog.fetch_all(Collection::Stickers).await? {
//!     println!("{} -> {}", item.title, item.to_request().file_name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credentials;
pub mod models;

pub use client::{CatalogClient, CatalogConfig, DEFAULT_PAGE_SIZE};
pub use credentials::{CredentialsProvider, SessionCredentials};
pub use models::{parse_page, Collection, MediaItem, Page};
