//! Download requests and media kinds.
//!
//! A [`DownloadRequest`] is created for each user-initiated download and is
//! never mutated afterwards.
//!
//! ```rust
//! use streamdl::download::{DownloadRequest, MediaKind};
//! use reqwest::Url;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let url = Url::parse("https://cdn.example.com/uploads/promo.jpg")?;
//! let request = DownloadRequest::for_media(&url, "Promo de Verão", MediaKind::Art);
//! assert_eq!(request.file_name(), "Promo_de_Vero.jpg");
//!
//! let request = DownloadRequest::try_from("https://cdn.example.com/uploads/pack%201.mp4")?;
//! assert_eq!(request.suggested_name, "pack 1.mp4");
//! # Ok(())
//! # }
//! ```

use crate::error::Error;
use crate::utils::filename::sanitize_filename;

use reqwest::Url;
use std::convert::TryFrom;
use std::fmt;

/// MIME type used when nothing more specific is known.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// The media libraries served by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Art images.
    Art,
    /// Stickers.
    Sticker,
    /// Video packs.
    Video,
}

impl MediaKind {
    /// File extension given to saved files of this kind.
    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Art => "jpg",
            MediaKind::Sticker => "png",
            MediaKind::Video => "mp4",
        }
    }

    /// MIME type the assembled payload is tagged with.
    pub fn mime_type(self) -> &'static str {
        match self {
            MediaKind::Art => "image/jpeg",
            MediaKind::Sticker => "image/png",
            MediaKind::Video => "video/mp4",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::Art => "art",
            MediaKind::Sticker => "sticker",
            MediaKind::Video => "video",
        };
        f.write_str(name)
    }
}

/// Represents a resource to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// URL of the resource.
    pub source_url: Url,
    /// Human title the saved file name is derived from.
    pub suggested_name: String,
    /// MIME type the payload is tagged with.
    pub mime_type: String,
    /// Extension appended to the sanitized name, without the dot.
    pub extension: Option<String>,
}

impl DownloadRequest {
    /// Creates a new [`DownloadRequest`] without an extension.
    pub fn new(source_url: &Url, suggested_name: &str, mime_type: &str) -> Self {
        Self {
            source_url: source_url.clone(),
            suggested_name: String::from(suggested_name),
            mime_type: String::from(mime_type),
            extension: None,
        }
    }

    /// Creates a [`DownloadRequest`] for a catalog item of the given kind.
    pub fn for_media(source_url: &Url, title: &str, kind: MediaKind) -> Self {
        Self {
            source_url: source_url.clone(),
            suggested_name: String::from(title),
            mime_type: String::from(kind.mime_type()),
            extension: Some(String::from(kind.extension())),
        }
    }

    /// Replace the MIME type, e.g. with the one reported by the catalog.
    pub fn with_mime_type(self, mime_type: &str) -> Self {
        Self {
            mime_type: String::from(mime_type),
            ..self
        }
    }

    /// Filesystem-safe name the payload is saved under.
    pub fn file_name(&self) -> String {
        let stem = sanitize_filename(&self.suggested_name);
        match self.extension.as_deref() {
            Some(ext) if !ext.is_empty() => format!("{}.{}", stem, ext),
            _ => stem,
        }
    }
}

impl TryFrom<&Url> for DownloadRequest {
    type Error = crate::error::Error;

    fn try_from(value: &Url) -> Result<Self, Self::Error> {
        value
            .path_segments()
            .ok_or_else(|| {
                Error::InvalidUrl(format!(
                    "The url \"{}\" does not contain a valid path",
                    value
                ))
            })?
            .next_back()
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                form_urlencoded::parse(segment.as_bytes())
                    .map(|(key, val)| [key, val].concat())
                    .collect::<String>()
            })
            .map(|name| DownloadRequest::new(value, &name, DEFAULT_MIME_TYPE))
            .ok_or_else(|| {
                Error::InvalidUrl(format!("The url \"{}\" does not contain a filename", value))
            })
    }
}

impl TryFrom<&str> for DownloadRequest {
    type Error = crate::error::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Url::parse(value)
            .map_err(|e| {
                Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", value, e))
            })
            .and_then(|u| DownloadRequest::try_from(&u))
    }
}
