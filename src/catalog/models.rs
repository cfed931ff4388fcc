//! Catalog response shapes and their validation.
//!
//! Collections come back as `{ data: [...], meta: { pagination: {...} } }`.
//! Entries are either nested under `attributes` (Strapi v4) or flat
//! (Strapi v5), and media fields are wrapped in `data` or inlined depending
//! on the same version split. Everything is decoded into loose `Raw*`
//! types first and validated into [`MediaItem`]s here; entries without a
//! title or a media URL are rejected, never passed on.

use crate::download::{DownloadRequest, MediaKind};
use crate::error::Result;

use reqwest::Url;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// The media collections exposed by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Arts,
    Stickers,
    Videos,
}

impl Collection {
    /// Path segment under `/api/`.
    pub fn path(self) -> &'static str {
        match self {
            Collection::Arts => "arts",
            Collection::Stickers => "stickers",
            Collection::Videos => "videos",
        }
    }

    /// Kind of media the collection holds.
    pub fn kind(self) -> MediaKind {
        match self {
            Collection::Arts => MediaKind::Art,
            Collection::Stickers => MediaKind::Sticker,
            Collection::Videos => MediaKind::Video,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arts" | "art" => Ok(Collection::Arts),
            "stickers" | "sticker" => Ok(Collection::Stickers),
            "videos" | "video" => Ok(Collection::Videos),
            other => Err(format!(
                "unknown collection {:?}, expected arts, stickers or videos",
                other
            )),
        }
    }
}

/// A validated catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub id: u64,
    pub title: String,
    /// Absolute URL of the media file.
    pub url: Url,
    /// MIME type reported by the catalog, if any.
    pub mime_type: Option<String>,
    pub kind: MediaKind,
}

impl MediaItem {
    /// Build the download request for this item.
    pub fn to_request(&self) -> DownloadRequest {
        DownloadRequest::for_media(&self.url, &self.title, self.kind)
    }
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<MediaItem>,
    pub page: u32,
    pub page_size: Option<u32>,
    pub page_count: u32,
    pub total: Option<u64>,
    /// Entries dropped by validation.
    pub rejected: usize,
}

impl Page {
    /// Whether another page follows.
    pub fn has_more(&self) -> bool {
        self.page < self.page_count
    }
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(default)]
    data: Vec<RawEntry>,
    #[serde(default)]
    meta: Option<RawMeta>,
}

#[derive(Debug, Deserialize)]
struct RawMeta {
    #[serde(default)]
    pagination: Option<RawPagination>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPagination {
    page: Option<u32>,
    page_size: Option<u32>,
    page_count: Option<u32>,
    total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: Option<u64>,
    attributes: Option<RawFields>,
    #[serde(flatten)]
    inline: RawFields,
}

#[derive(Debug, Default, Deserialize)]
struct RawFields {
    title: Option<String>,
    name: Option<String>,
    file: Option<RawMedia>,
    image: Option<RawMedia>,
    video: Option<RawMedia>,
    media: Option<RawMedia>,
    url: Option<String>,
}

impl RawFields {
    fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    fn media(&self) -> Option<&RawFile> {
        [&self.file, &self.image, &self.video, &self.media]
            .into_iter()
            .flatten()
            .find_map(RawMedia::first)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMedia {
    File(RawFile),
    Files(Vec<RawFile>),
    Wrapped { data: Option<RawMediaData> },
}

impl RawMedia {
    fn first(&self) -> Option<&RawFile> {
        match self {
            RawMedia::File(f) => Some(f),
            RawMedia::Files(files) => files.first(),
            RawMedia::Wrapped { data } => match data.as_ref()? {
                RawMediaData::One(entry) => Some(entry.file()),
                RawMediaData::Many(entries) => entries.first().map(RawMediaEntry::file),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMediaData {
    One(RawMediaEntry),
    Many(Vec<RawMediaEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMediaEntry {
    Nested { attributes: RawFile },
    Flat(RawFile),
}

impl RawMediaEntry {
    fn file(&self) -> &RawFile {
        match self {
            RawMediaEntry::Nested { attributes } => attributes,
            RawMediaEntry::Flat(file) => file,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawFile {
    url: String,
    mime: Option<String>,
}

/// Decode and validate one collection page.
///
/// Relative media URLs are resolved against `base`.
///
/// ```rust
/// use streamdl::catalog::{parse_page, Collection};
/// use reqwest::Url;
///
/// let json = br#"{
///   "data": [{ "id": 7, "title": "Promo", "file": { "url": "/uploads/promo.jpg" } }],
///   "meta": { "pagination": { "page": 1, "pageSize": 25, "pageCount": 3, "total": 60 } }
/// }"#;
/// let base = Url::parse("https://cms.example.com/").unwrap();
/// let page = parse_page(json, &base, Collection::Arts, 1).unwrap();
/// assert_eq!(page.items[0].url.as_str(), "https://cms.example.com/uploads/promo.jpg");
/// assert!(page.has_more());
/// ```
pub fn parse_page(
    body: &[u8],
    base: &Url,
    collection: Collection,
    requested: u32,
) -> Result<Page> {
    let raw: RawCollection = serde_json::from_slice(body)?;
    let pagination = raw.meta.and_then(|m| m.pagination);

    let page = pagination.as_ref().and_then(|p| p.page).unwrap_or(requested);
    let page_count = pagination.as_ref().and_then(|p| p.page_count).unwrap_or(page);

    let mut items = Vec::with_capacity(raw.data.len());
    let mut rejected = 0;
    for entry in raw.data {
        match validate(entry, base, collection.kind()) {
            Ok(item) => items.push(item),
            Err(reason) => {
                warn!("Rejected {} entry: {}", collection, reason);
                rejected += 1;
            }
        }
    }

    Ok(Page {
        items,
        page,
        page_size: pagination.as_ref().and_then(|p| p.page_size),
        page_count,
        total: pagination.and_then(|p| p.total),
        rejected,
    })
}

fn validate(
    entry: RawEntry,
    base: &Url,
    kind: MediaKind,
) -> std::result::Result<MediaItem, String> {
    let id = entry.id.ok_or("missing id")?;
    let fields = entry.attributes.as_ref().unwrap_or(&entry.inline);

    let title = fields
        .title()
        .ok_or_else(|| format!("entry {} has no title", id))?;

    let (raw_url, mime_type) = match fields.media() {
        Some(file) => (file.url.as_str(), file.mime.clone()),
        None => (
            fields
                .url
                .as_deref()
                .ok_or_else(|| format!("entry {} has no media", id))?,
            None,
        ),
    };

    let url = base
        .join(raw_url)
        .map_err(|e| format!("entry {} has an invalid url {:?}: {}", id, raw_url, e))?;

    Ok(MediaItem {
        id,
        title: title.to_string(),
        url,
        mime_type,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://cms.example.com/").unwrap()
    }

    #[test]
    fn test_collection_from_str() {
        assert_eq!("arts".parse::<Collection>().unwrap(), Collection::Arts);
        assert_eq!("Sticker".parse::<Collection>().unwrap(), Collection::Stickers);
        assert_eq!(" videos ".parse::<Collection>().unwrap(), Collection::Videos);
        assert!("reports".parse::<Collection>().is_err());
    }

    #[test]
    fn test_parse_v4_nested_entries() {
        let json = br#"{
            "data": [{
                "id": 1,
                "attributes": {
                    "title": "Arte Black Friday",
                    "image": { "data": { "id": 9, "attributes": { "url": "/uploads/bf.jpg", "mime": "image/jpeg" } } }
                }
            }],
            "meta": { "pagination": { "page": 2, "pageSize": 10, "pageCount": 2, "total": 11 } }
        }"#;

        let page = parse_page(json, &base(), Collection::Arts, 2).unwrap();
        assert_eq!(page.page, 2);
        assert!(!page.has_more());
        assert_eq!(page.total, Some(11));
        assert_eq!(
            page.items,
            vec![MediaItem {
                id: 1,
                title: "Arte Black Friday".into(),
                url: Url::parse("https://cms.example.com/uploads/bf.jpg").unwrap(),
                mime_type: Some("image/jpeg".into()),
                kind: MediaKind::Art,
            }]
        );
    }

    #[test]
    fn test_parse_v5_flat_entries_with_absolute_url() {
        let json = br#"{
            "data": [{
                "id": 4,
                "documentId": "abc",
                "name": "Pack Natal",
                "video": [{ "url": "https://bucket.example.com/natal.mp4", "mime": "video/mp4" }]
            }],
            "meta": { "pagination": { "page": 1, "pageSize": 25, "pageCount": 1, "total": 1 } }
        }"#;

        let page = parse_page(json, &base(), Collection::Videos, 1).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Pack Natal");
        assert_eq!(page.items[0].url.as_str(), "https://bucket.example.com/natal.mp4");
        assert_eq!(page.items[0].to_request().file_name(), "Pack_Natal.mp4");
    }

    #[test]
    fn test_invalid_entries_are_rejected() {
        let json = br#"{
            "data": [
                { "id": 1, "title": "", "url": "/uploads/a.png" },
                { "id": 2, "title": "No media" },
                { "id": 3, "title": "Empty media", "file": { "data": null } },
                { "title": "No id", "url": "/uploads/b.png" },
                { "id": 5, "title": "Good", "url": "/uploads/c.png" }
            ]
        }"#;

        let page = parse_page(json, &base(), Collection::Stickers, 1).unwrap();
        assert_eq!(page.rejected, 4);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, 5);
    }

    #[test]
    fn test_missing_pagination_means_last_page() {
        let json = br#"{ "data": [] }"#;
        let page = parse_page(json, &base(), Collection::Arts, 3).unwrap();
        assert_eq!(page.page, 3);
        assert_eq!(page.page_count, 3);
        assert!(!page.has_more());
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(parse_page(b"<html>", &base(), Collection::Arts, 1).is_err());
    }
}
