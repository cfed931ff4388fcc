//! Declared body size extraction.
//!
//! A response declares its size with `Content-Length`, or, for ranged
//! responses, with the total in `Content-Range`. Anything absent or
//! unparsable means the size is unknown. It never silently becomes 0.

use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_RANGE};

/// Extract the declared body size from response headers.
///
/// `Content-Length` wins; otherwise the total of a `Content-Range` header is
/// used.
///
/// # Example
///
/// ```rust
/// use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH};
/// use streamdl::utils::declared_total;
///
/// let mut headers = HeaderMap::new();
/// assert_eq!(declared_total(&headers), None);
///
/// headers.insert(CONTENT_LENGTH, HeaderValue::from_static("10000"));
/// assert_eq!(declared_total(&headers), Some(10_000));
/// ```
pub fn declared_total(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .or_else(|| {
            headers
                .get(CONTENT_RANGE)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_content_range_total)
        })
}

/// Parse Content-Range header to extract total size.
///
/// Content-Range header format: "bytes start-end/total". An unknown total
/// (`*`) yields `None`.
///
/// # Example
///
/// ```rust
/// use streamdl::utils::parse_content_range_total;
///
/// assert_eq!(parse_content_range_total("bytes 0-1023/2048"), Some(2048));
/// assert_eq!(parse_content_range_total("bytes 0-1023/*"), None);
/// ```
pub fn parse_content_range_total(content_range: &str) -> Option<u64> {
    let (_, total) = content_range.split_once('/')?;
    total.trim().parse::<u64>().ok()
}
