//! Direct-link fallback.
//!
//! When streaming fails the downloader hands the original URL, together with
//! the file name it would have used, to a [`Fallback`]. The fallback is fire
//! and forget: whatever it does, its own failure is never reported back.
//!
//! Any `Fn(&Url, &str)` closure is a [`Fallback`]:
//!
//! ```rust
//! use streamdl::fallback::Fallback;
//! use reqwest::Url;
//!
//! let fallback = |url: &Url, hint: &str| eprintln!("open {} and save it as {}", url, hint);
//! let url = Url::parse("https://cdn.example.com/a.mp4").unwrap();
//! fallback.navigate(&url, "a.mp4");
//! ```

use reqwest::Url;
use std::io::Write;
use tracing::warn;

/// Degraded download strategy used when streaming is unavailable.
pub trait Fallback: Send + Sync {
    /// Point the user at `url`, suggesting `file_name_hint` as the name.
    fn navigate(&self, url: &Url, file_name_hint: &str);
}

impl<F> Fallback for F
where
    F: Fn(&Url, &str) + Send + Sync,
{
    fn navigate(&self, url: &Url, file_name_hint: &str) {
        self(url, file_name_hint)
    }
}

/// Prints the direct link so the user can fetch it themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectLinkNotice;

impl Fallback for DirectLinkNotice {
    fn navigate(&self, url: &Url, file_name_hint: &str) {
        warn!(%url, file_name_hint, "Streaming failed, falling back to the direct link");
        let _ = writeln!(
            std::io::stderr(),
            "{} {} (save as {})",
            console::style("Direct link:").yellow().bold(),
            url,
            file_name_hint
        );
    }
}
