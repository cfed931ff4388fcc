//! Progress bar styling options and templates.
//!
//! A download is drawn either as a percentage bar, when its size is known,
//! or as a spinner with a byte counter, when it is not. Batches get an extra
//! main bar counting finished items.
//!
//! # Examples
//!
//! ```rust
//! use streamdl::progress::{ProgressBarOpts, StyleOptions};
//!
//! let mut style = StyleOptions::default();
//! style.set_main(ProgressBarOpts::hidden());
//! assert!(style.is_enabled());
//!
//! let quiet = StyleOptions::hidden();
//! assert!(!quiet.is_enabled());
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

/// Define the downloader style options.
///
/// By default, the main progress bar will stay on the screen upon completion,
/// but the child ones will be cleared once complete.
#[derive(Debug, Clone)]
pub struct StyleOptions {
    /// Style options for the main progress bar.
    pub(crate) main: ProgressBarOpts,
    /// Style options for downloads of known size.
    pub(crate) child: ProgressBarOpts,
    /// Style options for downloads of unknown size.
    pub(crate) spinner: ProgressBarOpts,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            main: ProgressBarOpts {
                template: Some(ProgressBarOpts::TEMPLATE_BAR_WITH_POSITION.into()),
                progress_chars: Some(ProgressBarOpts::CHARS_FINE.into()),
                enabled: true,
                clear: false,
            },
            child: ProgressBarOpts::with_percent_style(),
            spinner: ProgressBarOpts::with_spinner_style(),
        }
    }
}

impl StyleOptions {
    /// Create new [`StyleOptions`].
    pub fn new(main: ProgressBarOpts, child: ProgressBarOpts, spinner: ProgressBarOpts) -> Self {
        Self {
            main,
            child,
            spinner,
        }
    }

    /// Style options with every bar hidden.
    pub fn hidden() -> Self {
        Self::new(
            ProgressBarOpts::hidden(),
            ProgressBarOpts::hidden(),
            ProgressBarOpts::hidden(),
        )
    }

    /// Set the options for the main progress bar.
    pub fn set_main(&mut self, main: ProgressBarOpts) {
        self.main = main;
    }

    /// Set the options for the child progress bar.
    pub fn set_child(&mut self, child: ProgressBarOpts) {
        self.child = child;
    }

    /// Set the options for the indeterminate spinner.
    pub fn set_spinner(&mut self, spinner: ProgressBarOpts) {
        self.spinner = spinner;
    }

    /// Return `false` if no bar is enabled.
    pub fn is_enabled(&self) -> bool {
        self.main.enabled || self.child.enabled || self.spinner.enabled
    }

    /// Get a reference to the main progress bar options.
    pub fn main(&self) -> &ProgressBarOpts {
        &self.main
    }

    /// Get a reference to the child progress bar options.
    pub fn child(&self) -> &ProgressBarOpts {
        &self.child
    }

    /// Get a reference to the spinner options.
    pub fn spinner(&self) -> &ProgressBarOpts {
        &self.spinner
    }
}

/// Define the options for a progress bar.
#[derive(Debug, Clone)]
pub struct ProgressBarOpts {
    /// Progress bar template string.
    template: Option<String>,
    /// Progression characters set.
    ///
    /// There must be at least 3 characters for the following states:
    /// "filled", "current", and "to do".
    progress_chars: Option<String>,
    /// Enable or disable the progress bar.
    pub(crate) enabled: bool,
    /// Clear the progress bar once completed.
    pub(crate) clear: bool,
}

impl Default for ProgressBarOpts {
    fn default() -> Self {
        Self {
            template: None,
            progress_chars: None,
            enabled: true,
            clear: true,
        }
    }
}

impl ProgressBarOpts {
    /// Template representing the bar and its position.
    ///
    ///`███████████████████████████████████████ 11/12 (99%) eta 00:00:02`
    pub const TEMPLATE_BAR_WITH_POSITION: &'static str =
        "{bar:40.blue} {pos:>}/{len} ({percent}%) eta {eta_precise:.blue}";
    /// Template for a single download of known size. The position is the percent.
    ///
    /// `promo_verao.jpg  ━━━━━━━━━━━━━━━━╾───────────────────────  40% `
    pub const TEMPLATE_PERCENT: &'static str =
        "{prefix:<24!} {bar:40.green/black} {pos:>3}% {msg}";
    /// Template for a single download of unknown size.
    ///
    /// `video_pack.mp4   ⠙ 3.20 MiB received`
    pub const TEMPLATE_SPINNER: &'static str = "{prefix:<24!} {spinner:.green} {msg}";
    /// Use fine blocks as progress characters: `"█▉▊▋▌▍▎▏  "`.
    pub const CHARS_FINE: &'static str = "█▉▊▋▌▍▎▏  ";
    /// Use a line as progress characters: `"━╾─"`.
    pub const CHARS_LINE: &'static str = "━╾╴─";
    /// Use rough blocks as progress characters: `"█  "`.
    pub const CHARS_ROUGH: &'static str = "█  ";

    /// Create a new [`ProgressBarOpts`].
    pub fn new(
        template: Option<String>,
        progress_chars: Option<String>,
        enabled: bool,
        clear: bool,
    ) -> Self {
        Self {
            template,
            progress_chars,
            enabled,
            clear,
        }
    }

    /// Create a [`ProgressStyle`] based on the provided options.
    pub fn to_progress_style(self) -> ProgressStyle {
        let mut style = ProgressStyle::default_bar();
        if let Some(template) = self.template {
            style = match style.clone().template(&template) {
                Ok(s) => s,
                Err(e) => {
                    warn!("Ignoring invalid progress template {:?}: {}", template, e);
                    style
                }
            };
        }
        if let Some(progress_chars) = self.progress_chars {
            style = style.progress_chars(&progress_chars);
        }
        style
    }

    /// Create a spinner [`ProgressStyle`] based on the provided options.
    pub fn to_spinner_style(self) -> ProgressStyle {
        let style = ProgressStyle::default_spinner();
        match self.template {
            Some(template) => match style.clone().template(&template) {
                Ok(s) => s,
                Err(e) => {
                    warn!("Ignoring invalid spinner template {:?}: {}", template, e);
                    style
                }
            },
            None => style,
        }
    }

    /// Create a [`ProgressBar`] based on the provided options.
    pub fn to_progress_bar(self, len: u64) -> ProgressBar {
        // Return a hidden Progress bar if we disabled it.
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let style = self.to_progress_style();
        ProgressBar::new(len).with_style(style)
    }

    /// Options for a single download drawn as a percentage bar.
    pub fn with_percent_style() -> Self {
        Self {
            template: Some(ProgressBarOpts::TEMPLATE_PERCENT.into()),
            progress_chars: Some(ProgressBarOpts::CHARS_LINE.into()),
            enabled: true,
            clear: true,
        }
    }

    /// Options for a single download of unknown size.
    pub fn with_spinner_style() -> Self {
        Self {
            template: Some(ProgressBarOpts::TEMPLATE_SPINNER.into()),
            progress_chars: None,
            enabled: true,
            clear: true,
        }
    }

    /// Set to `true` to clear the progress bar upon completion.
    pub fn set_clear(&mut self, clear: bool) {
        self.clear = clear;
    }

    /// Whether the bar is drawn at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Create a new [`ProgressBarOpts`] which hides the progress bars.
    pub fn hidden() -> Self {
        Self {
            enabled: false,
            ..ProgressBarOpts::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_opts_give_hidden_bar() {
        let pb = ProgressBarOpts::hidden().to_progress_bar(100);
        assert!(pb.is_hidden());
    }

    #[test]
    fn test_invalid_template_falls_back() {
        let opts = ProgressBarOpts::new(Some("{bar:40.nocolor".into()), None, true, true);
        // Must not panic.
        let _ = opts.clone().to_progress_style();
        let _ = opts.to_spinner_style();
    }
}
