//! Progress bar display management and coordination.
//!
//! [`ProgressDisplay`] owns the [`MultiProgress`] used by a batch of
//! downloads: a main bar counting finished items, and one
//! [`ProgressPresenter`] per in-flight download.
//!
//! ```rust
//! use streamdl::progress::{ProgressDisplay, StyleOptions};
//! use std::time::Duration;
//!
//! let display = ProgressDisplay::new(StyleOptions::hidden(), 3, Duration::ZERO);
//! let mut presenter = display.create_presenter("a.jpg");
//! presenter.start();
//! display.increment_main();
//! display.finish();
//! ```

use super::presenter::ProgressPresenter;
use crate::progress::StyleOptions;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};
use std::sync::Arc;
use std::time::Duration;

/// Progress display manager that coordinates multiple progress bars.
pub struct ProgressDisplay {
    /// The multi-progress instance for coordinating multiple progress bars.
    multi: Arc<MultiProgress>,
    /// The main progress bar for overall progress.
    main: Arc<ProgressBar>,
    /// Style options for progress bars.
    style_options: StyleOptions,
    /// Whether to show the main progress bar.
    show_main_progress: bool,
    /// How long finished children stay visible.
    grace: Duration,
}

impl ProgressDisplay {
    /// Create a new progress display manager.
    ///
    /// The main bar is only drawn for batches of more than one download.
    pub fn new(style_options: StyleOptions, total_downloads: usize, grace: Duration) -> Self {
        let multi = match style_options.is_enabled() {
            true => Arc::new(MultiProgress::new()),
            false => Arc::new(MultiProgress::with_draw_target(ProgressDrawTarget::hidden())),
        };

        let show_main_progress = total_downloads > 1 && style_options.main().is_enabled();

        let main = if show_main_progress {
            Arc::new(
                multi.add(
                    style_options
                        .main()
                        .clone()
                        .to_progress_bar(total_downloads as u64),
                ),
            )
        } else {
            // Create a completely hidden progress bar that's not added to MultiProgress
            Arc::new(ProgressBar::hidden())
        };

        if show_main_progress {
            main.tick();
        }

        Self {
            multi,
            main,
            style_options,
            show_main_progress,
            grace,
        }
    }

    /// Get the main progress bar.
    pub fn main(&self) -> Arc<ProgressBar> {
        self.main.clone()
    }

    /// Create a presenter for one download, drawn above the main bar.
    pub fn create_presenter(&self, label: &str) -> ProgressPresenter {
        let child = self.style_options.child();
        let bar = if child.is_enabled() || self.style_options.spinner().is_enabled() {
            let style = child.clone().to_progress_style();
            self.multi
                .insert_from_back(1, ProgressBar::new(100).with_style(style))
        } else {
            ProgressBar::hidden()
        };
        ProgressPresenter::new(bar, self.style_options.clone(), label, self.grace)
    }

    /// Increment the main progress bar by one.
    pub fn increment_main(&self) {
        self.main.inc(1);
    }

    /// Finish the progress display, clearing or keeping bars based on configuration.
    pub fn finish(self) {
        if self.show_main_progress {
            if self.style_options.main().clear {
                self.main.finish_and_clear();
            } else {
                self.main.finish();
            }
        }
    }
}
