//! Single-download progress rendering.
//!
//! A [`ProgressPresenter`] subscribes to the progress callback of one
//! download and draws it:
//!
//! - 0% as soon as the download starts;
//! - the last known percent, never moving backwards;
//! - a spinner with a byte counter, distinct from 0%, when the size is
//!   unknown;
//! - the final state once the outcome is known, cleared after a grace delay.
//!
//! The drawn state is tracked in a [`PresenterState`] value so it can be
//! inspected without a terminal.
//!
//! ```rust
//! use streamdl::download::{DownloadProgress, Percent};
//! use streamdl::progress::{PresenterState, ProgressPresenter};
//!
//! let mut presenter = ProgressPresenter::hidden("a.jpg");
//! presenter.start();
//! presenter.update(&DownloadProgress::new(500, Some(1000)));
//! presenter.update(&DownloadProgress::new(400, Some(1000)));
//! assert_eq!(
//!     presenter.state(),
//!     &PresenterState::Running { percent: Percent::Known(50), received_bytes: 500 }
//! );
//! ```

use super::style::StyleOptions;
use crate::download::{DownloadOutcome, DownloadProgress, Percent};

use indicatif::{HumanBytes, ProgressBar};
use std::fmt;
use std::time::Duration;

/// How long the final state stays visible by default.
pub const DEFAULT_GRACE_DELAY: Duration = Duration::from_millis(1500);

/// What a presenter currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterState {
    /// Nothing is shown.
    Idle,
    /// A download is in flight.
    Running {
        percent: Percent,
        received_bytes: u64,
    },
    /// The outcome is shown until the grace delay elapses.
    Finished {
        completed: bool,
        percent: Percent,
        received_bytes: u64,
    },
}

/// Draws the progress of one download.
pub struct ProgressPresenter {
    state: PresenterState,
    bar: ProgressBar,
    style_options: StyleOptions,
    label: String,
    grace: Duration,
}

impl fmt::Debug for ProgressPresenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressPresenter")
            .field("state", &self.state)
            .field("label", &self.label)
            .field("grace", &self.grace)
            .finish()
    }
}

impl ProgressPresenter {
    /// Create a presenter drawing on `bar`.
    ///
    /// The bar is usually obtained from
    /// [`ProgressDisplay::create_presenter`](super::ProgressDisplay::create_presenter).
    pub fn new(
        bar: ProgressBar,
        style_options: StyleOptions,
        label: &str,
        grace: Duration,
    ) -> Self {
        bar.set_prefix(label.to_string());
        Self {
            state: PresenterState::Idle,
            bar,
            style_options,
            label: label.to_string(),
            grace,
        }
    }

    /// Create a presenter that draws nothing and clears immediately.
    pub fn hidden(label: &str) -> Self {
        Self::new(
            ProgressBar::hidden(),
            StyleOptions::hidden(),
            label,
            Duration::ZERO,
        )
    }

    /// Gets the current state.
    pub fn state(&self) -> &PresenterState {
        &self.state
    }

    /// Gets the label drawn next to the bar.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Show 0% for a freshly started download.
    pub fn start(&mut self) {
        self.state = PresenterState::Running {
            percent: Percent::Known(0),
            received_bytes: 0,
        };
        self.show_percent_bar();
        self.bar.set_position(0);
    }

    /// Apply a progress snapshot.
    ///
    /// Snapshots arriving after [`finish`](Self::finish) are ignored.
    pub fn update(&mut self, progress: &DownloadProgress) {
        let (last_percent, last_received) = match self.state {
            PresenterState::Idle => (Percent::Known(0), 0),
            PresenterState::Running {
                percent,
                received_bytes,
            } => (percent, received_bytes),
            PresenterState::Finished { .. } => return,
        };

        let received_bytes = last_received.max(progress.received_bytes);
        let percent = match (last_percent, progress.percent) {
            (_, Percent::Indeterminate) => Percent::Indeterminate,
            (Percent::Known(last), Percent::Known(now)) => Percent::Known(last.max(now)),
            (Percent::Indeterminate, known) => known,
        };

        if percent == Percent::Indeterminate && last_percent != Percent::Indeterminate {
            self.show_spinner();
        } else if percent != Percent::Indeterminate && last_percent == Percent::Indeterminate {
            self.show_percent_bar();
        }

        match percent {
            Percent::Known(p) => self.bar.set_position(p as u64),
            Percent::Indeterminate => {
                self.bar
                    .set_message(format!("{} received", HumanBytes(received_bytes)));
                self.bar.tick();
            }
        }

        self.state = PresenterState::Running {
            percent,
            received_bytes,
        };
    }

    /// Show the outcome of the download.
    pub fn finish(&mut self, outcome: &DownloadOutcome) {
        let (percent, received_bytes) = match self.state {
            PresenterState::Running {
                percent,
                received_bytes,
            } => (percent, received_bytes),
            PresenterState::Idle => (Percent::Known(0), 0),
            PresenterState::Finished { .. } => return,
        };

        let completed = outcome.is_completed();
        match outcome {
            DownloadOutcome::Completed { final_bytes, .. } => {
                if percent != Percent::Indeterminate {
                    self.bar.set_position(100);
                }
                self.bar
                    .finish_with_message(format!("done, {}", HumanBytes(*final_bytes)));
            }
            DownloadOutcome::Failed { reason, .. } => {
                self.bar.abandon_with_message(reason.to_string());
            }
        }

        self.state = PresenterState::Finished {
            completed,
            percent,
            received_bytes,
        };
    }

    /// Wait for the grace delay, then clear the bar and go back to idle.
    pub async fn settle(&mut self) {
        if !self.grace.is_zero() {
            tokio::time::sleep(self.grace).await;
        }
        if self.style_options.child().clear {
            self.bar.finish_and_clear();
        }
        self.state = PresenterState::Idle;
    }

    fn show_percent_bar(&self) {
        if self.style_options.child().is_enabled() {
            self.bar
                .set_style(self.style_options.child().clone().to_progress_style());
        }
        self.bar.set_length(100);
    }

    fn show_spinner(&self) {
        if self.style_options.spinner().is_enabled() {
            self.bar
                .set_style(self.style_options.spinner().clone().to_spinner_style());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::FailureReason;
    use std::path::PathBuf;

    fn running(percent: Percent, received_bytes: u64) -> PresenterState {
        PresenterState::Running {
            percent,
            received_bytes,
        }
    }

    #[test]
    fn test_start_shows_zero_percent() {
        let mut presenter = ProgressPresenter::hidden("a.jpg");
        assert_eq!(presenter.state(), &PresenterState::Idle);
        presenter.start();
        assert_eq!(presenter.state(), &running(Percent::Known(0), 0));
    }

    #[test]
    fn test_percent_never_regresses() {
        let mut presenter = ProgressPresenter::hidden("a.jpg");
        presenter.start();
        presenter.update(&DownloadProgress::new(600, Some(1000)));
        presenter.update(&DownloadProgress::new(300, Some(1000)));
        assert_eq!(presenter.state(), &running(Percent::Known(60), 600));
    }

    #[test]
    fn test_indeterminate_is_distinct_from_zero() {
        let mut presenter = ProgressPresenter::hidden("a.mp4");
        presenter.start();
        presenter.update(&DownloadProgress::new(0, None));
        assert_eq!(presenter.state(), &running(Percent::Indeterminate, 0));
        assert_ne!(presenter.state(), &running(Percent::Known(0), 0));
    }

    #[test]
    fn test_updates_after_finish_are_ignored() {
        let mut presenter = ProgressPresenter::hidden("a.jpg");
        presenter.start();
        presenter.update(&DownloadProgress::new(500, Some(1000)));
        presenter.finish(&DownloadOutcome::failed(
            FailureReason::PartialTransfer { received_bytes: 500 },
            true,
        ));
        presenter.update(&DownloadProgress::new(900, Some(1000)));

        assert_eq!(
            presenter.state(),
            &PresenterState::Finished {
                completed: false,
                percent: Percent::Known(50),
                received_bytes: 500,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_waits_for_grace_delay() {
        let mut presenter = ProgressPresenter::new(
            ProgressBar::hidden(),
            StyleOptions::hidden(),
            "a.jpg",
            Duration::from_secs(2),
        );
        presenter.start();
        presenter.finish(&DownloadOutcome::Completed {
            final_bytes: 10,
            saved_as: PathBuf::from("a.jpg"),
        });

        let before = tokio::time::Instant::now();
        presenter.settle().await;
        assert!(before.elapsed() >= Duration::from_secs(2));
        assert_eq!(presenter.state(), &PresenterState::Idle);
    }
}
