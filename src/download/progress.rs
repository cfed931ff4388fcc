//! Transfer progress reported while a body is being read.

use std::fmt;

/// Completion ratio of a transfer.
///
/// A percentage is only known when the server declared the body size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Percent {
    /// Whole percent, `0..=100`.
    Known(u8),
    /// The total size is unknown.
    Indeterminate,
}

impl Percent {
    /// Compute `floor(received * 100 / total)`, clamped to 100.
    ///
    /// An empty declared body counts as complete.
    pub fn of(received: u64, total: Option<u64>) -> Self {
        match total {
            None => Percent::Indeterminate,
            Some(0) => Percent::Known(100),
            Some(total) => {
                let ratio = (received as u128 * 100) / total as u128;
                Percent::Known(ratio.min(100) as u8)
            }
        }
    }

    /// The numeric value, if known.
    pub fn value(self) -> Option<u8> {
        match self {
            Percent::Known(p) => Some(p),
            Percent::Indeterminate => None,
        }
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Percent::Known(p) => write!(f, "{}%", p),
            Percent::Indeterminate => f.write_str("indeterminate"),
        }
    }
}

/// Snapshot handed to the progress callback after each chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Bytes received so far.
    pub received_bytes: u64,
    /// Declared body size, if any.
    pub total_bytes: Option<u64>,
    /// Derived completion ratio.
    pub percent: Percent,
}

impl DownloadProgress {
    pub fn new(received_bytes: u64, total_bytes: Option<u64>) -> Self {
        Self {
            received_bytes,
            total_bytes,
            percent: Percent::of(received_bytes, total_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_floors() {
        assert_eq!(Percent::of(1999, Some(10_000)), Percent::Known(19));
        assert_eq!(Percent::of(2000, Some(10_000)), Percent::Known(20));
        assert_eq!(Percent::of(9_999, Some(10_000)), Percent::Known(99));
        assert_eq!(Percent::of(10_000, Some(10_000)), Percent::Known(100));
    }

    #[test]
    fn test_percent_unknown_total() {
        assert_eq!(Percent::of(4096, None), Percent::Indeterminate);
        assert_eq!(Percent::of(4096, None).value(), None);
    }

    #[test]
    fn test_percent_overrun_is_clamped() {
        assert_eq!(Percent::of(12_000, Some(10_000)), Percent::Known(100));
    }

    #[test]
    fn test_percent_empty_body() {
        assert_eq!(Percent::of(0, Some(0)), Percent::Known(100));
    }

    #[test]
    fn test_percent_large_values_do_not_overflow() {
        assert_eq!(Percent::of(u64::MAX / 2, Some(u64::MAX)), Percent::Known(49));
    }

    #[test]
    fn test_display() {
        assert_eq!(Percent::Known(42).to_string(), "42%");
        assert_eq!(Percent::Indeterminate.to_string(), "indeterminate");
        let progress = DownloadProgress::new(500, Some(1000));
        assert_eq!(progress.percent, Percent::Known(50));
    }
}
