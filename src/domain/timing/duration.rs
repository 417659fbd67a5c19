//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default auto-hide delay (3 seconds)
pub const DEFAULT_AUTO_HIDE_MS: u64 = 3_000;

/// Shortest auto-hide delay accepted
pub const MIN_AUTO_HIDE_MS: u64 = 1_000;

/// Longest auto-hide delay accepted
pub const MAX_AUTO_HIDE_MS: u64 = 10_000;

/// Value object representing a time duration.
/// Immutable and validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Default auto-hide delay
    pub const fn default_auto_hide() -> Self {
        Self::from_millis(DEFAULT_AUTO_HIDE_MS)
    }

    /// Clamp into the accepted auto-hide range
    pub fn clamp_auto_hide(self) -> Self {
        Self::from_millis(self.milliseconds.clamp(MIN_AUTO_HIDE_MS, MAX_AUTO_HIDE_MS))
    }

    /// Get duration in seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a duration string into a Duration value object.
    /// Supported formats: "500ms", "3s", "1m", "1m30s"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let err = || DurationParseError {
            input: s.to_string(),
        };

        if let Some(ms) = input.strip_suffix("ms") {
            let ms: u64 = ms.parse().map_err(|_| err())?;
            if ms == 0 {
                return Err(err());
            }
            return Ok(Self::from_millis(ms));
        }

        let mut minutes: u64 = 0;
        let mut seconds: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
            } else if ch == 'm' && !current_num.is_empty() {
                minutes = current_num.parse().map_err(|_| err())?;
                current_num.clear();
                found_any = true;
            } else if ch == 's' && !current_num.is_empty() {
                seconds = current_num.parse().map_err(|_| err())?;
                current_num.clear();
                found_any = true;
            } else {
                return Err(err());
            }
        }

        // Leftover digits without a unit
        if !current_num.is_empty() || !found_any {
            return Err(err());
        }

        let total_ms = (minutes * 60 + seconds) * 1000;
        if total_ms == 0 {
            return Err(err());
        }

        Ok(Self {
            milliseconds: total_ms,
        })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.milliseconds % 1000 != 0 {
            return write!(f, "{}ms", self.milliseconds);
        }

        let total_secs = self.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_auto_hide()
    }
}
