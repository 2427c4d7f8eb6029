//! # Generation Options
//!
//! [`Options`] holds the primitive inputs of a generation run: the number of rings and
//! competitors, the match duration, the time window and the bounds for the group size search.
//! Options are validated once by [`Options::validate`] before any generation work starts.
#[cfg(feature = "serde")]
mod serde_impl;

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::capacity::{format_minutes, Capacity};
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_RINGS: u32 = 4;
pub const DEFAULT_COMPETITORS: u32 = 32;
pub const DEFAULT_MATCH_MINUTES: u32 = 4;
pub const DEFAULT_MIN_GROUP_SIZE: u32 = 4;
pub const DEFAULT_MAX_GROUP_SIZE: u32 = 6;

/// The highest number of rings accepted by [`Options::validate`].
pub const MAX_RINGS: u32 = 256;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseTimeError {
    #[error("missing ':' separator in {0:?}")]
    MissingSeparator(String),
    #[error("invalid hours in {0:?}")]
    InvalidHours(String),
    #[error("invalid minutes in {0:?}")]
    InvalidMinutes(String),
}

/// A time of day with minute precision, written as `HH:MM`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    /// Creates a new `TimeOfDay`. Returns `None` if `hours` or `minutes` are out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ringplan_core::TimeOfDay;
    /// assert_eq!(TimeOfDay::new(9, 30).unwrap().minutes(), 570);
    /// assert!(TimeOfDay::new(24, 0).is_none());
    /// ```
    #[inline]
    pub const fn new(hours: u32, minutes: u32) -> Option<Self> {
        if hours < 24 && minutes < 60 {
            Some(Self(hours * 60 + minutes))
        } else {
            None
        }
    }

    /// Returns the number of minutes since midnight.
    #[inline]
    pub const fn minutes(self) -> u32 {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (hours, minutes) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| ParseTimeError::MissingSeparator(s.to_owned()))?;

        let hours = parse_component(hours, 24)
            .ok_or_else(|| ParseTimeError::InvalidHours(s.to_owned()))?;
        let minutes = parse_component(minutes, 60)
            .ok_or_else(|| ParseTimeError::InvalidMinutes(s.to_owned()))?;

        Ok(Self(hours * 60 + minutes))
    }
}

fn parse_component(s: &str, limit: u32) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    s.parse().ok().filter(|v| *v < limit)
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&format_minutes(self.0))
    }
}

/// The inputs of a generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    pub rings: u32,
    pub competitors: u32,
    pub match_minutes: u32,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub min_group_size: u32,
    pub max_group_size: u32,
}

impl Options {
    /// Creates a new [`Builder`] starting from the default options.
    #[inline]
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if the end time is not after the start time, fewer than 2
    /// competitors are given, the match duration is 0 or longer than the time window, the ring
    /// count is 0 or above [`MAX_RINGS`], or the group size bounds are empty.
    pub fn validate(&self) -> Result<()> {
        if self.end <= self.start {
            return Err(Error::InvalidTimeWindow {
                start: self.start,
                end: self.end,
            });
        }

        if self.competitors < 2 {
            return Err(Error::NotEnoughCompetitors(self.competitors));
        }

        if self.match_minutes == 0 {
            return Err(Error::InvalidMatchDuration);
        }

        let total_minutes = self.end.minutes() - self.start.minutes();
        if self.match_minutes > total_minutes {
            return Err(Error::MatchLongerThanWindow {
                match_minutes: self.match_minutes,
                total_minutes,
            });
        }

        if self.rings == 0 || self.rings > MAX_RINGS {
            return Err(Error::InvalidRingCount(self.rings));
        }

        if self.min_group_size < 2 || self.min_group_size > self.max_group_size {
            return Err(Error::InvalidGroupSizeBounds {
                min: self.min_group_size,
                max: self.max_group_size,
            });
        }

        Ok(())
    }

    /// Computes the [`Capacity`] of the time window.
    #[inline]
    pub fn capacity(&self) -> Capacity {
        Capacity::compute(self.rings, self.start, self.end, self.match_minutes)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rings: DEFAULT_RINGS,
            competitors: DEFAULT_COMPETITORS,
            match_minutes: DEFAULT_MATCH_MINUTES,
            start: TimeOfDay(9 * 60),
            end: TimeOfDay(11 * 60),
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            max_group_size: DEFAULT_MAX_GROUP_SIZE,
        }
    }
}

/// A builder for [`Options`].
#[derive(Clone, Debug, Default)]
pub struct Builder {
    options: Options,
}

impl Builder {
    pub fn rings(mut self, rings: u32) -> Self {
        self.options.rings = rings;
        self
    }

    pub fn competitors(mut self, competitors: u32) -> Self {
        self.options.competitors = competitors;
        self
    }

    pub fn match_minutes(mut self, minutes: u32) -> Self {
        self.options.match_minutes = minutes;
        self
    }

    pub fn window(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.options.start = start;
        self.options.end = end;
        self
    }

    pub fn group_sizes(mut self, min: u32, max: u32) -> Self {
        self.options.min_group_size = min;
        self.options.max_group_size = max;
        self
    }

    #[inline]
    pub fn build(self) -> Options {
        self.options
    }
}
