//! Secret lifetimes.

use std::{fmt, time::Duration};

use thiserror::Error;

/// Rejected time-to-live value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("ttl of {hours} hours is not one of the allowed values")]
pub struct TtlError {
    /// Hours that were requested.
    pub hours: u32,
}

/// Time-to-live of a secret.
///
/// Only a fixed set of lifetimes is offered. On the wire the value is the
/// number of hours, with `0` meaning the secret never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Ttl {
    /// Never expires (wire value 0).
    #[default]
    Never,
    /// One hour.
    OneHour,
    /// Three hours.
    ThreeHours,
    /// Six hours.
    SixHours,
    /// Twelve hours.
    TwelveHours,
    /// One day.
    OneDay,
    /// Two days.
    TwoDays,
    /// Five days.
    FiveDays,
    /// One week.
    OneWeek,
}

impl Ttl {
    /// Every allowed lifetime, shortest first with `Never` leading.
    pub const ALL: [Self; 9] = [
        Self::Never,
        Self::OneHour,
        Self::ThreeHours,
        Self::SixHours,
        Self::TwelveHours,
        Self::OneDay,
        Self::TwoDays,
        Self::FiveDays,
        Self::OneWeek,
    ];

    /// Lifetime for a wire value. `None` if `hours` is not in the allowed set.
    pub fn from_hours(hours: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|ttl| ttl.hours() == hours)
    }

    /// Wire value in hours.
    pub fn hours(self) -> u32 {
        match self {
            Self::Never => 0,
            Self::OneHour => 1,
            Self::ThreeHours => 3,
            Self::SixHours => 6,
            Self::TwelveHours => 12,
            Self::OneDay => 24,
            Self::TwoDays => 48,
            Self::FiveDays => 120,
            Self::OneWeek => 168,
        }
    }

    /// Lifetime as a duration. `None` for [`Ttl::Never`].
    pub fn duration(self) -> Option<Duration> {
        match self {
            Self::Never => None,
            other => Some(Duration::from_secs(u64::from(other.hours()) * 3600)),
        }
    }

    /// Next longer lifetime, wrapping back to `Never`.
    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Next shorter lifetime, wrapping to the longest.
    pub fn prev(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Never => "Never expires",
            Self::OneHour => "1 hour",
            Self::ThreeHours => "3 hours",
            Self::SixHours => "6 hours",
            Self::TwelveHours => "12 hours",
            Self::OneDay => "1 day",
            Self::TwoDays => "2 days",
            Self::FiveDays => "5 days",
            Self::OneWeek => "1 week",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

impl TryFrom<u32> for Ttl {
    type Error = TtlError;

    fn try_from(hours: u32) -> Result<Self, Self::Error> {
        Self::from_hours(hours).ok_or(TtlError { hours })
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
