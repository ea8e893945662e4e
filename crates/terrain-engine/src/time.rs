//! Minute-resolution times of day and half-open intervals over them.
//!
//! All bookings live inside a single calendar day, so a time of day is stored as
//! minutes since midnight. Intervals are half-open: `[start, end)` includes its
//! start and excludes its end, so a reservation ending at 10:00 and another
//! starting at 10:00 do not overlap.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, Result};

/// Number of minutes in a day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day with minute resolution, in `00:00..=23:59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight, the first minute of the day.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Whole hour, for constants. Callers must pass an hour below 24.
    pub(crate) const fn at_hour(hour: u16) -> Self {
        TimeOfDay(hour * 60)
    }

    /// Build a time from an hour (0-23) and minute (0-59).
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour >= 24 || minute >= 60 {
            return Err(EngineError::InvalidTime(format!("{}:{:02}", hour, minute)));
        }
        Ok(TimeOfDay((hour * 60 + minute) as u16))
    }

    /// Build a time from minutes since midnight.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes >= MINUTES_PER_DAY {
            return Err(EngineError::InvalidTime(format!(
                "{} minutes is past the end of the day",
                minutes
            )));
        }
        Ok(TimeOfDay(minutes as u16))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // Always in range: the constructors cap the value below 24:00.
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or_default()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = EngineError;

    /// Parse an `HH:MM` string such as `"09:00"` or `"9:30"`.
    fn from_str(s: &str) -> Result<Self> {
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map_err(|e| EngineError::InvalidTime(format!("'{}': {}", s, e)))?;
        TimeOfDay::try_from(time)
    }
}

impl TryFrom<NaiveTime> for TimeOfDay {
    type Error = EngineError;

    fn try_from(time: NaiveTime) -> Result<Self> {
        if time.second() != 0 || time.nanosecond() != 0 {
            return Err(EngineError::InvalidTime(format!(
                "{} is not on a whole minute",
                time
            )));
        }
        TimeOfDay::new(time.hour(), time.minute())
    }
}

impl From<TimeOfDay> for NaiveTime {
    fn from(t: TimeOfDay) -> Self {
        t.to_naive_time()
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A half-open interval `[start, end)` within one day. Always `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    start: TimeOfDay,
    end: TimeOfDay,
}

#[derive(Deserialize)]
struct RawInterval {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = EngineError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        TimeInterval::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Build an interval, rejecting empty or reversed ranges.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self> {
        if start >= end {
            return Err(EngineError::InvalidInterval { start, end });
        }
        Ok(TimeInterval { start, end })
    }

    /// Build the interval starting at `start` and lasting `duration_minutes`.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidDuration` if the duration is zero or the
    /// interval would cross midnight.
    pub fn starting_at(start: TimeOfDay, duration_minutes: u32) -> Result<Self> {
        let end = compute_end_time(start, duration_minutes)?;
        Ok(TimeInterval { start, end })
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes() - self.start.minutes()
    }

    /// Half-open overlap test: `self.start < other.end && other.start < self.end`.
    ///
    /// Adjacent intervals, where one ends exactly when the other starts, do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Minutes shared by both intervals, zero when they do not overlap.
    pub fn overlap_minutes(&self, other: &TimeInterval) -> u32 {
        if !self.overlaps(other) {
            return 0;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        end.minutes() - start.minutes()
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Compute the end of a booking that starts at `start` and lasts `duration_minutes`.
///
/// The raw sum wraps at midnight (23:30 + 60 would be 00:30); such bookings span
/// two days and are rejected rather than wrapped.
///
/// # Errors
/// Returns `EngineError::InvalidDuration` if the duration is zero or the end
/// does not fall strictly after `start` on the same day.
pub fn compute_end_time(start: TimeOfDay, duration_minutes: u32) -> Result<TimeOfDay> {
    if duration_minutes == 0 {
        return Err(EngineError::InvalidDuration(
            "duration must be positive".to_string(),
        ));
    }
    let raw_end = start.minutes() + duration_minutes;
    if raw_end >= MINUTES_PER_DAY {
        return Err(EngineError::InvalidDuration(format!(
            "{} + {} crosses midnight",
            start,
            format_duration(duration_minutes)
        )));
    }
    TimeOfDay::from_minutes(raw_end)
}

/// Render a duration the way the booking screens label it: `30min`, `1h`, `1h30`.
pub fn format_duration(minutes: u32) -> String {
    let (hours, rest) = (minutes / 60, minutes % 60);
    match (hours, rest) {
        (0, m) => format!("{}min", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h{:02}", h, m),
    }
}
