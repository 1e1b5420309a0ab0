use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Wall-clock time of day as minutes since midnight.
///
/// Parsed from and displayed as zero-padded 24-hour `HH:MM`. `24:00` is
/// accepted so that a window may end exactly at midnight.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, Hash, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Time(pub u32);

impl Time {
    pub const MIDNIGHT: Time = Time(0);
    pub const END_OF_DAY: Time = Time(24 * 60);

    pub fn from_hm(hours: u32, minutes: u32) -> Result<Time> {
        if minutes >= 60 || hours > 24 || (hours == 24 && minutes > 0) {
            return Err(Error::MalformedTime(format!("{}:{:02}", hours, minutes)));
        }
        Ok(Time(hours * 60 + minutes))
    }

    pub fn hours(&self) -> u32 {
        self.0 / 60
    }

    pub fn minutes(&self) -> u32 {
        self.0 % 60
    }

    /// `self` moved `minutes` later, or `None` past the end of the day.
    pub fn checked_add(self, minutes: u32) -> Option<Time> {
        self.0
            .checked_add(minutes)
            .filter(|m| *m <= Self::END_OF_DAY.0)
            .map(Time)
    }

    /// Minutes from `self` until `later`, zero if `later` is not after `self`.
    pub fn minutes_until(&self, later: Time) -> u32 {
        later.0.saturating_sub(self.0)
    }

    /// 12-hour label, e.g. `9:00 AM`.
    pub fn to_12h(&self) -> String {
        let hours = self.hours() % 24;
        let period = if hours >= 12 { "PM" } else { "AM" };
        let display = match hours {
            0 => 12,
            h if h > 12 => h - 12,
            h => h,
        };
        format!("{}:{:02} {}", display, self.minutes(), period)
    }

    pub(crate) fn is_overlapping(time: &(Time, Time), window: &(Time, Time)) -> bool {
        time.0 < window.1 && time.1 > window.0
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}

impl FromStr for Time {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(malformed)?;
        let digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(h) || !digits(m) {
            return Err(malformed());
        }
        let hours = h.parse::<u32>().map_err(|_| malformed())?;
        let minutes = m.parse::<u32>().map_err(|_| malformed())?;
        Time::from_hm(hours, minutes).map_err(|_| malformed())
    }
}

impl TryFrom<String> for Time {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Time> for String {
    fn from(value: Time) -> Self {
        value.to_string()
    }
}

impl Add<u32> for Time {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        Time(self.0 + rhs)
    }
}

impl AddAssign<u32> for Time {
    fn add_assign(&mut self, rhs: u32) {
        self.0 += rhs;
    }
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Time,
    pub end: Time,
}

impl TimeRange {
    pub fn new(start: Time, end: Time) -> Result<TimeRange> {
        if start >= end {
            return Err(Error::InvalidInterval {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(TimeRange { start, end })
    }

    pub fn from_duration(start: Time, minutes: u32) -> Result<TimeRange> {
        let end = start.checked_add(minutes).ok_or_else(|| Error::InvalidInterval {
            start: start.to_string(),
            end: format!("+{}m", minutes),
        })?;
        TimeRange::new(start, end)
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        Time::is_overlapping(&(self.start, self.end), &(other.start, other.end))
    }

    pub fn contains(&self, t: Time) -> bool {
        point_in_interval(t, self.start, self.end)
    }

    pub fn minutes(&self) -> u32 {
        self.start.minutes_until(self.end)
    }

    pub fn hours(&self) -> f64 {
        self.minutes() as f64 / 60.0
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

pub fn overlaps(a_start: Time, a_end: Time, b_start: Time, b_end: Time) -> bool {
    Time::is_overlapping(&(a_start, a_end), &(b_start, b_end))
}

pub fn point_in_interval(t: Time, start: Time, end: Time) -> bool {
    start <= t && t < end
}
