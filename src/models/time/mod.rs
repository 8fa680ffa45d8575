// Time-of-day model
// Zero-padded HH:MM values measured in minutes since midnight

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MINUTES_PER_HOUR: u16 = 60;
pub const MINUTES_PER_DAY: u16 = 24 * MINUTES_PER_HOUR;

/// A wall-clock time with minute precision.
///
/// Ordering matches the lexicographic ordering of the zero-padded `HH:MM`
/// form, so comparing two values is the same as comparing their strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minutes: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("time '{0}' is not in HH:MM form")]
    Format(String),
    #[error("time '{0}' is out of range")]
    OutOfRange(String),
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { minutes: 0 };

    /// Build from hour and minute. Returns `None` past 23:59.
    pub const fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self {
            minutes: hour * MINUTES_PER_HOUR + minute,
        })
    }

    /// Build from minutes since midnight, saturating into `00:00..=23:59`.
    pub fn from_minutes(minutes: i32) -> Self {
        Self {
            minutes: minutes.clamp(0, MINUTES_PER_DAY as i32 - 1) as u16,
        }
    }

    pub const fn minutes(self) -> u16 {
        self.minutes
    }

    pub const fn hour(self) -> u16 {
        self.minutes / MINUTES_PER_HOUR
    }

    pub const fn minute(self) -> u16 {
        self.minutes % MINUTES_PER_HOUR
    }

    /// Shift by a signed number of minutes, saturating at the day edges.
    pub fn offset(self, delta: i32) -> Self {
        Self::from_minutes(self.minutes as i32 + delta)
    }

    /// Minutes from `self` until `later` (negative if `later` is earlier).
    pub fn minutes_until(self, later: TimeOfDay) -> i32 {
        later.minutes as i32 - self.minutes as i32
    }

    /// Parse an `HH:MM` string the forgiving way: a missing or non-numeric
    /// component counts as zero and the result is saturated into the day.
    ///
    /// `"9:5"` is 09:05, `"abc"` is 00:00, `"10"` is 10:00.
    pub fn parse_lenient(value: &str) -> Self {
        let mut parts = value.trim().splitn(2, ':');
        let hour = parts
            .next()
            .and_then(|h| h.trim().parse::<i32>().ok())
            .unwrap_or(0);
        let minute = parts
            .next()
            .and_then(|m| m.trim().parse::<i32>().ok())
            .unwrap_or(0);
        Self::from_minutes(hour * MINUTES_PER_HOUR as i32 + minute)
    }

    pub fn from_chrono(time: chrono::NaiveTime) -> Self {
        use chrono::Timelike;
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }

    /// 12-hour label such as `9:05 AM`.
    pub fn format_12h(self) -> String {
        let hour = self.hour();
        let suffix = if hour < 12 { "AM" } else { "PM" };
        let display = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", display, self.minute(), suffix)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = value
            .split_once(':')
            .ok_or_else(|| TimeParseError::Format(value.to_string()))?;
        let hour: u16 = hour
            .parse()
            .map_err(|_| TimeParseError::Format(value.to_string()))?;
        let minute: u16 = minute
            .parse()
            .map_err(|_| TimeParseError::Format(value.to_string()))?;
        Self::new(hour, minute).ok_or_else(|| TimeParseError::OutOfRange(value.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Shorthand for literal times in code and tests. Panics on invalid input,
/// so only use it with constants.
#[macro_export]
macro_rules! hm {
    ($h:expr, $m:expr) => {
        match $crate::models::time::TimeOfDay::new($h, $m) {
            Some(t) => t,
            None => panic!("invalid time literal"),
        }
    };
}
