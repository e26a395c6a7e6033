//! Day-of-week and time-of-day primitives.
//!
//! Every interval the engine works with is scoped to a weekday and a pair of
//! wall-clock times within a single timezone. Intervals never wrap past
//! 23:59; a range that crosses midnight is represented as two intervals.

use std::fmt;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A 24-hour wall-clock time with minute precision.
///
/// Serialized as a `[hour, minute]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// 00:00, the first minute of a day.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    /// 23:59, the closing bound used when an interval is split at midnight.
    pub const END_OF_DAY: TimeOfDay = TimeOfDay {
        hour: 23,
        minute: 59,
    };

    /// Create a time of day, rejecting hours above 23 or minutes above 59.
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(SlotError::InvalidTime { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    /// Create a time of day from minutes since midnight.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes >= MINUTES_PER_DAY {
            return Err(SlotError::InvalidTime {
                hour: u8::try_from(minutes / 60).unwrap_or(u8::MAX),
                minute: (minutes % 60) as u8,
            });
        }
        Ok(Self {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
        })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Minutes elapsed since midnight.
    pub fn minutes(self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl TryFrom<(u8, u8)> for TimeOfDay {
    type Error = SlotError;

    fn try_from((hour, minute): (u8, u8)) -> Result<Self> {
        Self::new(hour, minute)
    }
}

impl From<TimeOfDay> for (u8, u8) {
    fn from(t: TimeOfDay) -> Self {
        (t.hour, t.minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Day of the week, Monday = 0 through Sunday = 6.
///
/// Serialized as its numeric index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub const WORKING_DAYS: [DayOfWeek; 5] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
    ];

    pub fn from_index(index: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(SlotError::InvalidDay(index))
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// The following day, wrapping Sunday to Monday.
    pub fn succ(self) -> Self {
        Self::ALL[(usize::from(self.index()) + 1) % 7]
    }

    pub fn is_weekday(self) -> bool {
        self.index() < 5
    }

    /// Parse an English day name, either the full name ("tuesday") or a
    /// common abbreviation ("tue", "tues"). Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let day = match name.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => DayOfWeek::Monday,
            "tuesday" | "tue" | "tues" => DayOfWeek::Tuesday,
            "wednesday" | "wed" | "weds" => DayOfWeek::Wednesday,
            "thursday" | "thu" | "thurs" => DayOfWeek::Thursday,
            "friday" | "fri" => DayOfWeek::Friday,
            "saturday" | "sat" => DayOfWeek::Saturday,
            "sunday" | "sun" => DayOfWeek::Sunday,
            _ => return None,
        };
        Some(day)
    }

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = SlotError;

    fn try_from(index: u8) -> Result<Self> {
        Self::from_index(index)
    }
}

impl From<DayOfWeek> for u8 {
    fn from(day: DayOfWeek) -> Self {
        day.index()
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        Self::ALL[weekday.num_days_from_monday() as usize]
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }
}

/// A weekday-scoped time window within one timezone, with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct DayInterval {
    pub day: DayOfWeek,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// A window in which an attendee is free.
pub type AvailabilityInterval = DayInterval;

/// A window in which an attendee is occupied, in the attendee's own timezone.
pub type BusyInterval = DayInterval;

impl DayInterval {
    pub fn new(day: DayOfWeek, start: TimeOfDay, end: TimeOfDay) -> Result<Self> {
        if start >= end {
            return Err(SlotError::InvalidInterval {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { day, start, end })
    }

    /// Length in minutes; zero if the fields were set out of order.
    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }
}

#[derive(Deserialize)]
struct RawInterval {
    day: DayOfWeek,
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TryFrom<RawInterval> for DayInterval {
    type Error = SlotError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Self::new(raw.day, raw.start, raw.end)
    }
}
