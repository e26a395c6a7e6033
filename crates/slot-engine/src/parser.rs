//! Local, deterministic parsing of free-text availability.
//!
//! Recognises phrases like "every working day 2 pm to 5 pm" or
//! "Mondays and Tuesdays between 8 am to 3 pm". The parser is conservative:
//! without an explicit time range it yields nothing rather than guessing.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::time::{AvailabilityInterval, DayInterval, DayOfWeek, TimeOfDay};

static WORKING_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:every|all)\s+working\s+day").expect("valid regex"));

static DAY_NAMES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday|tues|thurs|weds|mon|tue|wed|thu|fri|sat|sun)s?\b",
    )
    .expect("valid regex")
});

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2})(?::(\d{2}))?\s*(am|pm)\s*to\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)")
        .expect("valid regex")
});

/// Days mentioned in `text`, in Monday-first order.
///
/// "every working day" / "all working days" expands to Monday through Friday.
pub fn parse_days(text: &str) -> Vec<DayOfWeek> {
    if WORKING_DAYS.is_match(text) {
        return DayOfWeek::WORKING_DAYS.to_vec();
    }

    DAY_NAMES
        .captures_iter(text)
        .filter_map(|caps| DayOfWeek::from_name(&caps[1]))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The first `<h>[:<m>] am|pm to <h>[:<m>] am|pm` range in `text`, in 24-hour time.
pub fn parse_time_range(text: &str) -> Option<(TimeOfDay, TimeOfDay)> {
    let caps = TIME_RANGE.captures(text)?;
    let start = twelve_hour(&caps, 1, 2, 3)?;
    let end = twelve_hour(&caps, 4, 5, 6)?;
    Some((start, end))
}

/// Parse free text into availability intervals, one per mentioned day.
///
/// Returns an empty list when no day or no time range is found, or when the
/// range is not a forward range within a single day.
pub fn parse_fallback(text: &str) -> Vec<AvailabilityInterval> {
    let Some((start, end)) = parse_time_range(text) else {
        tracing::debug!(text, "no time range found in availability text");
        return Vec::new();
    };

    let days = parse_days(text);
    let intervals: Vec<AvailabilityInterval> = days
        .iter()
        .filter_map(|&day| DayInterval::new(day, start, end).ok())
        .collect();

    if intervals.is_empty() && !days.is_empty() {
        tracing::debug!(text, %start, %end, "time range does not fit within a single day");
    }
    intervals
}

fn twelve_hour(caps: &Captures<'_>, hour: usize, minute: usize, meridiem: usize) -> Option<TimeOfDay> {
    let mut h: u8 = caps[hour].parse().ok()?;
    let m: u8 = match caps.get(minute) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if !(1..=12).contains(&h) {
        return None;
    }
    let pm = caps[meridiem].eq_ignore_ascii_case("pm");
    if pm && h < 12 {
        h += 12;
    } else if !pm && h == 12 {
        h = 0;
    }
    TimeOfDay::new(h, m).ok()
}
