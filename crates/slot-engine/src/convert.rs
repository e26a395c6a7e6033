//! Weekday interval conversion between timezones.
//!
//! A weekday interval has no date, so its UTC offset is ambiguous around DST
//! transitions. The interval is anchored on the next occurrence of its weekday
//! at or after an explicit reference date, converted as concrete datetimes,
//! and mapped back to a weekday interval in the target zone. Intervals whose
//! converted bounds land on different dates are split at midnight.

use chrono::{Datelike, Days, NaiveDate, Timelike};
use chrono_tz::Tz;

use crate::dst::{resolve_local, DstPolicy};
use crate::time::{AvailabilityInterval, DayInterval, DayOfWeek, TimeOfDay};

/// The first date on or after `reference` that falls on `day`.
pub fn anchor_date(day: DayOfWeek, reference: NaiveDate) -> NaiveDate {
    let current = u64::from(DayOfWeek::from(reference.weekday()).index());
    let target = u64::from(day.index());
    let days_ahead = (target + 7 - current) % 7;
    reference + Days::new(days_ahead)
}

/// Convert an interval from `source` to `target`.
///
/// Returns one interval when the converted bounds share a date, or two when
/// they straddle midnight: `[day, start, 23:59]` and `[day + 1, 00:00, end]`.
/// Empty pieces are dropped, so an interval ending exactly at the target's
/// midnight yields a single piece. Returns nothing when `policy` is
/// [`DstPolicy::Skip`] and a bound falls in a DST gap.
pub fn convert_interval(
    interval: &AvailabilityInterval,
    source: &Tz,
    target: &Tz,
    reference: NaiveDate,
    policy: DstPolicy,
) -> Vec<AvailabilityInterval> {
    if source == target {
        return vec![*interval];
    }

    let anchor = anchor_date(interval.day, reference);
    let start_local = anchor.and_time(interval.start.to_naive_time());
    let end_local = anchor.and_time(interval.end.to_naive_time());

    let (Some(start), Some(end)) = (
        resolve_local(source, start_local, policy),
        resolve_local(source, end_local, policy),
    ) else {
        tracing::debug!(
            ?interval,
            source = %source,
            %anchor,
            "interval bound falls in a DST gap, skipping"
        );
        return Vec::new();
    };
    // A gap can swallow the whole interval, or invert it under WallClock.
    if end <= start {
        return Vec::new();
    }

    let start = start.with_timezone(target);
    let end = end.with_timezone(target);
    let day = DayOfWeek::from(start.weekday());
    let start_time = wall_clock(start.hour(), start.minute());
    let end_time = wall_clock(end.hour(), end.minute());

    if start.date_naive() != end.date_naive() {
        [
            DayInterval::new(day, start_time, TimeOfDay::END_OF_DAY),
            DayInterval::new(day.succ(), TimeOfDay::MIDNIGHT, end_time),
        ]
        .into_iter()
        .flatten()
        .collect()
    } else {
        DayInterval::new(day, start_time, end_time)
            .into_iter()
            .collect()
    }
}

/// Convert every interval, flattening the split pieces.
pub fn convert_all(
    intervals: &[AvailabilityInterval],
    source: &Tz,
    target: &Tz,
    reference: NaiveDate,
    policy: DstPolicy,
) -> Vec<AvailabilityInterval> {
    intervals
        .iter()
        .flat_map(|interval| convert_interval(interval, source, target, reference, policy))
        .collect()
}

fn wall_clock(hour: u32, minute: u32) -> TimeOfDay {
    // chrono guarantees hour < 24 and minute < 60.
    TimeOfDay::new(hour as u8, minute as u8).unwrap_or(TimeOfDay::MIDNIGHT)
}
