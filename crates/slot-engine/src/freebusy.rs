//! Invert busy calendars into availability.
//!
//! Per weekday, busy intervals are clipped to the working window, sorted,
//! merged where they overlap or touch, and the gaps between merged blocks
//! within the working window become availability intervals.

use crate::time::{AvailabilityInterval, BusyInterval, DayInterval, DayOfWeek, TimeOfDay};

/// Merge overlapping or adjacent busy periods on `day`, clipped to the window.
///
/// Returns a sorted, non-overlapping list of (start, end) pairs.
pub fn merge_busy_periods(
    busy: &[BusyInterval],
    day: DayOfWeek,
    window_start: TimeOfDay,
    window_end: TimeOfDay,
) -> Vec<(TimeOfDay, TimeOfDay)> {
    // Collect busy periods clipped to the window, discarding those entirely outside.
    let mut periods: Vec<(TimeOfDay, TimeOfDay)> = busy
        .iter()
        .filter(|b| b.day == day && b.start < b.end)
        .filter(|b| b.start < window_end && b.end > window_start)
        .map(|b| (b.start.max(window_start), b.end.min(window_end)))
        .collect();

    if periods.is_empty() {
        return Vec::new();
    }

    periods.sort();

    let mut merged: Vec<(TimeOfDay, TimeOfDay)> = Vec::new();
    for (start, end) in periods {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                // Overlapping or adjacent: extend the current block.
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Free intervals on a single day between `window_start` and `window_end`.
pub fn free_on_day(
    busy: &[BusyInterval],
    day: DayOfWeek,
    window_start: TimeOfDay,
    window_end: TimeOfDay,
) -> Vec<AvailabilityInterval> {
    let merged = merge_busy_periods(busy, day, window_start, window_end);

    let mut free = Vec::new();
    let mut cursor = window_start;

    for (busy_start, busy_end) in merged {
        if cursor < busy_start {
            free.extend(DayInterval::new(day, cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    // Trailing gap after the last busy block.
    if cursor < window_end {
        free.extend(DayInterval::new(day, cursor, window_end));
    }

    free
}

/// Invert a busy calendar into availability for every day of the week.
///
/// Days without busy intervals are free for the whole working window. The
/// result is ordered by day, then by start time.
pub fn invert_busy(
    busy: &[BusyInterval],
    work_start: TimeOfDay,
    work_end: TimeOfDay,
) -> Vec<AvailabilityInterval> {
    DayOfWeek::ALL
        .iter()
        .flat_map(|&day| free_on_day(busy, day, work_start, work_end))
        .collect()
}
