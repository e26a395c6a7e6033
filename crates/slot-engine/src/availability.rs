//! Per-attendee availability assembly and multi-attendee slot intersection.
//!
//! Each attendee's availability is gathered from their free-text description
//! and their busy calendar, normalized to the target timezone, and only then
//! intersected. Intersection works on a fixed grid: candidate start times are
//! enumerated from every interval start in `granularity_minutes` steps, and a
//! start time survives only if every attendee can start there.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use rayon::prelude::*;
use serde::Serialize;

use crate::collaborator::{AvailabilityTextParser, Collaboration};
use crate::config::ResolverConfig;
use crate::convert::convert_all;
use crate::freebusy::invert_busy;
use crate::parser::parse_fallback;
use crate::time::{AvailabilityInterval, BusyInterval, DayInterval, DayOfWeek, TimeOfDay};
use crate::timezone::resolve_timezone;

/// Where an attendee's availability can come from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendeeSources {
    pub text: Option<String>,
    pub calendar: Option<Vec<BusyInterval>>,
}

/// A meeting attendee.
#[derive(Debug, Clone, PartialEq)]
pub struct Attendee {
    pub name: String,
    /// IANA name, abbreviation, or city alias. `None` means the target timezone.
    pub timezone: Option<String>,
    pub sources: AttendeeSources,
}

impl Attendee {
    /// Build an attendee, treating blank text and empty calendars as absent.
    pub fn new(
        name: impl Into<String>,
        timezone: Option<String>,
        text: Option<String>,
        calendar: Option<Vec<BusyInterval>>,
    ) -> Self {
        Self {
            name: name.into(),
            timezone: timezone.filter(|tz| !tz.trim().is_empty()),
            sources: AttendeeSources {
                text: text.filter(|t| !t.trim().is_empty()),
                calendar: calendar.filter(|c| !c.is_empty()),
            },
        }
    }
}

/// Which inputs produced an attendee's availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilitySource {
    Text,
    Calendar,
    TextAndCalendar,
    DefaultHours,
}

/// An attendee's free intervals, expressed in the target timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendeeAvailability {
    pub name: String,
    pub intervals: Vec<AvailabilityInterval>,
    pub source: AvailabilitySource,
    pub warnings: Vec<String>,
}

impl AttendeeAvailability {
    /// Grid start offsets (minutes since midnight) at which this attendee can
    /// hold a meeting of `duration_minutes` on `day`.
    pub fn start_offsets(
        &self,
        day: DayOfWeek,
        duration_minutes: u32,
        granularity_minutes: u32,
    ) -> BTreeSet<u32> {
        let step = granularity_minutes.max(1) as usize;
        self.intervals
            .iter()
            .filter(|interval| interval.day == day && interval.start < interval.end)
            .filter(|interval| interval.duration_minutes() >= duration_minutes)
            .flat_map(|interval| {
                let last_start = interval.end.minutes() - duration_minutes;
                (interval.start.minutes()..=last_start).step_by(step)
            })
            .collect()
    }
}

/// A meeting window in which every attendee is free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSlot {
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub attendee_count: usize,
    pub timezone: String,
}

/// Date range and slot shape to search.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotQuery {
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub timezone: String,
    pub duration_minutes: u32,
    pub granularity_minutes: u32,
}

/// Gather one attendee's availability in `target`.
///
/// Text is parsed by `text_parser` when one is supplied and succeeds, and by
/// the local parser otherwise. Calendars are inverted in the attendee's own
/// timezone within the configured working window. When neither source yields
/// anything, Monday-Friday working hours in the attendee's timezone are assumed.
pub fn attendee_availability(
    attendee: &Attendee,
    target: &Tz,
    reference: NaiveDate,
    config: &ResolverConfig,
    text_parser: Option<&dyn AvailabilityTextParser>,
) -> AttendeeAvailability {
    let mut warnings = Vec::new();
    let source_zone = match attendee.timezone.as_deref() {
        Some(name) => {
            let resolved = resolve_timezone(name);
            if let Some(warning) = resolved.warning {
                warnings.push(format!("{}: {warning}", attendee.name));
            }
            resolved.zone
        }
        None => *target,
    };
    let convert = |intervals: &[AvailabilityInterval]| {
        convert_all(intervals, &source_zone, target, reference, config.dst_policy)
    };

    let from_text = match attendee.sources.text.as_deref() {
        Some(text) => convert(&text_intervals(
            text,
            attendee.timezone.as_deref(),
            text_parser,
        )),
        None => Vec::new(),
    };

    let from_calendar = match attendee.sources.calendar.as_deref() {
        Some(busy) => convert(&invert_busy(busy, config.work_start, config.work_end)),
        None => Vec::new(),
    };

    let source = match (from_text.is_empty(), from_calendar.is_empty()) {
        (false, false) => AvailabilitySource::TextAndCalendar,
        (false, true) => AvailabilitySource::Text,
        (true, false) => AvailabilitySource::Calendar,
        (true, true) => AvailabilitySource::DefaultHours,
    };

    let intervals = if source == AvailabilitySource::DefaultHours {
        tracing::info!(
            attendee = %attendee.name,
            "no availability info, assuming standard working hours"
        );
        let working_hours: Vec<AvailabilityInterval> = DayOfWeek::WORKING_DAYS
            .iter()
            .filter_map(|&day| DayInterval::new(day, config.work_start, config.work_end).ok())
            .collect();
        convert(&working_hours)
    } else {
        from_text.into_iter().chain(from_calendar).collect()
    };

    AttendeeAvailability {
        name: attendee.name.clone(),
        intervals,
        source,
        warnings,
    }
}

/// Gather availability for every attendee in parallel, preserving order.
pub fn collect_availability(
    attendees: &[Attendee],
    target: &Tz,
    reference: NaiveDate,
    config: &ResolverConfig,
    text_parser: Option<&dyn AvailabilityTextParser>,
) -> Vec<AttendeeAvailability> {
    attendees
        .par_iter()
        .map(|attendee| attendee_availability(attendee, target, reference, config, text_parser))
        .collect()
}

/// Find every slot in the query's date range where all attendees are free.
///
/// Each attendee counts at most once per (date, start) even when several of
/// their intervals overlap. Slots are returned by date, then start time.
pub fn find_available_slots(
    availabilities: &[AttendeeAvailability],
    query: &SlotQuery,
) -> Vec<CandidateSlot> {
    let required = availabilities.len();
    if required == 0 || query.duration_minutes == 0 || query.start_date > query.end_date {
        return Vec::new();
    }

    let mut slots = Vec::new();
    for date in query
        .start_date
        .iter_days()
        .take_while(|date| *date <= query.end_date)
    {
        let day = DayOfWeek::from(date.weekday());

        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for attendee in availabilities {
            for offset in
                attendee.start_offsets(day, query.duration_minutes, query.granularity_minutes)
            {
                *counts.entry(offset).or_default() += 1;
            }
        }

        for (offset, count) in counts {
            if count != required {
                continue;
            }
            let (Ok(start_time), Ok(end_time)) = (
                TimeOfDay::from_minutes(offset),
                TimeOfDay::from_minutes(offset + query.duration_minutes),
            ) else {
                continue;
            };
            slots.push(CandidateSlot {
                date,
                start_time,
                end_time,
                attendee_count: count,
                timezone: query.timezone.clone(),
            });
        }
    }

    slots
}

fn text_intervals(
    text: &str,
    timezone_hint: Option<&str>,
    text_parser: Option<&dyn AvailabilityTextParser>,
) -> Vec<AvailabilityInterval> {
    if let Some(parser) = text_parser {
        match parser.parse_availability(text, timezone_hint) {
            Collaboration::Parsed(parsed) => {
                let intervals = parsed.to_intervals();
                if !intervals.is_empty() {
                    return intervals;
                }
                tracing::warn!(text, "remote parse yielded no usable intervals, using fallback parser");
            }
            Collaboration::Unavailable(reason) => {
                tracing::warn!(%reason, "availability parser unavailable, using fallback parser");
            }
        }
    }
    parse_fallback(text)
}
