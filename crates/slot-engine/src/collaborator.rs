//! Seams for the optional remote collaborators.
//!
//! Both collaborators are advisory. Their failures are values, not errors:
//! an [`Collaboration::Unavailable`] result sends the resolver down its local
//! fallback path.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::score::ScoringPreferences;
use crate::time::{AvailabilityInterval, DayInterval, DayOfWeek, TimeOfDay};

/// Outcome of a single collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub enum Collaboration<T> {
    Parsed(T),
    Unavailable(String),
}

impl<T> Collaboration<T> {
    pub fn parsed(self) -> Option<T> {
        match self {
            Collaboration::Parsed(value) => Some(value),
            Collaboration::Unavailable(_) => None,
        }
    }
}

/// An hour/minute pair as exchanged with collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    pub fn to_time_of_day(self) -> Option<TimeOfDay> {
        TimeOfDay::new(self.hour, self.minute).ok()
    }
}

/// Structured availability extracted from free text by a remote parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedAvailability {
    pub days: Vec<String>,
    #[serde(rename = "start_time", alias = "start")]
    pub start: ClockTime,
    #[serde(rename = "end_time", alias = "end")]
    pub end: ClockTime,
}

impl ParsedAvailability {
    /// Intervals for every recognised day. Empty when the times are invalid.
    pub fn to_intervals(&self) -> Vec<AvailabilityInterval> {
        let (Some(start), Some(end)) = (self.start.to_time_of_day(), self.end.to_time_of_day())
        else {
            return Vec::new();
        };
        self.days
            .iter()
            .filter_map(|name| DayOfWeek::from_name(name))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|day| DayInterval::new(day, start, end).ok())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

/// Scheduling preferences proposed by a remote analyst.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceHint {
    #[serde(default)]
    pub preferred_time_ranges: Vec<ClockRange>,
    #[serde(default)]
    pub preferred_days: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PreferenceHint {
    /// Scoring preferences from this hint. Invalid ranges and unknown day
    /// names are dropped; a field left empty keeps its default.
    pub fn to_preferences(&self) -> ScoringPreferences {
        let defaults = ScoringPreferences::default();

        let ranges: Vec<(TimeOfDay, TimeOfDay)> = self
            .preferred_time_ranges
            .iter()
            .filter_map(|r| Some((r.start.to_time_of_day()?, r.end.to_time_of_day()?)))
            .filter(|(start, end)| start <= end)
            .collect();

        let days: BTreeSet<DayOfWeek> = self
            .preferred_days
            .iter()
            .filter_map(|name| DayOfWeek::from_name(name))
            .collect();

        ScoringPreferences {
            ranges: if ranges.is_empty() {
                defaults.ranges
            } else {
                ranges
            },
            days: if days.is_empty() { defaults.days } else { days },
        }
    }
}

/// What an analyst sees about each attendee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendeeSummary {
    pub name: String,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_text: Option<String>,
}

/// Remote natural-language availability parser.
pub trait AvailabilityTextParser: Send + Sync {
    fn parse_availability(
        &self,
        text: &str,
        timezone_hint: Option<&str>,
    ) -> Collaboration<ParsedAvailability>;
}

/// Remote scheduling-preference analyst.
pub trait PreferenceAnalyzer: Send + Sync {
    fn analyze_preferences(
        &self,
        attendees: &[AttendeeSummary],
        target_timezone: &str,
    ) -> Collaboration<PreferenceHint>;
}
