//! Request validation and end-to-end slot resolution.
//!
//! A [`Resolver`] owns the tuning config and the optional remote
//! collaborators. Each call to [`Resolver::resolve`] is independent: nothing
//! is cached or shared between requests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::availability::{collect_availability, find_available_slots, Attendee, SlotQuery};
use crate::collaborator::{
    AttendeeSummary, AvailabilityTextParser, Collaboration, PreferenceAnalyzer, PreferenceHint,
};
use crate::config::ResolverConfig;
use crate::error::{Result, SlotError};
use crate::score::{rank_slots, ScoredSlot};
use crate::time::BusyInterval;
use crate::timezone::resolve_timezone;

const DEFAULT_DURATION_MINUTES: u32 = 60;

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

fn default_target_timezone() -> String {
    "UTC".to_string()
}

/// A validated meeting request.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingRequest {
    pub attendees: Vec<Attendee>,
    pub date_range_start: NaiveDate,
    /// Inclusive.
    pub date_range_end: NaiveDate,
    pub target_timezone: String,
    pub duration_minutes: u32,
}

impl MeetingRequest {
    /// Validate and build a request.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidRequest` when [`MeetingRequest::validate`] fails.
    pub fn new(
        attendees: Vec<Attendee>,
        date_range_start: NaiveDate,
        date_range_end: NaiveDate,
        target_timezone: impl Into<String>,
        duration_minutes: u32,
    ) -> Result<Self> {
        let request = Self {
            attendees,
            date_range_start,
            date_range_end,
            target_timezone: target_timezone.into(),
            duration_minutes,
        };
        request.validate()?;
        Ok(request)
    }

    /// Check the request invariants.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidRequest` for an empty attendee list, an end
    /// date before the start date, or a zero duration.
    pub fn validate(&self) -> Result<()> {
        if self.attendees.is_empty() {
            return Err(SlotError::InvalidRequest(
                "at least one attendee is required".to_string(),
            ));
        }
        if self.date_range_end < self.date_range_start {
            return Err(SlotError::InvalidRequest(format!(
                "date range end {} is before start {}",
                self.date_range_end, self.date_range_start
            )));
        }
        if self.duration_minutes == 0 {
            return Err(SlotError::InvalidRequest(
                "duration_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON request.
    pub fn from_json(json: &str) -> Result<Self> {
        let input: MeetingRequestInput = serde_json::from_str(json)?;
        input.try_into()
    }
}

#[derive(Debug, Deserialize)]
struct AttendeeInput {
    name: String,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    availability_text: Option<String>,
    #[serde(default, alias = "teams_calendar")]
    busy_calendar: Option<Vec<BusyInterval>>,
}

#[derive(Debug, Deserialize)]
struct DateRangeInput {
    start: NaiveDate,
    end: NaiveDate,
}

/// Wire shape of a meeting request.
#[derive(Debug, Deserialize)]
pub struct MeetingRequestInput {
    attendees: Vec<AttendeeInput>,
    date_range: DateRangeInput,
    #[serde(default = "default_target_timezone")]
    target_timezone: String,
    #[serde(default = "default_duration")]
    duration_minutes: u32,
}

impl TryFrom<MeetingRequestInput> for MeetingRequest {
    type Error = SlotError;

    fn try_from(input: MeetingRequestInput) -> Result<Self> {
        let attendees = input
            .attendees
            .into_iter()
            .map(|a| Attendee::new(a.name, a.timezone, a.availability_text, a.busy_calendar))
            .collect();
        MeetingRequest::new(
            attendees,
            input.date_range.start,
            input.date_range.end,
            input.target_timezone,
            input.duration_minutes,
        )
    }
}

/// One recommended meeting time, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingTime {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub attendees: usize,
    pub timezone: String,
}

impl From<&ScoredSlot> for MeetingTime {
    fn from(scored: &ScoredSlot) -> Self {
        let slot = &scored.slot;
        Self {
            date: slot.date.format("%Y-%m-%d").to_string(),
            start_time: slot.start_time.to_string(),
            end_time: slot.end_time.to_string(),
            attendees: slot.attendee_count,
            timezone: slot.timezone.clone(),
        }
    }
}

/// The result of resolving a meeting request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingResolution {
    #[serde(rename = "best_meeting_times")]
    pub best_slots: Vec<MeetingTime>,
    #[serde(skip)]
    pub scored: Vec<ScoredSlot>,
    #[serde(rename = "meeting_duration_minutes")]
    pub duration_minutes: u32,
    pub timezone: String,
    #[serde(rename = "analysis_notes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Resolves meeting requests into ranked slots.
#[derive(Default)]
pub struct Resolver {
    config: ResolverConfig,
    text_parser: Option<Box<dyn AvailabilityTextParser>>,
    preference_analyzer: Option<Box<dyn PreferenceAnalyzer>>,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            text_parser: None,
            preference_analyzer: None,
        }
    }

    /// Use a remote parser for availability text, falling back to the local
    /// parser when it is unavailable.
    pub fn with_text_parser(mut self, parser: Box<dyn AvailabilityTextParser>) -> Self {
        self.text_parser = Some(parser);
        self
    }

    /// Use a remote analyst to bias scoring.
    pub fn with_preference_analyzer(mut self, analyzer: Box<dyn PreferenceAnalyzer>) -> Self {
        self.preference_analyzer = Some(analyzer);
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Find and rank the best meeting slots for `request`.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidRequest` if the request is invalid and
    /// `SlotError::InvalidConfig` if the resolver config is invalid.
    /// Collaborator failures, unknown timezones, and unparseable availability
    /// are not errors; they degrade to defaults and may add warnings.
    pub fn resolve(&self, request: &MeetingRequest) -> Result<MeetingResolution> {
        request.validate()?;
        self.config.validate()?;

        let target = resolve_timezone(&request.target_timezone);
        let mut warnings: Vec<String> = target.warning.into_iter().collect();

        let hint = self.preference_hint(request);
        let preferences = hint
            .as_ref()
            .map(PreferenceHint::to_preferences)
            .unwrap_or_default();

        // Weekday intervals are anchored on the first requested date so the
        // same request always sees the same UTC offsets.
        let availabilities = collect_availability(
            &request.attendees,
            &target.zone,
            request.date_range_start,
            &self.config,
            self.text_parser.as_deref(),
        );
        for availability in &availabilities {
            tracing::debug!(
                attendee = %availability.name,
                source = ?availability.source,
                intervals = availability.intervals.len(),
                "collected availability"
            );
            warnings.extend(availability.warnings.iter().cloned());
        }

        let query = SlotQuery {
            start_date: request.date_range_start,
            end_date: request.date_range_end,
            timezone: request.target_timezone.clone(),
            duration_minutes: request.duration_minutes,
            granularity_minutes: self.config.granularity_minutes,
        };
        let candidates = find_available_slots(&availabilities, &query);
        tracing::debug!(candidates = candidates.len(), "found common slots");

        let scored = rank_slots(candidates, &preferences, self.config.top_n);

        Ok(MeetingResolution {
            best_slots: scored.iter().map(MeetingTime::from).collect(),
            scored,
            duration_minutes: request.duration_minutes,
            timezone: request.target_timezone.clone(),
            notes: hint.and_then(|h| h.notes),
            warnings,
        })
    }

    fn preference_hint(&self, request: &MeetingRequest) -> Option<PreferenceHint> {
        let analyzer = self.preference_analyzer.as_deref()?;
        let summaries: Vec<AttendeeSummary> = request
            .attendees
            .iter()
            .map(|a| AttendeeSummary {
                name: a.name.clone(),
                timezone: a.timezone.clone().unwrap_or_else(|| "Unknown".to_string()),
                availability_text: a.sources.text.clone(),
            })
            .collect();

        match analyzer.analyze_preferences(&summaries, &request.target_timezone) {
            Collaboration::Parsed(hint) => Some(hint),
            Collaboration::Unavailable(reason) => {
                tracing::debug!(%reason, "no preference hint, using default scoring");
                None
            }
        }
    }
}

/// Convenience wrapper: default config, no remote collaborators.
pub fn resolve_offline(request: &MeetingRequest) -> Result<MeetingResolution> {
    Resolver::default().resolve(request)
}
