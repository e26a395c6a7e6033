//! # slot-engine
//!
//! Timezone-aware meeting slot resolution for multiple attendees.
//!
//! Each attendee describes when they are free, either as free text
//! ("every working day 2 pm to 5 pm") or as a busy calendar, in their own
//! timezone. The engine normalizes everything to a target timezone, finds the
//! fixed-duration windows in which every attendee is free, and ranks them with
//! a scheduling-preference heuristic.
//!
//! ## Quick start
//!
//! ```rust
//! use slot_engine::{resolve_offline, MeetingRequest};
//!
//! let json = r#"{
//!   "attendees": [{"name": "Ana", "timezone": "UTC", "availability_text": "every working day 10 am to 12 pm"}],
//!   "date_range": {"start": "2025-03-03", "end": "2025-03-03"},
//!   "target_timezone": "UTC",
//!   "duration_minutes": 60
//! }"#;
//! let request = MeetingRequest::from_json(json).unwrap();
//! let resolution = resolve_offline(&request).unwrap();
//! assert_eq!(resolution.best_slots[0].start_time, "10:00");
//! ```
//!
//! ## Modules
//!
//! - [`time`] — `TimeOfDay`, `DayOfWeek`, weekday intervals
//! - [`timezone`] — name/alias → zone resolution with UTC fallback
//! - [`dst`] — DST transition policies
//! - [`convert`] — weekday interval conversion between zones, midnight splits
//! - [`parser`] — local free-text availability parser
//! - [`freebusy`] — busy calendar → free intervals
//! - [`availability`] — per-attendee availability and slot intersection
//! - [`score`] — slot scoring and ranking
//! - [`collaborator`] — traits for optional remote parsing and preference analysis
//! - [`resolver`] — request validation and orchestration
//! - [`config`] — resolver tuning
//! - [`error`] — Error types

pub mod availability;
pub mod collaborator;
pub mod config;
pub mod convert;
pub mod dst;
pub mod error;
pub mod freebusy;
pub mod parser;
pub mod resolver;
pub mod score;
pub mod time;
pub mod timezone;

pub use availability::{
    attendee_availability, collect_availability, find_available_slots, Attendee,
    AttendeeAvailability, AttendeeSources, AvailabilitySource, CandidateSlot, SlotQuery,
};
pub use collaborator::{
    AttendeeSummary, AvailabilityTextParser, Collaboration, ParsedAvailability,
    PreferenceAnalyzer, PreferenceHint,
};
pub use config::ResolverConfig;
pub use convert::convert_interval;
pub use dst::DstPolicy;
pub use error::SlotError;
pub use freebusy::invert_busy;
pub use parser::parse_fallback;
pub use resolver::{resolve_offline, MeetingRequest, MeetingResolution, MeetingTime, Resolver};
pub use score::{rank_slots, score_slot, ScoredSlot, ScoringPreferences};
pub use time::{AvailabilityInterval, BusyInterval, DayInterval, DayOfWeek, TimeOfDay};
pub use timezone::{resolve_timezone, ResolvedZone};
