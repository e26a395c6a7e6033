//! Heuristic scoring and ranking of candidate slots.
//!
//! Scores are additive:
//!
//! | rule                                    | points |
//! |-----------------------------------------|--------|
//! | weekday (Mon-Fri)                        | +10    |
//! | starts before 08:00                      | -20    |
//! | starts after 16:00                       | -10    |
//! | starts inside a preferred range (each)   | +15    |
//! | preferred day                            | +5     |
//! | mid-week (Tue, Wed, Thu)                 | +3     |

use std::collections::BTreeSet;

use chrono::Datelike;
use serde::Serialize;

use crate::availability::CandidateSlot;
use crate::time::{DayOfWeek, TimeOfDay};

const WEEKDAY_BONUS: i32 = 10;
const EARLY_PENALTY: i32 = -20;
const LATE_PENALTY: i32 = -10;
const PREFERRED_RANGE_BONUS: i32 = 15;
const PREFERRED_DAY_BONUS: i32 = 5;
const MIDWEEK_BONUS: i32 = 3;

const EARLY_CUTOFF_MINUTES: u32 = 8 * 60;
const LATE_CUTOFF_MINUTES: u32 = 16 * 60;

/// Preferred start-time ranges (inclusive) and preferred days.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringPreferences {
    pub ranges: Vec<(TimeOfDay, TimeOfDay)>,
    pub days: BTreeSet<DayOfWeek>,
}

impl Default for ScoringPreferences {
    /// 10:00-12:00 and 14:00-16:00, Monday through Friday.
    fn default() -> Self {
        let at = |h| TimeOfDay::new(h, 0).unwrap_or(TimeOfDay::MIDNIGHT);
        Self {
            ranges: vec![(at(10), at(12)), (at(14), at(16))],
            days: DayOfWeek::WORKING_DAYS.into_iter().collect(),
        }
    }
}

/// A candidate slot with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSlot {
    pub slot: CandidateSlot,
    pub score: i32,
}

/// Score a slot. Pure: depends only on the slot's weekday, start time, and
/// the preferences.
pub fn score_slot(slot: &CandidateSlot, preferences: &ScoringPreferences) -> i32 {
    let day = DayOfWeek::from(slot.date.weekday());
    let start = slot.start_time.minutes();
    let mut score = 0;

    if day.is_weekday() {
        score += WEEKDAY_BONUS;
    }

    if start < EARLY_CUTOFF_MINUTES {
        score += EARLY_PENALTY;
    } else if start > LATE_CUTOFF_MINUTES {
        score += LATE_PENALTY;
    }

    let matching_ranges = preferences
        .ranges
        .iter()
        .filter(|(from, to)| from.minutes() <= start && start <= to.minutes())
        .count();
    score += PREFERRED_RANGE_BONUS * matching_ranges as i32;

    if preferences.days.contains(&day) {
        score += PREFERRED_DAY_BONUS;
    }

    if matches!(
        day,
        DayOfWeek::Tuesday | DayOfWeek::Wednesday | DayOfWeek::Thursday
    ) {
        score += MIDWEEK_BONUS;
    }

    score
}

/// Score every slot and keep the best `top_n`, highest score first.
///
/// The sort is stable, so equal scores keep the input order (date, then
/// start time, as produced by [`crate::find_available_slots`]).
pub fn rank_slots(
    slots: Vec<CandidateSlot>,
    preferences: &ScoringPreferences,
    top_n: usize,
) -> Vec<ScoredSlot> {
    let mut scored: Vec<ScoredSlot> = slots
        .into_iter()
        .map(|slot| {
            let score = score_slot(&slot, preferences);
            ScoredSlot { slot, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(top_n);
    scored
}
