//! Property-based tests for slot intersection and scoring.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use proptest::prelude::*;
use slot_engine::{
    attendee_availability, find_available_slots, invert_busy, score_slot, Attendee,
    AttendeeAvailability, AvailabilitySource, CandidateSlot, DayInterval, DayOfWeek,
    ResolverConfig, ScoringPreferences, SlotQuery, TimeOfDay,
};

fn arb_interval() -> impl Strategy<Value = DayInterval> {
    (0u8..7, 0u32..47, 1u32..48)
        .prop_filter("start must be before end", |(_, s, e)| s < e)
        .prop_map(|(d, s, e)| {
            DayInterval::new(
                DayOfWeek::from_index(d).unwrap(),
                TimeOfDay::from_minutes(s * 30).unwrap(),
                TimeOfDay::from_minutes(e * 30).unwrap(),
            )
            .unwrap()
        })
}

fn arb_attendee() -> impl Strategy<Value = AttendeeAvailability> {
    prop::collection::vec(arb_interval(), 0..6).prop_map(|intervals| AttendeeAvailability {
        name: "attendee".to_string(),
        intervals,
        source: AvailabilitySource::Text,
        warnings: Vec::new(),
    })
}

fn week_query(duration_minutes: u32) -> SlotQuery {
    SlotQuery {
        start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
        timezone: "UTC".to_string(),
        duration_minutes,
        granularity_minutes: 30,
    }
}

proptest! {
    /// Every returned slot has all attendees and fits inside each of them.
    #[test]
    fn slots_always_include_every_attendee(
        attendees in prop::collection::vec(arb_attendee(), 1..5),
        duration in prop_oneof![Just(30u32), Just(60), Just(90)],
    ) {
        let slots = find_available_slots(&attendees, &week_query(duration));

        for slot in &slots {
            prop_assert_eq!(slot.attendee_count, attendees.len());
            let day = DayOfWeek::from(slot.date.weekday());
            for attendee in &attendees {
                let fits = attendee.intervals.iter().any(|i| {
                    i.day == day && i.start <= slot.start_time && slot.end_time <= i.end
                });
                prop_assert!(fits);
            }
        }
    }

    /// A single attendee's inverted calendar yields exactly its gaps. Five busy
    /// slots can never fill a whole week, so default hours never kick in.
    #[test]
    fn single_attendee_reproduces_calendar_gaps(
        busy in prop::collection::vec(arb_interval(), 1..6),
    ) {
        let config = ResolverConfig::default();
        let query = week_query(30);

        let expected: BTreeSet<(NaiveDate, u32)> = query
            .start_date
            .iter_days()
            .take(7)
            .flat_map(|date| {
                let day = DayOfWeek::from(date.weekday());
                invert_busy(&busy, config.work_start, config.work_end)
                    .into_iter()
                    .filter(move |gap| gap.day == day)
                    .flat_map(move |gap| {
                        (gap.start.minutes()..=gap.end.minutes() - 30)
                            .step_by(30)
                            .map(move |m| (date, m))
                    })
            })
            .collect();

        let attendee = Attendee::new("solo", Some("UTC".to_string()), None, Some(busy));
        let availability =
            attendee_availability(&attendee, &Tz::UTC, query.start_date, &config, None);
        let found: BTreeSet<(NaiveDate, u32)> = find_available_slots(&[availability], &query)
            .iter()
            .map(|s| (s.date, s.start_time.minutes()))
            .collect();

        prop_assert_eq!(found, expected);
    }

    /// Moving a slot to another date only changes the weekday-dependent terms.
    #[test]
    fn score_depends_only_on_weekday_and_start(
        start in 0u32..46,
        day_a in 3u32..=9,
        day_b in 3u32..=9,
    ) {
        let slot = |day: u32| CandidateSlot {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            start_time: TimeOfDay::from_minutes(start * 30).unwrap(),
            end_time: TimeOfDay::from_minutes(start * 30 + 60).unwrap(),
            attendee_count: 1,
            timezone: "UTC".to_string(),
        };
        let prefs = ScoringPreferences::default();
        let (a, b) = (slot(day_a), slot(day_b));

        prop_assert_eq!(score_slot(&a, &prefs), score_slot(&a, &prefs));

        let weekday_terms = |s: &CandidateSlot| {
            let day = DayOfWeek::from(s.date.weekday());
            let mut points = 0;
            if day.is_weekday() {
                points += 10;
            }
            if prefs.days.contains(&day) {
                points += 5;
            }
            if matches!(day, DayOfWeek::Tuesday | DayOfWeek::Wednesday | DayOfWeek::Thursday) {
                points += 3;
            }
            points
        };
        prop_assert_eq!(
            score_slot(&a, &prefs) - weekday_terms(&a),
            score_slot(&b, &prefs) - weekday_terms(&b)
        );
    }
}
