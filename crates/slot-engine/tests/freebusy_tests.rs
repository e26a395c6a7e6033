//! Tests for busy-calendar inversion.

use slot_engine::freebusy::{free_on_day, merge_busy_periods};
use slot_engine::{invert_busy, BusyInterval, DayInterval, DayOfWeek, TimeOfDay};

fn t(hour: u8, minute: u8) -> TimeOfDay {
    TimeOfDay::new(hour, minute).unwrap()
}

/// Helper to create a busy or free interval on a weekday index.
fn slot(day: u8, start: (u8, u8), end: (u8, u8)) -> BusyInterval {
    DayInterval::new(
        DayOfWeek::from_index(day).unwrap(),
        t(start.0, start.1),
        t(end.0, end.1),
    )
    .unwrap()
}

fn monday(busy: &[BusyInterval]) -> Vec<DayInterval> {
    free_on_day(busy, DayOfWeek::Monday, t(9, 0), t(17, 0))
}

#[test]
fn two_meetings_leave_two_gaps() {
    let busy = vec![slot(0, (9, 0), (10, 30)), slot(0, (13, 0), (14, 0))];

    let free: Vec<DayInterval> = invert_busy(&busy, t(9, 0), t(17, 0))
        .into_iter()
        .filter(|i| i.day == DayOfWeek::Monday)
        .collect();

    assert_eq!(
        free,
        vec![slot(0, (10, 30), (13, 0)), slot(0, (14, 0), (17, 0))]
    );
}

#[test]
fn no_busy_slots_every_day_is_fully_free() {
    let free = invert_busy(&[], t(9, 0), t(17, 0));

    assert_eq!(free.len(), 7, "one working window per day of the week");
    for (interval, day) in free.iter().zip(DayOfWeek::ALL) {
        assert_eq!(*interval, slot(day.index(), (9, 0), (17, 0)));
    }
}

#[test]
fn busy_days_do_not_affect_other_days() {
    let busy = vec![slot(2, (11, 0), (12, 0))];
    let free = invert_busy(&busy, t(9, 0), t(17, 0));

    // Six untouched days plus two gaps on Wednesday.
    assert_eq!(free.len(), 8);
    assert_eq!(free[2], slot(2, (9, 0), (11, 0)));
    assert_eq!(free[3], slot(2, (12, 0), (17, 0)));
}

#[test]
fn overlapping_busy_slots_are_merged() {
    // 10:00-11:30 and 11:00-12:00 merge into 10:00-12:00.
    let busy = vec![slot(0, (10, 0), (11, 30)), slot(0, (11, 0), (12, 0))];

    assert_eq!(
        monday(&busy),
        vec![slot(0, (9, 0), (10, 0)), slot(0, (12, 0), (17, 0))]
    );
}

#[test]
fn contained_busy_slot_does_not_open_a_gap() {
    // 10:00-14:00 contains 11:00-12:00; the inner end must not reopen time.
    let busy = vec![slot(0, (10, 0), (14, 0)), slot(0, (11, 0), (12, 0))];

    assert_eq!(
        monday(&busy),
        vec![slot(0, (9, 0), (10, 0)), slot(0, (14, 0), (17, 0))]
    );
}

#[test]
fn adjacent_busy_slots_leave_no_empty_gap() {
    let busy = vec![slot(0, (10, 0), (11, 0)), slot(0, (11, 0), (12, 0))];

    let merged = merge_busy_periods(&busy, DayOfWeek::Monday, t(9, 0), t(17, 0));
    assert_eq!(merged, vec![(t(10, 0), t(12, 0))]);
    assert_eq!(monday(&busy).len(), 2);
}

#[test]
fn unsorted_input_is_sorted_first() {
    let busy = vec![slot(0, (15, 0), (16, 0)), slot(0, (9, 30), (10, 0))];

    assert_eq!(
        monday(&busy),
        vec![
            slot(0, (9, 0), (9, 30)),
            slot(0, (10, 0), (15, 0)),
            slot(0, (16, 0), (17, 0)),
        ]
    );
}

#[test]
fn busy_slots_are_clipped_to_working_window() {
    // 07:00-09:30 starts before the window; 16:30-19:00 ends after it.
    let busy = vec![slot(0, (7, 0), (9, 30)), slot(0, (16, 30), (19, 0))];

    assert_eq!(monday(&busy), vec![slot(0, (9, 30), (16, 30))]);
}

#[test]
fn busy_slots_outside_window_are_ignored() {
    let busy = vec![slot(0, (6, 0), (8, 0)), slot(0, (18, 0), (20, 0))];

    assert_eq!(monday(&busy), vec![slot(0, (9, 0), (17, 0))]);
}

#[test]
fn fully_booked_day_has_no_availability() {
    let busy = vec![slot(0, (8, 0), (12, 0)), slot(0, (12, 0), (18, 0))];

    assert!(monday(&busy).is_empty());
}

#[test]
fn custom_working_window() {
    let busy = vec![slot(4, (12, 0), (13, 0))];
    let free = free_on_day(&busy, DayOfWeek::Friday, t(8, 0), t(14, 0));

    assert_eq!(
        free,
        vec![slot(4, (8, 0), (12, 0)), slot(4, (13, 0), (14, 0))]
    );
}

#[test]
fn out_of_order_busy_slot_is_ignored() {
    let inverted = DayInterval {
        day: DayOfWeek::Monday,
        start: t(12, 0),
        end: t(10, 0),
    };

    assert_eq!(monday(&[inverted]), vec![slot(0, (9, 0), (17, 0))]);
}
