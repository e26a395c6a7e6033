//! DST transition policies for anchoring wall-clock times to instants.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Longest DST gap searched when shifting a nonexistent time forward.
const MAX_GAP_MINUTES: i64 = 180;

/// Policy for local times that fall into, or repeat during, a DST transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop intervals whose bounds fall in the DST gap (e.g. 2:30 AM during spring forward)
    Skip,
    /// Shift to the first valid minute after the gap
    #[default]
    ShiftForward,
    /// Keep the wall-clock reading and apply the offset in force before the transition
    WallClock,
}

/// Attach `tz` to a local datetime according to `policy`.
///
/// Ambiguous times (the repeated hour when clocks fall back) always resolve to
/// the earlier instant. Returns `None` only for `DstPolicy::Skip` on a
/// nonexistent time.
pub fn resolve_local(tz: &Tz, local: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => (1..=MAX_GAP_MINUTES)
                .map(|m| local + Duration::minutes(m))
                .find_map(|shifted| tz.from_local_datetime(&shifted).earliest()),
            DstPolicy::WallClock => {
                let before = local - Duration::minutes(MAX_GAP_MINUTES);
                let offset = tz.offset_from_local_datetime(&before).earliest()?.fix();
                let utc = DateTime::<Utc>::from_naive_utc_and_offset(local - offset, Utc);
                Some(utc.with_timezone(tz))
            }
        },
    }
}
