//! Tuning constants for slot resolution.

use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::time::TimeOfDay;

/// Resolver settings. Every field has a default matching the usual
/// 09:00-17:00 working day and 30-minute slot grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Step between candidate start times, in minutes.
    pub granularity_minutes: u32,
    /// Start of the working window assumed for calendars and default hours.
    pub work_start: TimeOfDay,
    /// End of the working window.
    pub work_end: TimeOfDay,
    /// Number of ranked slots returned.
    pub top_n: usize,
    pub dst_policy: DstPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            granularity_minutes: 30,
            work_start: TimeOfDay::new(9, 0).unwrap_or(TimeOfDay::MIDNIGHT),
            work_end: TimeOfDay::new(17, 0).unwrap_or(TimeOfDay::END_OF_DAY),
            top_n: 3,
            dst_policy: DstPolicy::default(),
        }
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.granularity_minutes == 0 {
            return Err(SlotError::InvalidConfig(
                "granularity_minutes must be positive".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(SlotError::InvalidConfig(
                "top_n must be positive".to_string(),
            ));
        }
        if self.work_start >= self.work_end {
            return Err(SlotError::InvalidConfig(format!(
                "work_start {} must be before work_end {}",
                self.work_start, self.work_end
            )));
        }
        Ok(())
    }
}
