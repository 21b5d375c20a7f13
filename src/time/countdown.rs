/// Remaining-time formatter for the next prayer
///
/// Unlike the resolver this needs a real calendar date, because a target
/// that already passed today has to be materialized as tomorrow's instant
/// before subtracting.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use std::fmt;

use super::clock::{to_minutes_of_day, TimeError};

/// Whole hours and minutes until a target, truncated toward zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub hours: i64,
    pub minutes: i64,
}

impl fmt::Display for Countdown {
    /// Rendered as `"{hours}s {minutes}dk"` (saat / dakika)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s {}dk", self.hours, self.minutes)
    }
}

/// Time left from `now` until the next occurrence of `target` (`HH:MM`).
///
/// If `target` today is strictly before `now`, tomorrow's `target` is used.
pub fn time_remaining(target: &str, now: NaiveDateTime) -> Result<Countdown, TimeError> {
    let target_minutes = to_minutes_of_day(target)?;
    let target_time = NaiveTime::from_hms_opt(target_minutes / 60, target_minutes % 60, 0)
        .ok_or_else(|| TimeError::Malformed(target.to_string()))?;

    let mut candidate = now.date().and_time(target_time);
    if candidate < now {
        candidate += Duration::days(1);
    }

    let remaining = (candidate - now).num_minutes();

    Ok(Countdown {
        hours: remaining / 60,
        minutes: remaining % 60,
    })
}
