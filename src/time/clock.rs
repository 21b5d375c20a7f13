/// Minutes-of-day arithmetic for `HH:MM` clock strings
///
/// Prayer timestamps carry no date. Everything the resolver needs is
/// expressed as minutes since midnight in `[0, 1440)`.

use thiserror::Error;

/// Number of minutes in one calendar day
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Errors raised while reading clock times
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// The value is not a valid `HH:MM` time (hours 0-23, minutes 0-59)
    #[error("malformed time {0:?}, expected HH:MM")]
    Malformed(String),
}

/// Convert an `HH:MM` string into minutes since midnight.
///
/// Surrounding whitespace is ignored. Single-digit hours (`5:30`) are
/// accepted since the value is still unambiguous.
pub fn to_minutes_of_day(time: &str) -> Result<u32, TimeError> {
    let malformed = || TimeError::Malformed(time.to_string());

    let (hours, minutes) = time.trim().split_once(':').ok_or_else(malformed)?;
    if hours.is_empty() || minutes.len() != 2 {
        return Err(malformed());
    }

    let hours: u32 = parse_digits(hours).ok_or_else(malformed)?;
    let minutes: u32 = parse_digits(minutes).ok_or_else(malformed)?;

    if hours > 23 || minutes > 59 {
        return Err(malformed());
    }

    Ok(hours * 60 + minutes)
}

/// Parse ASCII digits only (`str::parse` would also accept a leading `+`)
fn parse_digits(value: &str) -> Option<u32> {
    if value.len() > 2 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Minutes from `now` until `target`, both in minutes of day.
///
/// A target earlier than `now` is taken to be tomorrow, so the result is
/// never negative and always below one full day.
pub fn minutes_until(target: u32, now: u32) -> u32 {
    if target >= now {
        target - now
    } else {
        (MINUTES_PER_DAY - now) + target
    }
}
