/// Wall-clock time helpers
///
/// This module handles:
/// - Parsing `HH:MM` strings into minutes since midnight (clock.rs)
/// - Day-rollover aware distances between clock times (clock.rs)
/// - Countdown text until the next prayer (countdown.rs)
/// - Turkish long dates for the header (calendar.rs)

pub mod calendar;
pub mod clock;
pub mod countdown;

pub use calendar::turkish_long_date;
pub use clock::{minutes_until, to_minutes_of_day, TimeError};
pub use countdown::{time_remaining, Countdown};
