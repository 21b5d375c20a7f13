/// Render-ready snapshot of the prayer schedule
///
/// Rebuilt from the last fetched schedule on every clock tick and after
/// every fetch. Building it never does I/O.

use chrono::{NaiveDateTime, Timelike};

use super::data::PrayerTimes;
use crate::api::Fetched;
use crate::prayer::{resolve, ResolvedState};
use crate::time::{minutes_until, time_remaining, to_minutes_of_day, Countdown, TimeError};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayState {
    pub schedule: Option<PrayerTimes>,
    pub resolved: Option<ResolvedState>,
    /// Time left until `resolved.next` begins
    pub countdown: Option<Countdown>,
    /// Whole minutes of day between now and `resolved.next`
    pub minutes_to_next: Option<u32>,
    pub is_loading: bool,
    /// The schedule is a local estimate, not real data
    pub is_degraded: bool,
    /// Set when the schedule holds a time that is not `HH:MM`
    pub error: Option<TimeError>,
}

impl DisplayState {
    pub fn compute(schedule: Option<&Fetched<PrayerTimes>>, is_loading: bool, now: NaiveDateTime) -> Self {
        let Some(fetched) = schedule else {
            return Self {
                is_loading,
                ..Self::default()
            };
        };

        let mut state = Self {
            schedule: Some(fetched.data.clone()),
            is_loading,
            is_degraded: fetched.is_degraded(),
            ..Self::default()
        };

        let now_minutes = now.hour() * 60 + now.minute();
        let times = &fetched.data.times;

        let outcome = resolve(times, now_minutes).and_then(|resolved| {
            let next_time = times.get(resolved.next);
            let countdown = time_remaining(next_time, now)?;
            let minutes = minutes_until(to_minutes_of_day(next_time)?, now_minutes);
            Ok((resolved, countdown, minutes))
        });

        match outcome {
            Ok((resolved, countdown, minutes)) => {
                state.resolved = Some(resolved);
                state.countdown = Some(countdown);
                state.minutes_to_next = Some(minutes);
            }
            Err(err) => {
                tracing::error!(location = %fetched.data.id, error = %err, "Cannot resolve prayer schedule");
                state.error = Some(err);
            }
        }

        state
    }

    /// Countdown as shown to the user, e.g. "1s 15dk"
    pub fn countdown_text(&self) -> Option<String> {
        self.countdown.map(|countdown| countdown.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::service::DataSource;
    use crate::api::fallback::estimated_prayer_times;
    use crate::prayer::PrayerName;
    use chrono::NaiveDate;

    fn now(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn fetched(source: DataSource) -> Fetched<PrayerTimes> {
        Fetched {
            data: estimated_prayer_times("Ankara", NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()),
            source,
        }
    }

    #[test]
    fn test_nothing_fetched_yet() {
        let state = DisplayState::compute(None, true, now(12, 0));

        assert!(state.is_loading);
        assert!(state.schedule.is_none());
        assert_eq!(state.countdown_text(), None);
    }

    #[test]
    fn test_evening_countdown_to_yatsi() {
        let schedule = fetched(DataSource::Live);
        let state = DisplayState::compute(Some(&schedule), false, now(18, 0));

        let resolved = state.resolved.unwrap();
        assert_eq!(resolved.current, Some(PrayerName::Aksam));
        assert_eq!(resolved.next, PrayerName::Yatsi);
        assert_eq!(state.countdown_text().as_deref(), Some("1s 15dk"));
        assert!(!state.is_degraded);
    }

    #[test]
    fn test_night_countdown_to_tomorrows_imsak() {
        let schedule = fetched(DataSource::Cache);
        let state = DisplayState::compute(Some(&schedule), false, now(23, 0));

        assert_eq!(state.resolved.unwrap().next, PrayerName::Imsak);
        assert_eq!(state.countdown_text().as_deref(), Some("6s 30dk"));
        assert_eq!(state.minutes_to_next, Some(390));
    }

    #[test]
    fn test_fallback_schedule_is_flagged() {
        let schedule = fetched(DataSource::Fallback);
        let state = DisplayState::compute(Some(&schedule), false, now(9, 0));

        assert!(state.is_degraded);
        assert_eq!(state.resolved.unwrap().current, Some(PrayerName::Gunes));
    }

    #[test]
    fn test_malformed_schedule_reports_error() {
        let mut schedule = fetched(DataSource::Live);
        schedule.data.times.aksam = "later".to_string();

        let state = DisplayState::compute(Some(&schedule), false, now(9, 0));

        assert_eq!(state.error, Some(TimeError::Malformed("later".to_string())));
        assert!(state.resolved.is_none());
        assert!(state.schedule.is_some());
    }
}
