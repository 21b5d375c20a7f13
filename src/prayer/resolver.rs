/// Prayer window resolver
///
/// Given a day's six timestamps and the current minute of day, decides
/// which prayer period is in effect and which one starts next. The
/// function is pure: the caller supplies "now", so it can be re-run on
/// every clock tick without any I/O.

use super::name::PrayerName;
use crate::state::data::Times;
use crate::time::{to_minutes_of_day, TimeError};

/// The active period and the one that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedState {
    /// `None` only for a schedule that is not in daily order
    pub current: Option<PrayerName>,
    pub next: PrayerName,
}

/// Resolve the active prayer period for `now_minutes` (minutes since midnight).
///
/// From Yatsı until the next İmsak the active period is Yatsı, whether
/// "now" is before or after midnight. Otherwise the period is the first
/// pair of consecutive prayers with `lower <= now < upper`.
///
/// Any entry that is not valid `HH:MM` is an error from the data source
/// and is returned as-is.
pub fn resolve(times: &Times, now_minutes: u32) -> Result<ResolvedState, TimeError> {
    let mut minutes = [0u32; 6];
    for (slot, prayer) in minutes.iter_mut().zip(PrayerName::ALL) {
        *slot = to_minutes_of_day(times.get(prayer))?;
    }

    let imsak = minutes[0];
    let yatsi = minutes[5];

    if now_minutes >= yatsi || now_minutes < imsak {
        return Ok(ResolvedState {
            current: Some(PrayerName::Yatsi),
            next: PrayerName::Imsak,
        });
    }

    for i in 0..PrayerName::ALL.len() - 1 {
        if minutes[i] <= now_minutes && now_minutes < minutes[i + 1] {
            return Ok(ResolvedState {
                current: Some(PrayerName::ALL[i]),
                next: PrayerName::ALL[i + 1],
            });
        }
    }

    // Only reachable when the provider sends an out-of-order schedule
    tracing::warn!(now_minutes, ?minutes, "Prayer schedule is not in daily order");
    Ok(ResolvedState {
        current: None,
        next: PrayerName::Imsak,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> Times {
        Times {
            imsak: "05:30".to_string(),
            gunes: "07:00".to_string(),
            ogle: "12:30".to_string(),
            ikindi: "15:15".to_string(),
            aksam: "17:45".to_string(),
            yatsi: "19:15".to_string(),
        }
    }

    fn resolve_at(h: u32, m: u32) -> ResolvedState {
        resolve(&schedule(), h * 60 + m).unwrap()
    }

    fn state(current: PrayerName, next: PrayerName) -> ResolvedState {
        ResolvedState { current: Some(current), next }
    }

    #[test]
    fn test_evening_is_aksam() {
        assert_eq!(resolve_at(18, 0), state(PrayerName::Aksam, PrayerName::Yatsi));
    }

    #[test]
    fn test_after_yatsi_before_midnight() {
        assert_eq!(resolve_at(20, 0), state(PrayerName::Yatsi, PrayerName::Imsak));
        assert_eq!(resolve_at(23, 59), state(PrayerName::Yatsi, PrayerName::Imsak));
    }

    #[test]
    fn test_after_midnight_before_imsak() {
        assert_eq!(resolve_at(0, 0), state(PrayerName::Yatsi, PrayerName::Imsak));
        assert_eq!(resolve_at(2, 0), state(PrayerName::Yatsi, PrayerName::Imsak));
        assert_eq!(resolve_at(5, 29), state(PrayerName::Yatsi, PrayerName::Imsak));
    }

    #[test]
    fn test_lower_bound_is_inclusive() {
        assert_eq!(resolve_at(5, 30), state(PrayerName::Imsak, PrayerName::Gunes));
        assert_eq!(resolve_at(12, 30), state(PrayerName::Ogle, PrayerName::Ikindi));
        assert_eq!(resolve_at(19, 15), state(PrayerName::Yatsi, PrayerName::Imsak));
    }

    #[test]
    fn test_upper_bound_is_exclusive() {
        assert_eq!(resolve_at(6, 59), state(PrayerName::Imsak, PrayerName::Gunes));
        assert_eq!(resolve_at(15, 14), state(PrayerName::Ogle, PrayerName::Ikindi));
        assert_eq!(resolve_at(15, 15), state(PrayerName::Ikindi, PrayerName::Aksam));
    }

    #[test]
    fn test_every_minute_of_the_day_has_a_period() {
        let times = schedule();
        for now in 0..crate::time::clock::MINUTES_PER_DAY {
            let resolved = resolve(&times, now).unwrap();
            let current = resolved.current.expect("ordered schedule always resolves");
            let expected_next = PrayerName::ALL[(current as usize + 1) % PrayerName::ALL.len()];
            assert_eq!(resolved.next, expected_next, "at minute {}", now);
        }
    }

    #[test]
    fn test_equal_adjacent_times_skip_the_empty_period() {
        let mut times = schedule();
        times.gunes = "12:30".to_string();

        // Güneş has a zero-length window, so 12:30 belongs to Öğle
        assert_eq!(
            resolve(&times, 12 * 60 + 30).unwrap(),
            state(PrayerName::Ogle, PrayerName::Ikindi)
        );
        assert_eq!(
            resolve(&times, 8 * 60).unwrap(),
            state(PrayerName::Imsak, PrayerName::Gunes)
        );
    }

    #[test]
    fn test_malformed_entry_is_an_error() {
        let mut times = schedule();
        times.ikindi = "15.15".to_string();

        assert_eq!(
            resolve(&times, 600),
            Err(TimeError::Malformed("15.15".to_string()))
        );
    }
}
