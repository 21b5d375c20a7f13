/// Shared data structures for the application state
///
/// These structs mirror the JSON returned by the prayer times API and
/// flow unchanged from the API layer to the UI layer. Field names must
/// stay exactly as the provider sends them.

use serde::{Deserialize, Serialize};

use crate::prayer::PrayerName;

/// A city or district returned by a search
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LocationResult {
    /// Provider location ID (or a synthetic one for fallback data)
    pub id: String,
    /// Display name (e.g., "İstanbul")
    pub text: String,
    /// URL-friendly name (e.g., "istanbul")
    pub slug: String,
}

/// Prayer times for one location on one day
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PrayerTimes {
    pub id: String,
    pub name: String,
    pub date: PrayerDate,
    pub times: Times,
}

/// The day the schedule belongs to, in both calendars
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PrayerDate {
    pub hijri: String,
    pub gregorian: String,
}

/// The six daily timestamps as `HH:MM`, in declaration order
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Times {
    pub imsak: String,
    pub gunes: String,
    pub ogle: String,
    pub ikindi: String,
    pub aksam: String,
    pub yatsi: String,
}

impl Times {
    /// Get the raw `HH:MM` value for a prayer
    pub fn get(&self, prayer: PrayerName) -> &str {
        match prayer {
            PrayerName::Imsak => &self.imsak,
            PrayerName::Gunes => &self.gunes,
            PrayerName::Ogle => &self.ogle,
            PrayerName::Ikindi => &self.ikindi,
            PrayerName::Aksam => &self.aksam,
            PrayerName::Yatsi => &self.yatsi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_provider_payload() {
        let json = r#"{
            "id": "9541",
            "name": "İSTANBUL",
            "date": { "hijri": "1 Ramazan 1445", "gregorian": "2024-03-11" },
            "times": {
                "imsak": "05:30", "gunes": "07:00", "ogle": "12:30",
                "ikindi": "15:15", "aksam": "17:45", "yatsi": "19:15"
            }
        }"#;

        let parsed: PrayerTimes = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.id, "9541");
        assert_eq!(parsed.date.hijri, "1 Ramazan 1445");
        assert_eq!(parsed.times.get(PrayerName::Ikindi), "15:15");
        assert_eq!(parsed.times.get(PrayerName::Yatsi), "19:15");
    }

    #[test]
    fn test_serializes_with_provider_field_names() {
        let location = LocationResult {
            id: "539".to_string(),
            text: "Ankara".to_string(),
            slug: "ankara".to_string(),
        };

        let value = serde_json::to_value(&location).unwrap();

        assert_eq!(value, serde_json::json!({ "id": "539", "text": "Ankara", "slug": "ankara" }));
    }
}
