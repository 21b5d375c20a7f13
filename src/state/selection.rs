/// The city and district the user picked, and the district picker helpers

use crate::api::fallback::{fold_turkish, slugify};
use crate::state::data::LocationResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedLocation {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    city: Option<SelectedLocation>,
    district: Option<SelectedLocation>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose a city. Any previously chosen district belongs to the old
    /// city, so it is cleared.
    pub fn select_city(&mut self, id: &str, name: &str) {
        self.city = Some(SelectedLocation {
            id: id.to_string(),
            name: name.to_string(),
        });
        self.district = None;
    }

    /// Choose a district of the current city. Ignored without a city.
    pub fn select_district(&mut self, id: &str, name: &str) -> bool {
        if self.city.is_none() {
            return false;
        }
        self.district = Some(SelectedLocation {
            id: id.to_string(),
            name: name.to_string(),
        });
        true
    }

    pub fn city(&self) -> Option<&SelectedLocation> {
        self.city.as_ref()
    }

    pub fn district(&self) -> Option<&SelectedLocation> {
        self.district.as_ref()
    }

    /// The ID prayer times are fetched for: the district if chosen, else the city
    pub fn active_location_id(&self) -> Option<&str> {
        self.district
            .as_ref()
            .or(self.city.as_ref())
            .map(|location| location.id.as_str())
    }

    /// "City, District", or just "City"
    pub fn display_name(&self) -> Option<String> {
        let city = self.city.as_ref()?;
        Some(match &self.district {
            Some(district) => format!("{}, {}", city.name, district.name),
            None => city.name.clone(),
        })
    }
}

/// Entries whose name contains `query`, ignoring case and Turkish dotted
/// and dotless letters. A blank query keeps everything.
pub fn filter_by_name<'a>(locations: &'a [LocationResult], query: &str) -> Vec<&'a LocationResult> {
    let needle = fold_turkish(query.trim());
    locations
        .iter()
        .filter(|location| fold_turkish(&location.text).contains(&needle))
        .collect()
}

/// A district typed in by hand when the list has no match.
/// The name doubles as the ID, which the API accepts as a location query.
pub fn manual_district(name: &str) -> Option<LocationResult> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(LocationResult {
        id: name.to_string(),
        text: name.to_string(),
        slug: slugify(name),
    })
}
