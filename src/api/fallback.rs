/// Locally synthesized data for when the API is unreachable
///
/// Everything here is deterministic and needs no network, so the app can
/// always show something. Results built here have placeholder IDs that
/// mean nothing to the provider.

use chrono::NaiveDate;

use crate::state::data::{LocationResult, PrayerDate, PrayerTimes, Times};

/// Türkiye's 81 provinces
pub const TURKISH_CITIES: [&str; 81] = [
    "Adana", "Adıyaman", "Afyonkarahisar", "Ağrı", "Amasya", "Ankara", "Antalya", "Artvin", "Aydın", "Balıkesir",
    "Bilecik", "Bingöl", "Bitlis", "Bolu", "Burdur", "Bursa", "Çanakkale", "Çankırı", "Çorum", "Denizli",
    "Diyarbakır", "Edirne", "Elazığ", "Erzincan", "Erzurum", "Eskişehir", "Gaziantep", "Giresun", "Gümüşhane", "Hakkari",
    "Hatay", "Isparta", "Mersin", "İstanbul", "İzmir", "Kars", "Kastamonu", "Kayseri", "Kırklareli", "Kırşehir",
    "Kocaeli", "Konya", "Kütahya", "Malatya", "Manisa", "Kahramanmaraş", "Mardin", "Muğla", "Muş", "Nevşehir",
    "Niğde", "Ordu", "Rize", "Sakarya", "Samsun", "Siirt", "Sinop", "Sivas", "Tekirdağ", "Tokat",
    "Trabzon", "Tunceli", "Şanlıurfa", "Uşak", "Van", "Yozgat", "Zonguldak", "Aksaray", "Bayburt", "Karaman",
    "Kırıkkale", "Batman", "Şırnak", "Bartın", "Ardahan", "Iğdır", "Yalova", "Karabük", "Kilis", "Osmaniye", "Düzce",
];

/// Representative schedule shown when real times cannot be fetched
const ESTIMATED_TIMES: [&str; 6] = ["05:30", "07:00", "12:30", "15:15", "17:45", "19:15"];

/// Lower-case and strip Turkish diacritics, so "İSTANBUL", "istanbul" and
/// "Istanbul" all compare equal
pub fn fold_turkish(value: &str) -> String {
    value
        .chars()
        .flat_map(|c| {
            let folded = match c {
                'İ' | 'I' | 'ı' | 'î' | 'Î' => 'i',
                'Ş' | 'ş' => 's',
                'Ğ' | 'ğ' => 'g',
                'Ç' | 'ç' => 'c',
                'Ö' | 'ö' => 'o',
                'Ü' | 'ü' | 'û' | 'Û' => 'u',
                'â' | 'Â' => 'a',
                other => other,
            };
            folded.to_lowercase()
        })
        .collect()
}

/// ASCII slug: "1. İlçe" -> "1-ilce"
pub fn slugify(value: &str) -> String {
    let folded = fold_turkish(value);
    let mut slug = String::with_capacity(folded.len());

    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Cities from the static list whose name contains `query`.
/// With no real ID known, each entry identifies itself by name.
pub fn cities_matching(query: &str) -> Vec<LocationResult> {
    let needle = fold_turkish(query.trim());

    TURKISH_CITIES
        .iter()
        .filter(|city| fold_turkish(city).contains(&needle))
        .map(|city| LocationResult {
            id: city.to_string(),
            text: city.to_string(),
            slug: slugify(city),
        })
        .collect()
}

/// Three placeholder districts derived from the city ID
pub fn placeholder_districts(city_id: &str) -> Vec<LocationResult> {
    [("merkez", "Merkez"), ("1", "1. İlçe"), ("2", "2. İlçe")]
        .into_iter()
        .map(|(suffix, text)| LocationResult {
            id: format!("{}-{}", city_id, suffix),
            text: text.to_string(),
            slug: slugify(text),
        })
        .collect()
}

/// A fixed schedule stamped with `today`
pub fn estimated_prayer_times(location_id: &str, today: NaiveDate) -> PrayerTimes {
    let [imsak, gunes, ogle, ikindi, aksam, yatsi] = ESTIMATED_TIMES;

    PrayerTimes {
        id: location_id.to_string(),
        name: location_id.to_string(),
        date: PrayerDate {
            hijri: String::new(),
            gregorian: today.format("%Y-%m-%d").to_string(),
        },
        times: Times {
            imsak: imsak.to_string(),
            gunes: gunes.to_string(),
            ogle: ogle.to_string(),
            ikindi: ikindi.to_string(),
            aksam: aksam.to_string(),
            yatsi: yatsi.to_string(),
        },
    }
}
