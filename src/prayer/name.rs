use std::fmt;

/// One of the six daily prayers, in the order they occur
///
/// The order is cyclic: Yatsı's period runs past midnight into the next
/// day's İmsak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrayerName {
    Imsak,
    Gunes,
    Ogle,
    Ikindi,
    Aksam,
    Yatsi,
}

impl PrayerName {
    /// All prayers in declaration order
    pub const ALL: [PrayerName; 6] = [
        PrayerName::Imsak,
        PrayerName::Gunes,
        PrayerName::Ogle,
        PrayerName::Ikindi,
        PrayerName::Aksam,
        PrayerName::Yatsi,
    ];

    /// Key used by the provider's `times` object
    pub fn key(self) -> &'static str {
        match self {
            PrayerName::Imsak => "imsak",
            PrayerName::Gunes => "gunes",
            PrayerName::Ogle => "ogle",
            PrayerName::Ikindi => "ikindi",
            PrayerName::Aksam => "aksam",
            PrayerName::Yatsi => "yatsi",
        }
    }

    /// Turkish display label
    pub fn label(self) -> &'static str {
        match self {
            PrayerName::Imsak => "İmsak",
            PrayerName::Gunes => "Güneş",
            PrayerName::Ogle => "Öğle",
            PrayerName::Ikindi => "İkindi",
            PrayerName::Aksam => "Akşam",
            PrayerName::Yatsi => "Yatsı",
        }
    }
}

impl fmt::Display for PrayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
