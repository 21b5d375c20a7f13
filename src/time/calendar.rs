/// Turkish calendar names for the date line

use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran",
    "Temmuz", "Ağustos", "Eylül", "Ekim", "Kasım", "Aralık",
];

// Monday first, matching `Weekday::num_days_from_monday`
const WEEKDAYS: [&str; 7] = [
    "Pazartesi", "Salı", "Çarşamba", "Perşembe", "Cuma", "Cumartesi", "Pazar",
];

/// Long Turkish date, e.g. "10 Mart 2024 Pazar"
pub fn turkish_long_date(date: NaiveDate) -> String {
    let month = MONTHS[date.month0() as usize];
    let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
    format!("{} {} {} {}", date.day(), month, date.year(), weekday)
}
