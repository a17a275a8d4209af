use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone};

/// Full month names as the pt-BR locale writes them
pub const PT_BR_MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Short month names as the pt-BR locale writes them (with the abbreviation dot)
pub const PT_BR_SHORT_MONTHS: [&str; 12] = [
    "jan.", "fev.", "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.", "dez.",
];

/// Parse a strict `HH:MM` time into minutes since midnight.
///
/// Accepts one or two hour digits (`7:05`, `07:05`) and exactly two minute
/// digits, surrounding whitespace ignored. Anything else is `None`.
pub fn parse_time_to_minutes(time_str: &str) -> Option<u32> {
    let (hour, minute) = time_str.trim().split_once(':')?;

    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hour = hour.parse::<u32>().ok()?;
    let minute = minute.parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }

    Some(hour * 60 + minute)
}

/// Sunday on or before the given date
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Uppercase three-letter month label, e.g. `FEV`
pub fn month_label(date: NaiveDate) -> String {
    PT_BR_SHORT_MONTHS[date.month0() as usize]
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_uppercase()
}

/// Lowercase month and year, e.g. `fevereiro 2026`
pub fn month_title(date: NaiveDate) -> String {
    format!("{} {}", PT_BR_MONTHS[date.month0() as usize], date.year())
}

/// 24-hour wall-clock time, e.g. `09:05:00`
pub fn format_clock<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.format("%H:%M:%S").to_string()
}

/// Today's date on the local wall clock
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
