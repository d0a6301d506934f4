// Date handling for the MM/DD/YYYY layout records are stored in.
use chrono::{Duration, NaiveDate};
use regex::Regex;
use shared::models::{FieldValue, DATE_FORMAT};
use std::sync::OnceLock;

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("static date pattern"))
}

/// Parses `M/D/YYYY` or `MM/DD/YYYY` text into a real calendar date.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let caps = date_pattern().captures(text)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn is_valid_calendar_date(text: &str) -> bool {
    parse_calendar_date(text).is_some()
}

/// Zero-pads a valid date into the stored layout: "1/5/2024" -> "01/05/2024".
pub fn canonical_date(text: &str) -> Option<String> {
    parse_calendar_date(text).map(|d| d.format(DATE_FORMAT).to_string())
}

// Spreadsheet serial 60 is the 1900-02-29 that never existed; serials after it
// are one day ahead of the real calendar.
const PHANTOM_LEAP_DAY_SERIAL: i64 = 60;

/// Converts a spreadsheet serial day number (1 = 01/01/1900) into `MM/DD/YYYY`.
///
/// Anything that is not a number comes back unchanged. Fractions (time of day)
/// are dropped. Serials chrono cannot represent come back as plain text so
/// date validation rejects them later.
pub fn convert_serial_date(value: &FieldValue) -> FieldValue {
    let serial = match value {
        FieldValue::Number(n) if n.is_finite() => n.floor() as i64,
        FieldValue::Number(_) => return FieldValue::Text(value.as_text()),
        other => return other.clone(),
    };

    let shift = if serial > PHANTOM_LEAP_DAY_SERIAL { 2 } else { 1 };
    let converted = serial
        .checked_sub(shift)
        .and_then(Duration::try_days)
        .zip(NaiveDate::from_ymd_opt(1900, 1, 1))
        .and_then(|(days, epoch)| epoch.checked_add_signed(days));

    match converted {
        Some(date) => FieldValue::Text(date.format(DATE_FORMAT).to_string()),
        None => FieldValue::Text(value.as_text()),
    }
}
