use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::constants;

/// Result of reading a free-form date string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedDate {
    /// Carries its own offset and has to be shifted into the rendering zone.
    Instant(DateTime<FixedOffset>),
    /// Wall clock time, already local.
    Local(NaiveDateTime),
    Day(NaiveDate),
}

pub fn parse_date_string(value: &str) -> Option<ParsedDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // chrono's offset specifiers don't take a bare "Z"
    let zulu;
    let with_offset = match value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
        Some(stripped) => {
            zulu = format!("{stripped}+00:00");
            zulu.as_str()
        }
        None => value,
    };

    if let Ok(date) = DateTime::parse_from_rfc3339(with_offset) {
        return Some(ParsedDate::Instant(date));
    }

    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(ParsedDate::Instant(date));
    }

    for format in constants::OFFSET_FORMATS {
        if let Ok(date) = DateTime::parse_from_str(with_offset, format) {
            return Some(ParsedDate::Instant(date));
        }
    }

    for format in constants::LOCAL_FORMATS {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ParsedDate::Local(date));
        }
    }

    for format in constants::DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(ParsedDate::Day(date));
        }
    }

    None
}
