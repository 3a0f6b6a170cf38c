mod parse;


use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike,
    Utc,
};
use log::{debug, error};
use regex::Captures;

use self::parse::{parse_date_string, ParsedDate};
use crate::constants;

/// Renders an integer with at least two digits.
///
/// Values above 99 are not clamped and pass through as they are.
pub fn pad2(value: u32) -> String {
    format!("{value:02}")
}

/// Two digit month code of an English month name or abbreviation.
pub fn month_code(token: &str) -> Option<&'static str> {
    constants::MONTH_CODES.get(token).copied()
}

/// Converts date mentions and date values into `YYYY-MM-DD[ HH:MM:SS]`.
///
/// Timestamps and values carrying an offset are rendered in the system's
/// local time unless a fixed offset is configured. Dates without a year are
/// placed relative to "today", which can be pinned with
/// [`DateNormalizer::with_reference_date`].
#[derive(Clone, Debug, Default)]
pub struct DateNormalizer {
    offset: Option<FixedOffset>,
    reference: Option<NaiveDate>,
}

impl DateNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn utc() -> Self {
        Self::new().with_offset(Utc.fix())
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference = Some(date);
        self
    }

    pub fn today(&self) -> NaiveDate {
        if let Some(reference) = self.reference {
            return reference;
        }

        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
            None => Local::now().date_naive(),
        }
    }

    /// Rewrites the first month-day-year, day-month-year and month-day
    /// mention of `text`, in that order.
    pub fn fix_text(&self, text: &str) -> String {
        let text = constants::MONTH_DAY_YEAR.replace(text, |caps: &Captures| {
            Self::join_date(&caps[3], &caps[1], &caps[2]).unwrap_or_else(|| caps[0].to_owned())
        });
        let text = constants::DAY_MONTH_YEAR.replace(&text, |caps: &Captures| {
            Self::join_date(&caps[3], &caps[2], &caps[1]).unwrap_or_else(|| caps[0].to_owned())
        });
        let text = constants::MONTH_DAY.replace(&text, |caps: &Captures| {
            let year = Self::guess_year(self.today(), &caps[1]).to_string();
            Self::join_date(&year, &caps[1], &caps[2]).unwrap_or_else(|| caps[0].to_owned())
        });
        text.into_owned()
    }

    /// Normalizes a value read from an attribute.
    ///
    /// Exactly 10 digits are Unix seconds, exactly 13 digits Unix
    /// milliseconds, anything else goes through the lenient string parser.
    /// Values that can't be read are logged and returned unchanged.
    pub fn date_fmt(&self, value: &str) -> String {
        match self.read_value(value) {
            Some((datetime, with_time)) => Self::canonical(&datetime, with_time),
            None => {
                error!("unable to convert '{}'", value);
                value.to_owned()
            }
        }
    }

    fn read_value(&self, value: &str) -> Option<(NaiveDateTime, bool)> {
        if constants::UNIX_SECONDS.is_match(value) {
            let millis = value.parse::<i64>().ok()?.checked_mul(1000)?;
            return self.millis_to_local(millis).map(|datetime| (datetime, true));
        }

        if constants::UNIX_MILLIS.is_match(value) {
            let millis = value.parse::<i64>().ok()?;
            return self.millis_to_local(millis).map(|datetime| (datetime, true));
        }

        let datetime = match parse_date_string(value)? {
            ParsedDate::Instant(instant) => self.to_local(&instant),
            ParsedDate::Local(datetime) => datetime,
            ParsedDate::Day(date) => date.and_hms_opt(0, 0, 0)?,
        };
        Some((datetime, value.contains(':')))
    }

    fn millis_to_local(&self, millis: i64) -> Option<NaiveDateTime> {
        let instant = DateTime::from_timestamp_millis(millis)?;
        debug!("timestamp {} is {}", millis, instant);
        Some(self.to_local(&instant))
    }

    fn to_local<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> NaiveDateTime {
        match self.offset {
            Some(offset) => instant.with_timezone(&offset).naive_local(),
            None => instant.with_timezone(&Local).naive_local(),
        }
    }

    fn canonical(datetime: &NaiveDateTime, with_time: bool) -> String {
        let mut canonical = format!(
            "{:04}-{}-{}",
            datetime.year(),
            pad2(datetime.month()),
            pad2(datetime.day())
        );
        if with_time {
            canonical.push_str(&format!(
                " {}:{}:{}",
                pad2(datetime.hour()),
                pad2(datetime.minute()),
                pad2(datetime.second())
            ));
        }
        canonical
    }

    fn join_date(year: &str, month: &str, day: &str) -> Option<String> {
        let month = month_code(month)?;
        let day = day.parse::<u32>().ok()?;
        Some(format!("{year}-{month}-{}", pad2(day)))
    }

    // A month later in the year than today most likely belongs to last year.
    // Dates close to a full year away can't be told apart.
    fn guess_year(today: NaiveDate, month: &str) -> i32 {
        let month = month_code(month)
            .and_then(|code| code.parse::<u32>().ok())
            .unwrap_or_default();
        if month > today.month() {
            today.year() - 1
        } else {
            today.year()
        }
    }
}
