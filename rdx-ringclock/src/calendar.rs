//! Wall-clock timestamps and the date fields that drive the rings.

use crate::error::Error;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use std::fmt;

/// Naive layouts accepted by [`Timestamp::parse`], tried in order.
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A wall-clock instant at second resolution, already expressed in the dial's
/// time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime.with_nanosecond(0).unwrap_or(datetime))
    }

    /// Builds a timestamp from calendar components, or `None` if they do not
    /// name a real instant.
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)?
            .and_hms_opt(hour, minute, second)
            .map(Self::new)
    }

    /// The current wall-clock time in `zone`.
    pub fn now(zone: &Tz) -> Self {
        Self::new(Utc::now().with_timezone(zone).naive_local())
    }

    /// Parses a date-time text representation.
    ///
    /// Accepts RFC 3339 (the offset is converted into `zone`), naive
    /// `YYYY-MM-DDTHH:MM:SS[.fff]`, the same with a space separator,
    /// `YYYY-MM-DDTHH:MM`, and a bare `YYYY-MM-DD` meaning midnight. Naive
    /// input is taken to already be wall-clock time in `zone`.
    pub fn parse(input: &str, zone: &Tz) -> Result<Self, Error> {
        let text = input.trim();
        if text.is_empty() {
            return Err(Error::InvalidTimestamp {
                input: input.to_string(),
                reason: "no date given".to_string(),
            });
        }

        if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
            return Ok(Self::new(datetime.with_timezone(zone).naive_local()));
        }
        for format in NAIVE_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
                return Ok(Self::new(datetime));
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Self::new)
            .ok_or_else(|| Error::InvalidTimestamp {
                input: input.to_string(),
                reason: "expected an RFC 3339 or YYYY-MM-DD[THH:MM[:SS]] date".to_string(),
            })
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    pub fn fields(&self) -> DateFields {
        DateFields::derive(self)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

/// The six ring-driving fields of a timestamp, plus its year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFields {
    pub year: i32,
    /// 1–12.
    pub month: u32,
    /// 1–31.
    pub day: u32,
    /// Monday = 0 … Sunday = 6.
    pub weekday: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl DateFields {
    pub fn derive(timestamp: &Timestamp) -> Self {
        let dt = timestamp.datetime();
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            weekday: normalize_weekday(dt.weekday().num_days_from_sunday()),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }

    /// Day count of this timestamp's month.
    pub fn days_in_month(&self) -> u32 {
        // Always Some: the fields come from a valid date.
        days_in_month(self.month, self.year).unwrap_or(31)
    }
}

/// Rotates a Sunday-based weekday (Sunday = 0) to Monday = 0 … Sunday = 6.
pub fn normalize_weekday(raw: u32) -> u32 {
    (raw + 6) % 7
}

/// Number of days in `month` (1–12) of `year`, found as the day before the
/// first of the following month. `None` for a month outside 1–12.
pub fn days_in_month(month: u32, year: i32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}
