use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wire placeholder for an absent value.
pub const SENTINEL: &str = "N/A";

static ISO_DATE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:[T ].*)?$").expect("valid regex")
});

/// A calendar date as carried by a record, or the sentinel for "absent".
///
/// `Missing` orders before every known date, so a descending sort puts
/// sentinel rows last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RecordDate {
    #[default]
    Missing,
    Known(NaiveDate),
}

impl RecordDate {
    /// Parses `YYYY-MM-DD`, optionally followed by a `T` or space and a time
    /// part. Anything else, including impossible calendar dates, is `Missing`.
    pub fn parse(raw: &str) -> Self {
        parse_calendar_date(raw).map_or(Self::Missing, Self::Known)
    }

    pub fn known(self) -> Option<NaiveDate> {
        match self {
            Self::Known(date) => Some(date),
            Self::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Same calendar day. A missing date never matches.
    pub fn same_day(self, other: NaiveDate) -> bool {
        self.known() == Some(other)
    }
}

impl From<NaiveDate> for RecordDate {
    fn from(value: NaiveDate) -> Self {
        Self::Known(value)
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Missing => f.write_str(SENTINEL),
        }
    }
}

impl Serialize for RecordDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Missing, Self::parse))
    }
}

/// Parses the date part of an ISO date or timestamp string.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let captures = ISO_DATE_PREFIX.captures(raw.trim())?;
    let year = captures[1].parse::<i32>().ok()?;
    let month = captures[2].parse::<u32>().ok()?;
    let day = captures[3].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn parses_plain_and_timestamp_forms() {
        assert_eq!(RecordDate::parse("2025-03-15"), RecordDate::Known(ymd(2025, 3, 15)));
        assert_eq!(
            RecordDate::parse("2025-03-15T23:59:00Z"),
            RecordDate::Known(ymd(2025, 3, 15))
        );
        assert_eq!(
            RecordDate::parse(" 2025-03-15 08:00 "),
            RecordDate::Known(ymd(2025, 3, 15))
        );
    }

    #[test]
    fn sentinel_and_garbage_are_missing() {
        for raw in ["N/A", "", "tomorrow", "2025-02-30", "2025-13-01", "2025-3-1", "2025-03-15x"] {
            assert!(RecordDate::parse(raw).is_missing(), "{raw:?} should be missing");
        }
    }

    #[test]
    fn missing_orders_before_known() {
        assert!(RecordDate::Missing < RecordDate::Known(ymd(1, 1, 1)));
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        let date = RecordDate::parse("2025-01-10T17:45:00+02:00");
        assert!(date.same_day(ymd(2025, 1, 10)));
        assert!(!date.same_day(ymd(2025, 1, 11)));
        assert!(!RecordDate::Missing.same_day(ymd(2025, 1, 10)));
    }

    #[test]
    fn serde_uses_sentinel_for_missing() {
        let json = serde_json::to_string(&RecordDate::Missing).expect("serialize");
        assert_eq!(json, "\"N/A\"");
        let parsed: RecordDate = serde_json::from_str("null").expect("deserialize");
        assert!(parsed.is_missing());
        let parsed: RecordDate = serde_json::from_str("\"2025-02-01\"").expect("deserialize");
        assert_eq!(parsed, RecordDate::Known(ymd(2025, 2, 1)));
    }
}
