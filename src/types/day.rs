//! Canonical calendar-day key
//!
//! A `CalendarDay` is a local calendar date with no time-of-day or timezone.
//! Its canonical string form is zero-padded `YYYY-MM-DD`, so ordering on the
//! value agrees with lexicographic ordering on the string.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::{Result, StreaklyError};

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Years representable with a 4-digit zero-padded year component
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    /// Build from year, 1-based month and day-of-month
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(StreaklyError::InvalidDate(format!(
                "year {} outside {}..={}",
                year, MIN_YEAR, MAX_YEAR
            )));
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| {
                StreaklyError::InvalidDate(format!("{:04}-{:02}-{:02}", year, month, day))
            })
    }

    /// Parse the strict canonical form. Unpadded components, other
    /// separators and out-of-range days are all rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !well_formed {
            return Err(StreaklyError::InvalidDate(format!(
                "expected YYYY-MM-DD, got {:?}",
                s
            )));
        }

        let date = NaiveDate::parse_from_str(s, CANONICAL_FORMAT)
            .map_err(|e| StreaklyError::InvalidDate(format!("{:?}: {}", s, e)))?;
        if date.year() < MIN_YEAR {
            return Err(StreaklyError::InvalidDate(format!(
                "{:?}: year must be at least {:04}",
                s, MIN_YEAR
            )));
        }
        Ok(Self(date))
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// 1-based month
    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// Weekday index with 0 = Sunday
    pub fn weekday_index(self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// Day `n` calendar days later (`n` may be negative).
    /// Pure Y/M/D arithmetic: DST transitions cannot shift the result.
    /// Results outside 0001-01-01..=9999-12-31 are an error.
    pub fn add_days(self, n: i64) -> Result<Self> {
        Duration::try_days(n)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .filter(|date| (MIN_YEAR..=MAX_YEAR).contains(&date.year()))
            .map(Self)
            .ok_or_else(|| {
                StreaklyError::InvalidDate(format!(
                    "{} {:+} days is outside {:04}-01-01..={:04}-12-31",
                    self, n, MIN_YEAR, MAX_YEAR
                ))
            })
    }

    /// Previous day, `None` on 0001-01-01
    pub fn pred(self) -> Option<Self> {
        self.add_days(-1).ok()
    }

    /// Next day, `None` on 9999-12-31
    pub fn succ(self) -> Option<Self> {
        self.add_days(1).ok()
    }

    /// Signed number of calendar days from `earlier` to `self`
    pub fn days_since(self, earlier: CalendarDay) -> i64 {
        self.0.signed_duration_since(earlier.0).num_days()
    }

    /// Same calendar month and year
    pub fn same_month(self, other: CalendarDay) -> bool {
        self.year() == other.year() && self.month() == other.month()
    }
}

impl TryFrom<NaiveDate> for CalendarDay {
    type Error = StreaklyError;

    fn try_from(date: NaiveDate) -> Result<Self> {
        Self::from_ymd(date.year(), date.month(), date.day())
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for CalendarDay {
    type Err = StreaklyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for CalendarDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> CalendarDay {
        CalendarDay::parse(s).unwrap()
    }

    #[test]
    fn test_parse_canonical() {
        let d = day("2024-02-29");
        assert_eq!(d.year(), 2024);
        assert_eq!(d.month(), 2);
        assert_eq!(d.day(), 29);
        assert_eq!(d.to_string(), "2024-02-29");
    }

    #[test]
    fn test_parse_rejects_unpadded() {
        assert!(CalendarDay::parse("2024-3-01").is_err());
        assert!(CalendarDay::parse("2024-03-1").is_err());
        assert!(CalendarDay::parse("24-03-01").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_separators_and_suffixes() {
        assert!(CalendarDay::parse("2024/03/01").is_err());
        assert!(CalendarDay::parse("2024-03-01T00:00:00Z").is_err());
        assert!(CalendarDay::parse(" 2024-03-01").is_err());
        assert!(CalendarDay::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(CalendarDay::parse("2023-02-29").is_err());
        assert!(CalendarDay::parse("2024-13-01").is_err());
        assert!(CalendarDay::parse("2024-04-31").is_err());
        assert!(CalendarDay::parse("0000-01-01").is_err());
    }

    #[test]
    fn test_from_ymd_validates() {
        assert!(CalendarDay::from_ymd(2024, 2, 29).is_ok());
        assert!(CalendarDay::from_ymd(2023, 2, 29).is_err());
        assert!(CalendarDay::from_ymd(10000, 1, 1).is_err());
    }

    #[test]
    fn test_ordering_matches_string_ordering() {
        let mut days = vec![
            day("2024-10-01"),
            day("2024-02-09"),
            day("2023-12-31"),
            day("2024-02-10"),
        ];
        let mut strings: Vec<String> = days.iter().map(|d| d.to_string()).collect();
        days.sort();
        strings.sort();
        let sorted: Vec<String> = days.iter().map(|d| d.to_string()).collect();
        assert_eq!(sorted, strings);
    }

    #[test]
    fn test_add_days_rolls_year_and_leap_day() {
        assert_eq!(day("2023-12-31").add_days(1).unwrap(), day("2024-01-01"));
        assert_eq!(day("2024-02-28").add_days(1).unwrap(), day("2024-02-29"));
        assert_eq!(day("2024-03-01").add_days(-1).unwrap(), day("2024-02-29"));
        assert_eq!(day("2023-03-01").add_days(-1).unwrap(), day("2023-02-28"));
        assert_eq!(day("2024-01-01").add_days(-366).unwrap(), day("2022-12-31"));
    }

    #[test]
    fn test_add_days_round_trip() {
        let start = day("2023-11-15");
        for offset in 0..800 {
            let d = start.add_days(offset).unwrap();
            for n in [-400, -31, -1, 0, 1, 29, 365, 1000] {
                assert_eq!(d.add_days(n).unwrap().add_days(-n).unwrap(), d);
            }
        }
    }

    #[test]
    fn test_add_days_stays_within_canonical_years() {
        let last = day("9999-12-31");
        assert!(last.add_days(1).is_err());
        assert_eq!(last.succ(), None);
        assert_eq!(last.pred(), Some(day("9999-12-30")));
        assert_eq!(last.add_days(-1).unwrap().to_string(), "9999-12-30");

        let first = day("0001-01-01");
        assert!(first.add_days(-1).is_err());
        assert_eq!(first.pred(), None);
        assert_eq!(first.succ(), Some(day("0001-01-02")));

        // Whatever add_days returns parses back from its own string
        for n in [-1_000_000, -738_000, -1, 1, 2_900_000, 3_000_000] {
            if let Ok(d) = day("2024-03-10").add_days(n) {
                assert_eq!(CalendarDay::parse(&d.to_string()).unwrap(), d);
            }
        }
    }

    #[test]
    fn test_add_days_huge_offsets_are_errors() {
        let d = day("2024-03-10");
        assert!(d.add_days(i64::MAX).is_err());
        assert!(d.add_days(i64::MIN).is_err());
        assert!(d.add_days(200_000_000).is_err());
        assert!(d.add_days(-200_000_000).is_err());
    }

    #[test]
    fn test_try_from_naive_date_checks_year() {
        let ok = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(CalendarDay::try_from(ok).unwrap(), day("2024-02-29"));
        assert!(CalendarDay::try_from(NaiveDate::from_ymd_opt(0, 1, 1).unwrap()).is_err());
        assert!(CalendarDay::try_from(NaiveDate::from_ymd_opt(10000, 1, 1).unwrap()).is_err());
        assert!(CalendarDay::try_from(NaiveDate::from_ymd_opt(-5, 6, 1).unwrap()).is_err());
    }

    #[test]
    fn test_days_since() {
        assert_eq!(day("2024-03-10").days_since(day("2024-03-01")), 9);
        assert_eq!(day("2024-03-01").days_since(day("2024-03-10")), -9);
        assert_eq!(day("2025-01-01").days_since(day("2024-01-01")), 366);
    }

    #[test]
    fn test_weekday_index_sunday_zero() {
        // 2024-03-10 was a Sunday
        assert_eq!(day("2024-03-10").weekday_index(), 0);
        assert_eq!(day("2024-03-16").weekday_index(), 6);
        // 2024-02-01 was a Thursday
        assert_eq!(day("2024-02-01").weekday_index(), 4);
    }

    #[test]
    fn test_serde_as_canonical_string() {
        let json = serde_json::to_string(&day("2024-01-05")).unwrap();
        assert_eq!(json, "\"2024-01-05\"");
        let back: CalendarDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day("2024-01-05"));
    }

    #[test]
    fn test_deserialize_rejects_malformed() {
        let result: std::result::Result<CalendarDay, _> = serde_json::from_str("\"2024-1-5\"");
        assert!(result.is_err());
    }
}
