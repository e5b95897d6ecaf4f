//! Calendar grouping keys used for aggregation.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Creates a key, returning `None` for a month outside 1-12.
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if matches!(month, 1..=12) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Every date of the month, in ascending order.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        self.first_day()
            .into_iter()
            .flat_map(|first| first.iter_days())
            .take_while(move |date| Self::of(*date) == self)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = InvalidMonthKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMonthKey(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for month strings that are not `YYYY-MM`.
#[derive(Debug, Clone)]
pub struct InvalidMonthKey(String);

impl fmt::Display for InvalidMonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month {:?}: expected YYYY-MM", self.0)
    }
}

impl std::error::Error for InvalidMonthKey {}

/// An ISO 8601 week, keyed by ISO week-year so week 1 of different years
/// never collide. Rendered as `YYYY-Www`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl Serialize for WeekKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_key_formats_and_parses() {
        let key = MonthKey::of(date(2024, 3, 5));
        assert_eq!(key.to_string(), "2024-03");
        assert_eq!("2024-03".parse::<MonthKey>().unwrap(), key);
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("march".parse::<MonthKey>().is_err());
    }

    #[test]
    fn month_days_cover_leap_february() {
        let days: Vec<_> = MonthKey::new(2024, 2).unwrap().days().collect();
        assert_eq!(days.len(), 29);
        assert_eq!(days[0], date(2024, 2, 1));
        assert_eq!(days[28], date(2024, 2, 29));
    }

    #[test]
    fn week_key_uses_iso_week_year() {
        // 2024-12-30 is a Monday in ISO week 1 of 2025.
        assert_eq!(WeekKey::of(date(2024, 12, 30)).to_string(), "2025-W01");
        assert_eq!(WeekKey::of(date(2024, 3, 5)).to_string(), "2024-W10");
    }

    #[test]
    fn keys_serialize_as_strings() {
        let month = serde_json::to_string(&MonthKey::of(date(2024, 1, 9))).unwrap();
        assert_eq!(month, "\"2024-01\"");
        let week = serde_json::to_string(&WeekKey::of(date(2024, 1, 9))).unwrap();
        assert_eq!(week, "\"2024-W02\"");
    }
}
