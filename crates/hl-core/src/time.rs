//! Wall-clock times, clock intervals and hour arithmetic.
//!
//! All times are naive `HH:MM` values without a timezone. Hour quantities are
//! kept as fixed-point hundredths so that per-day rounding happens exactly once
//! and running balances never drift.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Creates a time, returning `None` outside 00:00-23:59.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "bounded by the range check"
    )]
    pub const fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    /// Minutes since midnight.
    pub const fn minutes(self) -> u16 {
        self.0
    }

    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    pub const fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Every valid time of a day, in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..MINUTES_PER_DAY).map(Self)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = LedgerError;

    /// Parses `HH:MM`. A single-digit hour (`8:30`) is accepted; the minute
    /// must always have two digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let Some((hour, minute)) = trimmed.split_once(':') else {
            return Err(LedgerError::malformed_time(s));
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(LedgerError::malformed_time(s));
        }
        if !all_digits(hour) || !all_digits(minute) {
            return Err(LedgerError::malformed_time(s));
        }

        let hour: u32 = hour.parse().map_err(|_| LedgerError::malformed_time(s))?;
        let minute: u32 = minute.parse().map_err(|_| LedgerError::malformed_time(s))?;
        Self::new(hour, minute).ok_or_else(|| LedgerError::malformed_time(s))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

/// A clock-in/clock-out pair.
///
/// Fields are ordered so the derived `Ord` sorts by start, then by end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Interval {
    /// Creates an interval exactly as given, without reordering.
    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Parses a raw entry/exit pair without reordering it.
    pub fn parse(start: &str, end: &str) -> Result<Self, LedgerError> {
        Ok(Self::new(start.parse()?, end.parse()?))
    }

    /// Returns the interval with start and end swapped if they are reversed.
    ///
    /// Overnight shifts are not supported: a reversed pair is swapped once and
    /// never split across midnight.
    #[must_use]
    pub const fn ordered(self) -> Self {
        if self.start.0 > self.end.0 {
            Self::new(self.end, self.start)
        } else {
            self
        }
    }

    /// Signed length in minutes. Non-negative once the interval is ordered.
    pub fn duration_minutes(self) -> i64 {
        i64::from(self.end.minutes()) - i64::from(self.start.minutes())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Orders each pair and sorts the list by start, then end.
///
/// Idempotent: normalizing an already normalized list returns it unchanged.
pub fn normalize_intervals(intervals: impl IntoIterator<Item = Interval>) -> Vec<Interval> {
    let mut normalized: Vec<Interval> = intervals.into_iter().map(Interval::ordered).collect();
    normalized.sort_unstable();
    normalized
}

/// Parses raw `(start, end)` strings and normalizes the result.
///
/// Fails on the first pair containing a malformed time.
pub fn normalize<S: AsRef<str>>(pairs: &[(S, S)]) -> Result<Vec<Interval>, LedgerError> {
    let parsed = pairs
        .iter()
        .map(|(start, end)| Interval::parse(start.as_ref(), end.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(normalize_intervals(parsed))
}

/// Sums the intervals into decimal hours rounded to two places.
///
/// Intervals are expected to be normalized; lengths are not re-validated.
pub fn sum_hours(intervals: &[Interval]) -> Hours {
    let minutes: i64 = intervals.iter().map(|i| i.duration_minutes()).sum();
    Hours::from_minutes(minutes)
}

/// Parses the textual interval-list representation used for edits.
///
/// Accepts either `HH:MM-HH:MM` items separated by commas, semicolons or
/// newlines, or a JSON array of `["HH:MM", "HH:MM"]` pairs. Blank text is an
/// empty list. The result is normalized.
pub fn parse_interval_list(text: &str) -> Result<Vec<Interval>, LedgerError> {
    let trimmed = text.trim();
    if trimmed.starts_with('[') {
        let pairs: Vec<(String, String)> =
            serde_json::from_str(trimmed).map_err(|_| LedgerError::malformed_time(trimmed))?;
        return normalize(&pairs);
    }

    let mut intervals = Vec::new();
    for item in trimmed.split([',', ';', '\n']) {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let Some((start, end)) = item.split_once('-') else {
            return Err(LedgerError::malformed_time(item));
        };
        intervals.push(Interval::parse(start, end)?);
    }
    Ok(normalize_intervals(intervals))
}

/// Fail-soft variant of [`parse_interval_list`]: malformed text yields no intervals.
pub fn parse_interval_list_lenient(text: &str) -> Vec<Interval> {
    parse_interval_list(text).unwrap_or_else(|err| {
        tracing::debug!(%err, text, "discarding malformed interval list");
        Vec::new()
    })
}

/// Formats intervals as `HH:MM-HH:MM, HH:MM-HH:MM`.
pub fn format_interval_list(intervals: &[Interval]) -> String {
    intervals
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A quantity of hours in fixed-point hundredths.
///
/// Serialized as a JSON number with at most two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hours(i64);

impl Hours {
    pub const ZERO: Self = Self(0);

    /// Creates a value from hundredths of an hour (`800` is 8.00 h).
    pub const fn from_centi(centi: i64) -> Self {
        Self(centi)
    }

    /// Converts whole minutes to hours, rounding half to even at two decimals.
    ///
    /// A whole number of minutes is always k/3 hundredths, so a tie cannot
    /// occur and the result only depends on the minute total.
    pub fn from_minutes(minutes: i64) -> Self {
        Self(div_round_half_even(minutes * 100, 60))
    }

    /// Converts a float, rounding to the nearest hundredth.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "hour values are far below i64 range"
    )]
    pub fn from_f64(hours: f64) -> Self {
        Self((hours * 100.0).round() as i64)
    }

    pub const fn centi(self) -> i64 {
        self.0
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "hour values are far below f64 mantissa range"
    )]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

fn div_round_half_even(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator.div_euclid(denominator);
    let remainder = numerator.rem_euclid(denominator);
    match (2 * remainder).cmp(&denominator) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal if quotient % 2 == 0 => quotient,
        Ordering::Equal => quotient + 1,
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let text = format!("{sign}{}.{:02}", abs / 100, abs % 100);
        f.pad(&text)
    }
}

impl Add for Hours {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Hours {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Hours {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Hours {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Hours {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Hours {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Ok(Self::from_f64(value))
    }
}
