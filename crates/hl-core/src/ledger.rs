//! Daily ledger of worked versus theoretical hours.
//!
//! # Classification
//!
//! For each stored day:
//! - `is_non_working` = report holiday OR calendar holiday OR weekend
//! - overtime = all real hours when the day is a calendar holiday or a
//!   weekend; a holiday known only from the report does not count as overtime
//! - regular = real − overtime
//! - theoretical = 0 on non-working days, the standard workday otherwise
//! - delta = regular − theoretical
//!
//! The ledger is always rebuilt from scratch; `cumulative_delta` is the
//! running sum of `delta` in date order.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::HolidayCalendar;
use crate::period::{MonthKey, WeekKey};
use crate::store::{DayRecord, DayStore};
use crate::time::{Hours, Interval, normalize_intervals, sum_hours};

/// Length of a standard working day.
pub const STANDARD_WORKDAY: Hours = Hours::from_centi(800);

/// Tunables for ledger computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Theoretical hours of a working day.
    pub workday: Hours,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            workday: STANDARD_WORKDAY,
        }
    }
}

/// One computed day of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub iso_week: WeekKey,
    pub month: MonthKey,
    pub report_holiday: bool,
    pub calendar_holiday: bool,
    pub is_weekend: bool,
    pub is_non_working: bool,
    /// The day's clock pairs after normalization: each pair ordered and the
    /// list sorted. Not the raw pairs as scanned from the report.
    pub intervals: Vec<Interval>,
    pub real_hours: Hours,
    pub regular_hours: Hours,
    pub overtime_hours: Hours,
    pub theoretical_hours: Hours,
    pub delta: Hours,
    pub cumulative_delta: Hours,
}

impl LedgerEntry {
    /// Computes a day in isolation. `cumulative_delta` is filled in by the ledger.
    pub fn compute(
        date: NaiveDate,
        record: &DayRecord,
        calendar: &HolidayCalendar,
        config: &LedgerConfig,
    ) -> Self {
        let intervals = normalize_intervals(record.intervals.iter().copied());
        let real_hours = sum_hours(&intervals);

        let is_weekend = is_weekend(date);
        let calendar_holiday = calendar.contains(date);
        let report_holiday = record.report_holiday;
        let is_non_working = report_holiday || calendar_holiday || is_weekend;

        let overtime_hours = if calendar_holiday || is_weekend {
            real_hours
        } else {
            Hours::ZERO
        };
        let regular_hours = real_hours - overtime_hours;
        let theoretical_hours = if is_non_working {
            Hours::ZERO
        } else {
            config.workday
        };

        Self {
            date,
            iso_week: WeekKey::of(date),
            month: MonthKey::of(date),
            report_holiday,
            calendar_holiday,
            is_weekend,
            is_non_working,
            intervals,
            real_hours,
            regular_hours,
            overtime_hours,
            theoretical_hours,
            delta: regular_hours - theoretical_hours,
            cumulative_delta: Hours::ZERO,
        }
    }

    pub fn status(&self) -> DayStatus {
        DayStatus::classify(self.calendar_holiday, self.is_weekend, self.real_hours)
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Display category of a day in a month view. The first matching variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    CalendarHoliday,
    Weekend,
    Worked,
    Empty,
}

impl DayStatus {
    pub fn classify(calendar_holiday: bool, is_weekend: bool, real_hours: Hours) -> Self {
        if calendar_holiday {
            Self::CalendarHoliday
        } else if is_weekend {
            Self::Weekend
        } else if real_hours > Hours::ZERO {
            Self::Worked
        } else {
            Self::Empty
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CalendarHoliday => "holiday",
            Self::Weekend => "weekend",
            Self::Worked => "worked",
            Self::Empty => "",
        }
    }
}

/// Sums over a set of ledger entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub real_hours: Hours,
    pub regular_hours: Hours,
    pub overtime_hours: Hours,
    pub theoretical_hours: Hours,
    pub delta: Hours,
}

impl Totals {
    fn add(&mut self, entry: &LedgerEntry) {
        self.real_hours += entry.real_hours;
        self.regular_hours += entry.regular_hours;
        self.overtime_hours += entry.overtime_hours;
        self.theoretical_hours += entry.theoretical_hours;
        self.delta += entry.delta;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    pub month: MonthKey,
    pub delta: Hours,
    pub overtime_hours: Hours,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekSummary {
    pub iso_week: WeekKey,
    pub delta: Hours,
}

/// Ledger entries in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Sorts entries by date and recomputes the running balance in full.
    pub fn from_entries(mut entries: Vec<LedgerEntry>) -> Self {
        entries.sort_by_key(|entry| entry.date);
        let mut running = Hours::ZERO;
        for entry in &mut entries {
            running += entry.delta;
            entry.cumulative_delta = running;
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&LedgerEntry> {
        self.entries
            .binary_search_by_key(&date, |entry| entry.date)
            .ok()
            .map(|index| &self.entries[index])
    }

    pub fn in_month(&self, month: MonthKey) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(move |entry| entry.month == month)
    }

    pub fn totals(&self) -> Totals {
        let mut totals = Totals::default();
        for entry in &self.entries {
            totals.add(entry);
        }
        totals
    }

    /// Delta and overtime per calendar month, keyed on each entry's `month`.
    pub fn by_month(&self) -> Vec<MonthSummary> {
        let mut months: BTreeMap<MonthKey, (Hours, Hours)> = BTreeMap::new();
        for entry in &self.entries {
            let (delta, overtime) = months.entry(entry.month).or_default();
            *delta += entry.delta;
            *overtime += entry.overtime_hours;
        }
        months
            .into_iter()
            .map(|(month, (delta, overtime_hours))| MonthSummary {
                month,
                delta,
                overtime_hours,
            })
            .collect()
    }

    /// Delta per ISO week, keyed on each entry's `iso_week`.
    pub fn by_week(&self) -> Vec<WeekSummary> {
        let mut weeks: BTreeMap<WeekKey, Hours> = BTreeMap::new();
        for entry in &self.entries {
            *weeks.entry(entry.iso_week).or_default() += entry.delta;
        }
        weeks
            .into_iter()
            .map(|(iso_week, delta)| WeekSummary { iso_week, delta })
            .collect()
    }
}

/// Computes the full ledger from a store snapshot and the holiday calendar.
pub fn build_ledger(store: &DayStore, calendar: &HolidayCalendar, config: &LedgerConfig) -> Ledger {
    let entries = store
        .iter()
        .map(|(date, record)| LedgerEntry::compute(date, record, calendar, config))
        .collect();
    let ledger = Ledger::from_entries(entries);
    tracing::debug!(days = ledger.len(), "built ledger");
    ledger
}

/// Months worth showing in a month view: those with ledger entries or
/// holidays, in order. Falls back to the month of `fallback` when both are empty.
pub fn available_months(
    ledger: &Ledger,
    calendar: &HolidayCalendar,
    fallback: NaiveDate,
) -> Vec<MonthKey> {
    let mut months: BTreeSet<MonthKey> = ledger.entries.iter().map(|entry| entry.month).collect();
    months.extend(calendar.months());
    if months.is_empty() {
        months.insert(MonthKey::of(fallback));
    }
    months.into_iter().collect()
}
