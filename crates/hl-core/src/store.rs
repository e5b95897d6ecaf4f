//! Externally owned, mutable store of attendance days.
//!
//! The ledger builder never mutates this store; it reads it as a snapshot. A
//! host keeps one store per user, replaces it wholesale when a new report is
//! imported and applies punches and edits to it between builds.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::report::ParsedReport;
use crate::time::{Interval, normalize_intervals, parse_interval_list_lenient};

/// Clock pairs and the report holiday flag for one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub intervals: Vec<Interval>,
    #[serde(default)]
    pub report_holiday: bool,
}

/// Attendance days keyed by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStore {
    days: BTreeMap<NaiveDate, DayRecord>,
}

impl DayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a freshly scanned report.
    pub fn from_report(report: ParsedReport) -> Self {
        let days = report
            .days
            .into_values()
            .map(|raw| {
                let record = DayRecord {
                    intervals: raw.intervals,
                    report_holiday: raw.reported_holiday,
                };
                (raw.date, record)
            })
            .collect();
        Self { days }
    }

    /// Replaces every day with the contents of a new report.
    ///
    /// A new report never merges with a previous one; punches and edits made
    /// before the import are discarded too.
    pub fn replace_with_report(&mut self, report: ParsedReport) {
        *self = Self::from_report(report);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &DayRecord)> {
        self.days.iter().map(|(date, record)| (*date, record))
    }

    /// Adds an empty record for `date` if there is none. Returns whether a
    /// record was added.
    pub fn ensure_day(&mut self, date: NaiveDate) -> bool {
        if self.days.contains_key(&date) {
            return false;
        }
        self.days.insert(date, DayRecord::default());
        true
    }

    /// Records a manually entered clock pair.
    ///
    /// Both times are validated before anything changes: a malformed time is
    /// returned as [`LedgerError::MalformedTime`] and the store is untouched.
    pub fn add_punch(
        &mut self,
        date: NaiveDate,
        start: &str,
        end: &str,
    ) -> Result<Interval, LedgerError> {
        let interval = Interval::parse(start, end)?.ordered();

        let record = self.days.entry(date).or_default();
        record.intervals.push(interval);
        record.intervals = normalize_intervals(std::mem::take(&mut record.intervals));
        Ok(interval)
    }

    /// Replaces the intervals of a day.
    pub fn set_intervals(&mut self, date: NaiveDate, intervals: Vec<Interval>) {
        self.days.entry(date).or_default().intervals = normalize_intervals(intervals);
    }

    /// Replaces the intervals of a day from their text form.
    ///
    /// Fail-soft: malformed text leaves the day with no intervals. Returns the
    /// number of intervals stored.
    pub fn set_intervals_text(&mut self, date: NaiveDate, text: &str) -> usize {
        let intervals = parse_interval_list_lenient(text);
        let count = intervals.len();
        self.set_intervals(date, intervals);
        count
    }

    /// Overrides the report holiday flag of a day.
    pub fn set_report_holiday(&mut self, date: NaiveDate, holiday: bool) {
        self.days.entry(date).or_default().report_holiday = holiday;
    }
}
