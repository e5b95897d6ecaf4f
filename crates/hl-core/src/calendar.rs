//! Holiday calendar parsing from iCalendar (`.ics`) files.
//!
//! Only a narrow slice of the format matters here: `VEVENT` blocks with a
//! `DTSTART` date and an optional `SUMMARY` label. Physical lines are unfolded
//! into logical lines before any field is looked at; folded `SUMMARY` values
//! are otherwise truncated.
//!
//! Parsing never fails. Unparseable lines are skipped, and files that cannot be
//! read are left out of the result and the source manifest.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::period::MonthKey;
use crate::text::{decode_lossy, split_lines};

/// Label recorded for an event that has a date but no usable `SUMMARY`.
pub const DEFAULT_HOLIDAY_LABEL: &str = "Holiday";

/// File extension glob used when discovering calendar files.
pub const CALENDAR_GLOB: &str = "*.ics";

/// Holiday dates with the labels of every event that falls on them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    days: BTreeMap<NaiveDate, BTreeSet<String>>,
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label to a date. Labels accumulate; they are never replaced.
    pub fn insert(&mut self, date: NaiveDate, label: impl Into<String>) {
        self.days.entry(date).or_default().insert(label.into());
    }

    /// Unions another calendar into this one, date by date.
    pub fn merge(&mut self, other: Self) {
        for (date, labels) in other.days {
            self.days.entry(date).or_default().extend(labels);
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn labels(&self, date: NaiveDate) -> Option<&BTreeSet<String>> {
        self.days.get(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// All holidays in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &BTreeSet<String>)> {
        self.days.iter().map(|(date, labels)| (*date, labels))
    }

    /// Holidays that fall within one month.
    pub fn in_month(
        &self,
        month: MonthKey,
    ) -> impl Iterator<Item = (NaiveDate, &BTreeSet<String>)> {
        self.iter().filter(move |(date, _)| month.contains(*date))
    }

    /// Months that contain at least one holiday.
    pub fn months(&self) -> BTreeSet<MonthKey> {
        self.days.keys().map(|date| MonthKey::of(*date)).collect()
    }
}

/// Result of loading every calendar file in a directory.
#[derive(Debug, Clone, Default)]
pub struct CalendarLoad {
    pub calendar: HolidayCalendar,
    /// File names that were read successfully, in processing order.
    pub sources: Vec<String>,
}

/// Reassembles folded physical lines into logical lines.
///
/// A line starting with a single space or tab continues the previous line;
/// that one whitespace character is removed and the rest is appended.
pub fn unfold_lines(text: &str) -> Vec<String> {
    let mut logical: Vec<String> = Vec::new();
    for line in split_lines(text) {
        let continuation = line.strip_prefix([' ', '\t']);
        match (continuation, logical.last_mut()) {
            (Some(rest), Some(previous)) => previous.push_str(rest),
            _ => logical.push(line.to_string()),
        }
    }
    logical
}

/// Fields collected while inside one `VEVENT` block.
#[derive(Debug, Default)]
struct PendingEvent {
    date: Option<NaiveDate>,
    label: Option<String>,
}

impl PendingEvent {
    fn finish(self, calendar: &mut HolidayCalendar) {
        let Some(date) = self.date else {
            return;
        };
        let label = self
            .label
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| DEFAULT_HOLIDAY_LABEL.to_string());
        calendar.insert(date, label);
    }
}

/// Parses the text of one calendar file.
pub fn parse_calendar(text: &str) -> HolidayCalendar {
    let mut calendar = HolidayCalendar::new();
    let mut event: Option<PendingEvent> = None;

    for line in unfold_lines(text) {
        if line.starts_with("BEGIN:VEVENT") {
            event = Some(PendingEvent::default());
            continue;
        }
        if line.starts_with("END:VEVENT") {
            if let Some(finished) = event.take() {
                finished.finish(&mut calendar);
            }
            continue;
        }

        let Some(pending) = event.as_mut() else {
            continue;
        };

        if line.starts_with("DTSTART") {
            let Some((_, value)) = line.split_once(':') else {
                continue;
            };
            match extract_date(value) {
                Some(date) => pending.date = Some(date),
                None => tracing::debug!(value, "skipping unparseable DTSTART"),
            }
        } else if line.starts_with("SUMMARY") {
            if let Some((_, value)) = line.split_once(':') {
                pending.label = Some(value.trim().to_string());
            }
        }
    }

    calendar
}

/// Extracts the `YYYYMMDD` date from a `DTSTART` value, ignoring any time part.
fn extract_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.split_once('T').map_or(value, |(date, _)| date);
    let digits = date_part.get(..8)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
}

/// Reads and parses a single calendar file.
pub fn load_calendar_file(path: &Path) -> Result<HolidayCalendar, LedgerError> {
    let bytes = std::fs::read(path).map_err(|source| LedgerError::UnreadableSource {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_calendar(&decode_lossy(&bytes)))
}

/// Loads every `*.ics` file in a directory, in file-name order, and unions them.
///
/// Unreadable files are skipped with a warning and do not appear in the
/// returned source list.
pub fn load_calendar_dir(dir: &Path) -> CalendarLoad {
    let mut load = CalendarLoad::default();

    for path in discover_calendar_files(dir) {
        match load_calendar_file(&path) {
            Ok(calendar) => {
                tracing::debug!(
                    path = %path.display(),
                    holidays = calendar.len(),
                    "loaded calendar"
                );
                load.calendar.merge(calendar);
                let name = path.file_name().map_or_else(
                    || path.display().to_string(),
                    |name| name.to_string_lossy().into_owned(),
                );
                load.sources.push(name);
            }
            Err(err) => tracing::warn!(%err, "skipping calendar file"),
        }
    }

    load
}

fn discover_calendar_files(dir: &Path) -> Vec<PathBuf> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped).join(CALENDAR_GLOB);

    let paths = match glob::glob(&pattern.to_string_lossy()) {
        Ok(paths) => paths,
        Err(err) => {
            tracing::warn!(%err, dir = %dir.display(), "invalid calendar directory pattern");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable calendar entry");
                None
            }
        })
        .collect();
    files.sort();
    files
}
