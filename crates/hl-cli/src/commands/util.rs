//! Shared utilities for CLI commands.

use anyhow::Result;
use chrono::NaiveDate;
use hl_core::{CalendarLoad, DayStore, Ledger, LedgerEntry, build_ledger, load_calendar_dir};

use crate::Config;
use crate::state::load_store;

/// Snapshot of everything a ledger build reads.
#[derive(Debug)]
pub struct Inputs {
    pub store: DayStore,
    pub calendars: CalendarLoad,
}

impl Inputs {
    /// Loads the stored days and every calendar in the configured directory.
    ///
    /// When `include_today` is set, today gets an empty row if it has none;
    /// that row is not written back to the state file.
    pub fn load(config: &Config, today: NaiveDate) -> Result<Self> {
        let mut store = load_store(&config.state_path)?;
        if config.include_today {
            store.ensure_day(today);
        }
        let calendars = load_calendar_dir(&config.calendar_dir);
        Ok(Self { store, calendars })
    }

    pub fn ledger(&self, config: &Config) -> Ledger {
        build_ledger(&self.store, &self.calendars.calendar, &config.ledger_config())
    }
}

/// Three-character flag column: `R` report holiday, `C` calendar holiday,
/// `W` weekend, `.` when unset.
pub fn flags(entry: &LedgerEntry) -> String {
    [
        (entry.report_holiday, 'R'),
        (entry.calendar_holiday, 'C'),
        (entry.is_weekend, 'W'),
    ]
    .into_iter()
    .map(|(set, flag)| if set { flag } else { '.' })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use hl_core::{HolidayCalendar, LedgerConfig};

    #[test]
    fn flags_mark_each_source() {
        let mut store = DayStore::new();
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        store.set_report_holiday(saturday, true);
        let ledger = build_ledger(&store, &HolidayCalendar::new(), &LedgerConfig::default());
        assert_eq!(flags(&ledger.entries()[0]), "R.W");
    }

    #[test]
    fn include_today_adds_an_unsaved_row() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            state_path: temp.path().join("state.json"),
            calendar_dir: temp.path().to_path_buf(),
            include_today: true,
            ..Config::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        let inputs = Inputs::load(&config, today).unwrap();
        assert!(inputs.store.get(today).is_some());
        assert!(!config.state_path.exists());
    }
}
