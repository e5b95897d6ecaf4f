//! Core engine for the attendance hours ledger.
//!
//! This crate contains the parsing and reconciliation logic for:
//! - Timesheet reports: recovering per-day clock pairs and holiday flags
//! - Holiday calendars: unfolding and scanning iCalendar files
//! - Intervals and hours: normalizing clock pairs and summing durations
//! - The daily ledger: regular/overtime split, theoretical hours and balance

pub mod calendar;
mod error;
pub mod ledger;
pub mod period;
pub mod report;
pub mod store;
mod text;
pub mod time;

pub use calendar::{
    CalendarLoad, DEFAULT_HOLIDAY_LABEL, HolidayCalendar, load_calendar_dir, parse_calendar,
};
pub use error::LedgerError;
pub use ledger::{
    DayStatus, Ledger, LedgerConfig, LedgerEntry, MonthSummary, STANDARD_WORKDAY, Totals,
    WeekSummary, available_months, build_ledger,
};
pub use period::{InvalidMonthKey, MonthKey, WeekKey};
pub use report::{
    DayRawRecord, HolidayRule, ParsedReport, ReportMarkers, parse_report, parse_report_bytes,
};
pub use store::{DayRecord, DayStore};
pub use text::decode_lossy;
pub use time::{Hours, Interval, TimeOfDay};
