//! Calendar command for a month view of day statuses.

use std::fmt::Write as _;
use std::io;

use anyhow::Result;
use chrono::NaiveDate;
use hl_core::ledger::is_weekend;
use hl_core::{DayStatus, HolidayCalendar, Hours, Ledger, MonthKey, available_months};

use crate::Config;
use crate::commands::util::Inputs;

/// Shows `month`, or the latest month with ledger days or holidays.
pub fn run<W: io::Write>(
    writer: &mut W,
    config: &Config,
    today: NaiveDate,
    month: Option<MonthKey>,
) -> Result<()> {
    let inputs = Inputs::load(config, today)?;
    let ledger = inputs.ledger(config);
    let calendar = &inputs.calendars.calendar;

    let month = month
        .or_else(|| available_months(&ledger, calendar, today).last().copied())
        .unwrap_or_else(|| MonthKey::of(today));
    write!(writer, "{}", format_month(&ledger, calendar, month))?;
    Ok(())
}

/// Renders one line per day of `month` with its status, worked hours and
/// holiday labels, followed by the month's balance.
pub fn format_month(ledger: &Ledger, calendar: &HolidayCalendar, month: MonthKey) -> String {
    let mut output = String::new();
    writeln!(output, "CALENDAR {month}").unwrap();
    writeln!(output, "────────────────").unwrap();

    for date in month.days() {
        let entry = ledger.get(date);
        let real = entry.map_or(Hours::ZERO, |entry| entry.real_hours);
        let status = DayStatus::classify(calendar.contains(date), is_weekend(date), real);
        let hours = entry.map_or_else(|| "-".to_string(), |entry| entry.real_hours.to_string());
        let labels = calendar
            .labels(date)
            .map(|labels| labels.iter().map(String::as_str).collect::<Vec<_>>().join(" · "))
            .unwrap_or_default();

        let line = format!(
            "{} {date}  {:<7}  {hours:>5}  {labels}",
            date.format("%a"),
            status.as_str()
        );
        writeln!(output, "{}", line.trim_end()).unwrap();
    }

    let delta: Hours = ledger.in_month(month).map(|entry| entry.delta).sum();
    let overtime: Hours = ledger.in_month(month).map(|entry| entry.overtime_hours).sum();
    writeln!(output).unwrap();
    writeln!(output, "Month delta: {delta}  Overtime: {overtime}").unwrap();
    output
}
