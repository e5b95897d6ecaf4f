//! Edit command for replacing a stored day's intervals or holiday flag.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use hl_core::time::{format_interval_list, parse_interval_list};

use crate::Config;
use crate::state::{load_store, save_store};

pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    date: NaiveDate,
    intervals: Option<&str>,
    report_holiday: Option<bool>,
) -> Result<()> {
    if intervals.is_none() && report_holiday.is_none() {
        bail!("nothing to edit: pass --intervals and/or --report-holiday");
    }

    let mut store = load_store(&config.state_path)?;
    if let Some(text) = intervals {
        // Malformed text still clears the day.
        let parsed = match parse_interval_list(text) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::debug!(%err, text, "discarding malformed interval list");
                writeln!(
                    writer,
                    "Warning: could not parse intervals {text:?}; {date} now has none"
                )?;
                Vec::new()
            }
        };
        store.set_intervals(date, parsed);
    }
    if let Some(holiday) = report_holiday {
        store.set_report_holiday(date, holiday);
    }
    save_store(&config.state_path, &store)?;

    if let Some(record) = store.get(date) {
        let day = format_interval_list(&record.intervals);
        let day = if day.is_empty() { "-" } else { day.as_str() };
        writeln!(
            writer,
            "Updated {date}: {day} (report holiday: {})",
            if record.report_holiday { "yes" } else { "no" }
        )?;
    }
    Ok(())
}
