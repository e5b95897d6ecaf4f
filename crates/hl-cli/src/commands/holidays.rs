//! Holidays command for listing the loaded calendars.

use std::fmt::Write as _;
use std::io;
use std::path::Path;

use anyhow::Result;
use hl_core::{CalendarLoad, MonthKey, load_calendar_dir};

use crate::Config;

pub fn run<W: io::Write>(writer: &mut W, config: &Config, month: Option<MonthKey>) -> Result<()> {
    let load = load_calendar_dir(&config.calendar_dir);
    write!(writer, "{}", format_holidays(&load, &config.calendar_dir, month))?;
    Ok(())
}

/// Renders the calendar manifest followed by one row per holiday date.
pub fn format_holidays(load: &CalendarLoad, dir: &Path, month: Option<MonthKey>) -> String {
    let mut output = String::new();

    if load.sources.is_empty() {
        writeln!(output, "No .ics calendars found in {}", dir.display()).unwrap();
        return output;
    }
    writeln!(
        output,
        "Calendars ({}): {}",
        load.sources.len(),
        load.sources.join(", ")
    )
    .unwrap();

    let rows: Vec<_> = match month {
        Some(month) => load.calendar.in_month(month).collect(),
        None => load.calendar.iter().collect(),
    };
    if rows.is_empty() {
        match month {
            Some(month) => writeln!(output, "No holidays in {month}.").unwrap(),
            None => writeln!(output, "No holidays found.").unwrap(),
        }
        return output;
    }

    writeln!(output).unwrap();
    for (date, labels) in rows {
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        writeln!(output, "{date} {}  {}", date.format("%a"), labels.join(" · ")).unwrap();
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    const REGIONAL: &str = "\
BEGIN:VCALENDAR
BEGIN:VEVENT
DTSTART;VALUE=DATE:20240815
SUMMARY:Asunción
END:VEVENT
BEGIN:VEVENT
DTSTART;VALUE=DATE:20240906
SUMMARY:Fiesta
  local
END:VEVENT
END:VCALENDAR
";

    const NATIONAL: &str = "\
BEGIN:VCALENDAR
BEGIN:VEVENT
DTSTART:20240815T000000
SUMMARY:Assumption Day
END:VEVENT
END:VCALENDAR
";

    fn calendars() -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("b-regional.ics"), REGIONAL).unwrap();
        std::fs::write(temp.path().join("a-national.ics"), NATIONAL).unwrap();
        std::fs::write(temp.path().join("notes.txt"), "not a calendar").unwrap();
        temp
    }

    #[test]
    fn holidays_lists_sources_and_joined_labels() {
        let temp = calendars();
        let load = load_calendar_dir(temp.path());

        assert_snapshot!(format_holidays(&load, temp.path(), None), @r"
        Calendars (2): a-national.ics, b-regional.ics

        2024-08-15 Thu  Assumption Day · Asunción
        2024-09-06 Fri  Fiesta local
        ");
    }

    #[test]
    fn holidays_filters_by_month() {
        let temp = calendars();
        let load = load_calendar_dir(temp.path());

        let september: MonthKey = "2024-09".parse().unwrap();
        let output = format_holidays(&load, temp.path(), Some(september));
        assert!(output.contains("2024-09-06 Fri  Fiesta local"));
        assert!(!output.contains("2024-08-15"));

        let may: MonthKey = "2024-05".parse().unwrap();
        let output = format_holidays(&load, temp.path(), Some(may));
        assert!(output.ends_with("No holidays in 2024-05.\n"));
    }

    #[test]
    fn holidays_without_calendars_says_so() {
        let temp = tempfile::tempdir().unwrap();
        let load = load_calendar_dir(temp.path());
        let output = format_holidays(&load, temp.path(), None);
        assert!(output.starts_with("No .ics calendars found in"));
    }
}
