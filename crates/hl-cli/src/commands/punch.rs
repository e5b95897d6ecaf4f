//! Punch command for recording a manual clock pair.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use hl_core::time::format_interval_list;

use crate::Config;
use crate::state::{load_store, save_store};

/// Adds `start`-`end` to `date` and saves the store.
///
/// A malformed time is reported as an error and nothing is saved.
pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    date: NaiveDate,
    start: &str,
    end: &str,
) -> Result<()> {
    let mut store = load_store(&config.state_path)?;
    let interval = store.add_punch(date, start, end)?;
    save_store(&config.state_path, &store)?;

    let day = store
        .get(date)
        .map(|record| format_interval_list(&record.intervals))
        .unwrap_or_default();
    writeln!(writer, "Punched {interval} on {date}")?;
    writeln!(writer, "{date}: {day}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn config(temp: &tempfile::TempDir) -> Config {
        Config {
            state_path: temp.path().join("state.json"),
            ..Config::default()
        }
    }

    #[test]
    fn punch_appends_and_orders_pairs() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(&temp);
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        run(&mut Vec::new(), &config, date, "13:00", "17:00").unwrap();
        let mut output = Vec::new();
        run(&mut output, &config, date, "12:00", "08:00").unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Punched 08:00-12:00 on 2024-03-05
        2024-03-05: 08:00-12:00, 13:00-17:00
        ");
    }

    #[test]
    fn malformed_punch_leaves_state_untouched() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(&temp);
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        run(&mut Vec::new(), &config, date, "08:00", "12:00").unwrap();
        let before = std::fs::read_to_string(&config.state_path).unwrap();

        let err = run(&mut Vec::new(), &config, date, "13:00", "25:00").unwrap_err();
        assert!(err.to_string().contains("invalid time \"25:00\""));
        assert_eq!(std::fs::read_to_string(&config.state_path).unwrap(), before);
    }

    #[test]
    fn malformed_first_punch_creates_no_state_file() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(&temp);
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        assert!(run(&mut Vec::new(), &config, date, "8am", "12:00").is_err());
        assert!(!config.state_path.exists());
    }
}
