//! Ledger command for the day-by-day balance.

use std::fmt::Write as _;
use std::io;

use anyhow::Result;
use chrono::NaiveDate;
use hl_core::Ledger;
use hl_core::time::format_interval_list;

use crate::Config;
use crate::commands::util::{Inputs, flags};

pub fn run<W: io::Write>(
    writer: &mut W,
    config: &Config,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let inputs = Inputs::load(config, today)?;
    let ledger = inputs.ledger(config);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&ledger)?)?;
    } else {
        write!(writer, "{}", format_ledger(&ledger))?;
    }
    Ok(())
}

/// Renders the ledger as a fixed-width table.
pub fn format_ledger(ledger: &Ledger) -> String {
    let mut output = String::new();

    if ledger.is_empty() {
        writeln!(output, "No days recorded.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'hl import <report>' or 'hl punch' to add days.").unwrap();
        return output;
    }

    let header = format!(
        "{:<10}  {:<8}  {:<3}  {:<24}  {:>6}  {:>7}  {:>8}  {:>6}  {:>6}  {:>7}",
        "DATE",
        "WEEK",
        "FLG",
        "INTERVALS",
        "REAL",
        "REGULAR",
        "OVERTIME",
        "THEORY",
        "DELTA",
        "BALANCE"
    );
    writeln!(output, "{}", header.trim_end()).unwrap();

    for entry in ledger.entries() {
        let intervals = format_interval_list(&entry.intervals);
        let intervals = if intervals.is_empty() { "-".to_string() } else { intervals };
        let row = format!(
            "{:<10}  {:<8}  {:<3}  {:<24}  {:>6}  {:>7}  {:>8}  {:>6}  {:>6}  {:>7}",
            entry.date.to_string(),
            entry.iso_week.to_string(),
            flags(entry),
            intervals,
            entry.real_hours,
            entry.regular_hours,
            entry.overtime_hours,
            entry.theoretical_hours,
            entry.delta,
            entry.cumulative_delta,
        );
        writeln!(output, "{}", row.trim_end()).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "Flags: R report holiday, C calendar holiday, W weekend").unwrap();
    if let Some(last) = ledger.entries().last() {
        writeln!(output, "Balance: {}", last.cumulative_delta).unwrap();
    }
    output
}
