//! Summary command for totals and per-month/per-week balances.

use std::fmt::Write as _;
use std::io;

use anyhow::Result;
use chrono::NaiveDate;
use hl_core::{Ledger, MonthSummary, Totals, WeekSummary};
use serde::Serialize;

use crate::Config;
use crate::commands::util::Inputs;

/// JSON shape of the summary command.
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub totals: Totals,
    pub by_month: Vec<MonthSummary>,
    pub by_week: Vec<WeekSummary>,
}

impl SummaryReport {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            totals: ledger.totals(),
            by_month: ledger.by_month(),
            by_week: ledger.by_week(),
        }
    }
}

pub fn run<W: io::Write>(
    writer: &mut W,
    config: &Config,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let inputs = Inputs::load(config, today)?;
    let summary = SummaryReport::from_ledger(&inputs.ledger(config));

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        write!(writer, "{}", format_summary(&summary))?;
    }
    Ok(())
}

pub fn format_summary(summary: &SummaryReport) -> String {
    let mut output = String::new();
    let totals = &summary.totals;

    writeln!(output, "TOTALS").unwrap();
    writeln!(output, "──────").unwrap();
    for (label, hours) in [
        ("Real hours:", totals.real_hours),
        ("Regular hours:", totals.regular_hours),
        ("Overtime hours:", totals.overtime_hours),
        ("Theoretical hours:", totals.theoretical_hours),
        ("Balance:", totals.delta),
    ] {
        writeln!(output, "{label:<19}{hours:>7}").unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "BY MONTH").unwrap();
    writeln!(output, "────────").unwrap();
    if summary.by_month.is_empty() {
        writeln!(output, "(no days recorded)").unwrap();
    } else {
        writeln!(output, "{:<8}  {:>7}  {:>8}", "MONTH", "DELTA", "OVERTIME").unwrap();
        for month in &summary.by_month {
            writeln!(
                output,
                "{:<8}  {:>7}  {:>8}",
                month.month.to_string(),
                month.delta,
                month.overtime_hours
            )
            .unwrap();
        }
    }

    writeln!(output).unwrap();
    writeln!(output, "BY WEEK").unwrap();
    writeln!(output, "───────").unwrap();
    if summary.by_week.is_empty() {
        writeln!(output, "(no days recorded)").unwrap();
    } else {
        writeln!(output, "{:<8}  {:>7}", "WEEK", "DELTA").unwrap();
        for week in &summary.by_week {
            writeln!(output, "{:<8}  {:>7}", week.iso_week.to_string(), week.delta).unwrap();
        }
    }

    output
}
