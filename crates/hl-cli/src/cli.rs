//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use hl_core::MonthKey;

/// Attendance hours ledger.
///
/// Reconciles a payroll timesheet export, holiday calendars and manual clock
/// punches into a daily balance of worked versus theoretical hours.
#[derive(Debug, Parser)]
#[command(name = "hl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a timesheet report and replace the stored days with it.
    Import {
        /// Report file, or `-` to read from stdin.
        source: PathBuf,
    },

    /// Add a clock-in/clock-out pair.
    Punch {
        /// Entry time (HH:MM).
        #[arg(long)]
        start: String,

        /// Exit time (HH:MM).
        #[arg(long)]
        end: String,

        /// Day to punch (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Edit a stored day.
    Edit {
        /// Day to edit (YYYY-MM-DD).
        date: NaiveDate,

        /// Replacement intervals, e.g. "08:00-12:00, 13:00-17:00".
        /// Malformed text clears the day's intervals.
        #[arg(long)]
        intervals: Option<String>,

        /// Override the report holiday flag.
        #[arg(long, value_name = "BOOL")]
        report_holiday: Option<bool>,
    },

    /// List the loaded holiday calendars and their holidays.
    Holidays {
        /// Only show holidays of this month (YYYY-MM).
        #[arg(long)]
        month: Option<MonthKey>,
    },

    /// Show the day-by-day ledger.
    Ledger {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show totals and monthly/weekly balances.
    Summary {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the status of every day of a month.
    Calendar {
        /// Month to show (YYYY-MM). Defaults to the latest month with data.
        #[arg(long)]
        month: Option<MonthKey>,
    },
}
