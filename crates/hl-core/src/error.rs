//! Error kinds raised while parsing attendance inputs.
//!
//! Parsers recover from all of these locally by skipping the offending unit
//! (one interval, one report line, one calendar file). Only manual punches
//! surface [`LedgerError::MalformedTime`] to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the attendance engine.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A time value did not match `HH:MM` with hour 0-23 and minute 0-59.
    #[error("invalid time {value:?}: use HH:MM in 24h format (e.g. 08:30)")]
    MalformedTime { value: String },

    /// A year/month/day combination that does not exist on the calendar.
    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// A calendar file that could not be opened or read.
    #[error("unreadable calendar source {}", path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LedgerError {
    pub(crate) fn malformed_time(value: impl Into<String>) -> Self {
        Self::MalformedTime {
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_time_message_names_value() {
        let err = LedgerError::malformed_time("8h");
        assert_eq!(
            err.to_string(),
            "invalid time \"8h\": use HH:MM in 24h format (e.g. 08:30)"
        );
    }

    #[test]
    fn invalid_date_message_is_zero_padded() {
        let err = LedgerError::InvalidDate {
            year: 2024,
            month: 2,
            day: 31,
        };
        assert_eq!(err.to_string(), "invalid date 2024-02-31");
    }
}
