//! Timesheet report scanning.
//!
//! Payroll exports have no schema beyond a few recurring substrings. The
//! scanner walks the text line by line carrying three pieces of state:
//!
//! 1. the running year/month, set by an anchor line such as
//!    `123456  15.03.2024` (a 6-digit token followed by a `DD.MM.YYYY` date);
//! 2. whether it is inside the detail section, between a start marker
//!    (`Resultados individuales`) and an end marker (`Resumen sumas`);
//! 3. the per-date records accumulated so far.
//!
//! Inside the detail section, a line starting with a two-digit day number
//! contributes clock pairs and a holiday flag to that day's record.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::text::{decode_lossy, split_lines};
use crate::time::Interval;

/// Anchor establishing the month that subsequent day numbers belong to.
static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{6})\s+([0-9]{2})\.([0-9]{2})\.([0-9]{4})").expect("valid anchor regex")
});

/// Two-digit day number at the very start of a line.
static DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2})\b").expect("valid day regex"));

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{2}:[0-9]{2}").expect("valid time regex"));

/// An entry time and an exit time separated by whitespace.
static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{2}:[0-9]{2})\s+([0-9]{2}:[0-9]{2})").expect("valid pair regex")
});

/// Literal substrings recognised by the scanner.
///
/// Any entry of a list matches. Defaults cover the Spanish and English
/// variants of the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportMarkers {
    pub section_start: Vec<String>,
    pub section_end: Vec<String>,
    pub holiday: Vec<String>,
    pub day_off: Vec<String>,
}

impl Default for ReportMarkers {
    fn default() -> Self {
        Self {
            section_start: vec![
                "Resultados individuales".to_string(),
                "Individual results".to_string(),
            ],
            section_end: vec!["Resumen sumas".to_string(), "Summary totals".to_string()],
            holiday: vec!["Festivo".to_string()],
            day_off: vec!["LIBR".to_string()],
        }
    }
}

fn contains_any(line: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|needle| !needle.is_empty() && line.contains(needle.as_str()))
}

/// One rule of the holiday classifier, evaluated in [`HolidayRule::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HolidayRule {
    /// The line carries a holiday marker.
    HolidayMarker,
    /// The line carries a day-off marker.
    DayOffMarker,
    /// The line has no `HH:MM` time but does have letters, i.e. it is a
    /// textual status annotation. Stray letters on a line without times are
    /// a known source of false positives.
    TextWithoutTimes,
}

impl HolidayRule {
    pub const ALL: [Self; 3] = [Self::HolidayMarker, Self::DayOffMarker, Self::TextWithoutTimes];

    pub const fn name(self) -> &'static str {
        match self {
            Self::HolidayMarker => "holiday_marker",
            Self::DayOffMarker => "day_off_marker",
            Self::TextWithoutTimes => "text_without_times",
        }
    }

    pub fn matches(self, line: &str, markers: &ReportMarkers) -> bool {
        match self {
            Self::HolidayMarker => contains_any(line, &markers.holiday),
            Self::DayOffMarker => contains_any(line, &markers.day_off),
            Self::TextWithoutTimes => {
                !TIME_RE.is_match(line) && line.bytes().any(|b| b.is_ascii_alphabetic())
            }
        }
    }
}

/// Returns the first holiday rule the line satisfies, if any.
pub fn classify_holiday(line: &str, markers: &ReportMarkers) -> Option<HolidayRule> {
    HolidayRule::ALL
        .into_iter()
        .find(|rule| rule.matches(line, markers))
}

/// Everything recovered for one date of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRawRecord {
    pub date: NaiveDate,
    /// Clock pairs in source order, not yet normalized.
    pub intervals: Vec<Interval>,
    pub reported_holiday: bool,
}

impl DayRawRecord {
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            intervals: Vec::new(),
            reported_holiday: false,
        }
    }
}

/// Output of a report scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReport {
    pub days: BTreeMap<NaiveDate, DayRawRecord>,
    /// Day lines or clock pairs dropped because they did not form a valid
    /// date or time.
    pub rejected: usize,
}

/// What the scanner decided about one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Nothing to extract from this line.
    Skip,
    /// A day line for the given running year/month.
    Day { year: i32, month: u32, day: u32 },
}

/// Line-classification state machine.
#[derive(Debug)]
struct ReportScanner<'a> {
    markers: &'a ReportMarkers,
    year_month: Option<(i32, u32)>,
    inside_detail: bool,
}

impl<'a> ReportScanner<'a> {
    const fn new(markers: &'a ReportMarkers) -> Self {
        Self {
            markers,
            year_month: None,
            inside_detail: false,
        }
    }

    fn step(&mut self, line: &str) -> Step {
        if let Some(caps) = ANCHOR_RE.captures(line) {
            if let (Ok(month), Ok(year)) = (caps[3].parse(), caps[4].parse()) {
                self.year_month = Some((year, month));
            }
        }

        if contains_any(line, &self.markers.section_start) {
            self.inside_detail = true;
            return Step::Skip;
        }
        if contains_any(line, &self.markers.section_end) {
            self.inside_detail = false;
        }

        if !self.inside_detail {
            return Step::Skip;
        }
        let Some((year, month)) = self.year_month else {
            return Step::Skip;
        };

        DAY_RE
            .captures(line)
            .and_then(|caps| caps[1].parse().ok())
            .map_or(Step::Skip, |day| Step::Day { year, month, day })
    }
}

/// Scans report text into per-date records.
///
/// Records are never overwritten: every line for a date appends its clock
/// pairs, and the holiday flag is OR'd across lines. Lines whose day number
/// does not form a valid date are skipped.
pub fn parse_report(text: &str, markers: &ReportMarkers) -> ParsedReport {
    let mut report = ParsedReport::default();
    let mut scanner = ReportScanner::new(markers);

    for (index, line) in split_lines(text).into_iter().enumerate() {
        let Step::Day { year, month, day } = scanner.step(line) else {
            continue;
        };

        let date = match NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| LedgerError::InvalidDate { year, month, day })
        {
            Ok(date) => date,
            Err(err) => {
                tracing::debug!(%err, line = index + 1, "skipping report line");
                report.rejected += 1;
                continue;
            }
        };

        let record = report
            .days
            .entry(date)
            .or_insert_with(|| DayRawRecord::new(date));

        if let Some(rule) = classify_holiday(line, markers) {
            tracing::trace!(%date, rule = rule.name(), "day flagged as holiday");
            record.reported_holiday = true;
        }

        for caps in PAIR_RE.captures_iter(line) {
            match Interval::parse(&caps[1], &caps[2]) {
                Ok(interval) => record.intervals.push(interval),
                Err(err) => {
                    tracing::debug!(%err, line = index + 1, "dropping clock pair");
                    report.rejected += 1;
                }
            }
        }
    }

    tracing::debug!(
        days = report.days.len(),
        rejected = report.rejected,
        "scanned timesheet report"
    );
    report
}

/// Scans raw report bytes, dropping invalid UTF-8 sequences first.
pub fn parse_report_bytes(bytes: &[u8], markers: &ReportMarkers) -> ParsedReport {
    parse_report(&decode_lossy(bytes), markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{Hours, normalize_intervals, sum_hours};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(text: &str) -> ParsedReport {
        parse_report(text, &ReportMarkers::default())
    }

    const MARCH: &str = "\
Informe de tiempos
123456  15.03.2024
Resultados individuales
05  08:00 12:00  13:00 17:00
Resumen sumas
";

    #[test]
    fn parses_day_with_two_pairs() {
        let report = parse(MARCH);
        assert_eq!(report.days.len(), 1);
        let record = &report.days[&date(2024, 3, 5)];
        assert_eq!(record.intervals.len(), 2);
        assert!(!record.reported_holiday);
        assert_eq!(
            sum_hours(&normalize_intervals(record.intervals.clone())),
            Hours::from_centi(800)
        );
        assert_eq!(report.rejected, 0);
    }

    #[test]
    fn festivo_line_without_times_is_a_holiday() {
        let text = "123456  15.03.2024\nResultados individuales\n12  Festivo\nResumen sumas\n";
        let record = &parse(text).days[&date(2024, 3, 12)];
        assert!(record.reported_holiday);
        assert!(record.intervals.is_empty());
    }

    #[test]
    fn holiday_rules_are_evaluated_in_order() {
        let markers = ReportMarkers::default();
        assert_eq!(
            classify_holiday("12  Festivo 08:00 12:00", &markers),
            Some(HolidayRule::HolidayMarker)
        );
        assert_eq!(
            classify_holiday("13  LIBRE 08:00", &markers),
            Some(HolidayRule::DayOffMarker)
        );
        assert_eq!(
            classify_holiday("14  Vacaciones", &markers),
            Some(HolidayRule::TextWithoutTimes)
        );
        assert_eq!(classify_holiday("15  08:00 17:00 Oficina", &markers), None);
        assert_eq!(classify_holiday("16", &markers), None);
    }

    #[test]
    fn each_rule_is_independently_testable() {
        let markers = ReportMarkers::default();
        assert!(HolidayRule::HolidayMarker.matches("Festivo", &markers));
        assert!(!HolidayRule::HolidayMarker.matches("LIBR", &markers));
        assert!(HolidayRule::DayOffMarker.matches("LIBR", &markers));
        assert!(HolidayRule::TextWithoutTimes.matches("Baja médica", &markers));
        assert!(!HolidayRule::TextWithoutTimes.matches("09:00 Baja", &markers));
        assert_eq!(HolidayRule::TextWithoutTimes.name(), "text_without_times");
    }

    #[test]
    fn lines_for_the_same_date_accumulate() {
        let text = "\
654321 01.04.2024
Resultados individuales
02  08:00 12:00
02  LIBR
02  13:00 15:30
Resumen sumas
";
        let record = &parse(text).days[&date(2024, 4, 2)];
        assert_eq!(record.intervals.len(), 2);
        assert!(record.reported_holiday, "holiday flag is never cleared");
        assert_eq!(
            sum_hours(&normalize_intervals(record.intervals.clone())),
            Hours::from_centi(650)
        );
    }

    #[test]
    fn lines_outside_detail_section_are_ignored() {
        let text = "\
123456  15.03.2024
01  08:00 12:00
Resultados individuales
04  08:00 12:00
Resumen sumas
06  08:00 12:00
";
        let days: Vec<_> = parse(text).days.into_keys().collect();
        assert_eq!(days, [date(2024, 3, 4)]);
    }

    #[test]
    fn day_lines_before_any_anchor_are_ignored() {
        let text = "Resultados individuales\n04  08:00 12:00\n123456 01.05.2024\n07  09:00 10:00\n";
        let days: Vec<_> = parse(text).days.into_keys().collect();
        assert_eq!(days, [date(2024, 5, 7)]);
    }

    #[test]
    fn anchor_switches_month_for_following_days() {
        let text = "\
111111 31.01.2024
Resultados individuales
31  08:00 16:00
Resumen sumas
222222 29.02.2024
Individual results
01  08:00 16:00
Summary totals
";
        let days: Vec<_> = parse(text).days.into_keys().collect();
        assert_eq!(days, [date(2024, 1, 31), date(2024, 2, 1)]);
    }

    #[test]
    fn invalid_date_skips_only_that_line() {
        let text = "\
123456  01.02.2023
Resultados individuales
31  08:00 12:00
28  08:00 12:00
Resumen sumas
";
        let report = parse(text);
        let days: Vec<_> = report.days.keys().copied().collect();
        assert_eq!(days, [date(2023, 2, 28)]);
        assert_eq!(report.rejected, 1);
    }

    #[test]
    fn out_of_range_clock_pair_is_dropped() {
        let text = "123456  15.03.2024\nResultados individuales\n07  25:00 26:00 08:00 09:00\n";
        let report = parse(text);
        let record = &report.days[&date(2024, 3, 7)];
        assert_eq!(record.intervals.len(), 1);
        assert_eq!(report.rejected, 1);
    }

    #[test]
    fn reversed_pairs_are_kept_raw_until_normalized() {
        let text = "123456  15.03.2024\nResultados individuales\n08  17:00 13:00\n";
        let record = &parse(text).days[&date(2024, 3, 8)];
        assert!(record.intervals[0].start > record.intervals[0].end);
        assert_eq!(
            sum_hours(&normalize_intervals(record.intervals.clone())),
            Hours::from_centi(400)
        );
    }

    #[test]
    fn three_digit_prefix_is_not_a_day() {
        let text = "123456  15.03.2024\nResultados individuales\n123 08:00 12:00\n 09 08:00 12:00\n";
        assert!(parse(text).days.is_empty());
    }

    #[test]
    fn custom_markers_are_honoured() {
        let markers = ReportMarkers {
            section_start: vec!["Detail".to_string()],
            section_end: vec!["Totals".to_string()],
            holiday: vec!["Public holiday".to_string()],
            day_off: vec!["OFF".to_string()],
        };
        let text = "999999 01.06.2024\nDetail\n03  Public holiday 00:00 00:00\nTotals\n";
        let record = &parse_report(text, &markers).days[&date(2024, 6, 3)];
        assert!(record.reported_holiday);
    }

    #[test]
    fn invalid_bytes_are_dropped_before_scanning() {
        let bytes = b"123456  15.03.2024\nResultados individuales\n05  08:00 12:00 \xFF\n";
        let report = parse_report_bytes(bytes, &ReportMarkers::default());
        assert_eq!(report.days[&date(2024, 3, 5)].intervals.len(), 1);
    }

    #[test]
    fn form_feed_page_break_keeps_the_next_day() {
        let text = "123456  15.03.2024\nResultados individuales\n05  08:00 12:00\n\x0c06  08:00 12:00\nResumen sumas\n";
        let report = parse(text);
        assert_eq!(report.days.len(), 2);
        assert_eq!(report.days[&date(2024, 3, 6)].intervals.len(), 1);
    }

    #[test]
    fn carriage_return_only_line_endings() {
        let report = parse(&MARCH.replace('\n', "\r"));
        assert_eq!(report.days.len(), 1);
        assert_eq!(report.days[&date(2024, 3, 5)].intervals.len(), 2);
    }
}
