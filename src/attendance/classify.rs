use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use serde::Serialize;
use utoipa::ToSchema;

use super::holidays;

/// Expected workday length in hours.
pub const EXPECTED_HOURS: f64 = 8.0;

/// Placeholder shown when a mark is missing ("sin marcación").
pub const NO_MARK: &str = "S/M";

static LEGAL_START: Lazy<NaiveTime> = Lazy::new(|| NaiveTime::from_hms_opt(8, 30, 0).unwrap());
static TOLERANCE_LIMIT: Lazy<NaiveTime> = Lazy::new(|| NaiveTime::from_hms_opt(8, 45, 0).unwrap());

// Window cut-offs for bucketing a mark by its time of day.
static ENTRY_WINDOW_END: Lazy<NaiveTime> = Lazy::new(|| NaiveTime::from_hms_opt(11, 0, 0).unwrap());
static BREAK_START_WINDOW_END: Lazy<NaiveTime> =
    Lazy::new(|| NaiveTime::from_hms_opt(13, 45, 0).unwrap());
static BREAK_END_WINDOW_END: Lazy<NaiveTime> =
    Lazy::new(|| NaiveTime::from_hms_opt(16, 0, 0).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum DayStatus {
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "NORMAL (TOLERANCIA)")]
    Tolerance,
    #[serde(rename = "ATRASO")]
    Late,
    #[serde(rename = "SIN REGISTRO")]
    NoRecord,
    #[serde(rename = "LIBRE")]
    Free,
}

impl DayStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DayStatus::Normal => "NORMAL",
            DayStatus::Tolerance => "NORMAL (TOLERANCIA)",
            DayStatus::Late => "ATRASO",
            DayStatus::NoRecord => "SIN REGISTRO",
            DayStatus::Free => "LIBRE",
        }
    }
}

/// The classifier output for one employee on one calendar date.
/// Derived on every report request, never persisted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayRecord {
    #[schema(example = "2026-02-10", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "ALVAREZ CASTRO ESTEFANÍA DANIELA")]
    pub employee: String,
    #[schema(example = "DIRECTORA ADMINISTRATIVA Y TH")]
    pub job_title: String,
    /// Earliest entry mark as punched, or `S/M`.
    #[schema(example = "08:20:15")]
    pub clock_in: String,
    /// Entry credited to the day: early arrivals are clamped up to the
    /// legal 08:30:00 start.
    #[schema(example = "08:30:00")]
    pub adjusted_start: String,
    #[schema(example = "17:10:00")]
    pub clock_out: String,
    #[schema(example = "12:30:00")]
    pub break_start: String,
    #[schema(example = "13:30:00")]
    pub break_end: String,
    #[schema(example = "1.00 h")]
    pub break_hours: String,
    #[schema(example = "07:40:00")]
    pub worked_hours: String,
    #[schema(example = "00:00:00")]
    pub overtime_hours: String,
    #[schema(example = "00:20:00")]
    pub deficit_hours: String,
    #[schema(example = "NORMAL", value_type = String)]
    pub status: DayStatus,
}

/// Decimal hours to a `HH:MM:SS` display, minutes rounded.
pub fn format_hours(hours: f64) -> String {
    let mut h = hours.floor() as i64;
    let mut m = ((hours - hours.floor()) * 60.0).round() as i64;
    if m == 60 {
        h += 1;
        m = 0;
    }
    format!("{:02}:{:02}:00", h, m)
}

fn format_time(time: Option<NaiveTime>) -> String {
    match time {
        Some(t) => t.format("%H:%M:%S").to_string(),
        None => NO_MARK.to_string(),
    }
}

fn hours_between(from: NaiveTime, to: NaiveTime) -> f64 {
    (to - from).num_seconds() as f64 / 3600.0
}

/// Classifies one employee-day from the marks punched on that date.
///
/// Marks are bucketed by time of day: before 11:00 the earliest one is
/// the entry, 11:00–13:45 the earliest is the break start, 13:45–16:00
/// the earliest is the break end, and from 16:00 the latest one is the
/// final exit.
pub fn classify_day(
    date: NaiveDate,
    employee: &str,
    job_title: &str,
    marks: &[NaiveDateTime],
) -> DayRecord {
    let mut entry: Option<NaiveTime> = None;
    let mut break_start: Option<NaiveTime> = None;
    let mut break_end: Option<NaiveTime> = None;
    let mut exit: Option<NaiveTime> = None;

    for mark in marks {
        let t = mark.time();
        if t < *ENTRY_WINDOW_END {
            if entry.map_or(true, |cur| t < cur) {
                entry = Some(t);
            }
        } else if t < *BREAK_START_WINDOW_END {
            if break_start.map_or(true, |cur| t < cur) {
                break_start = Some(t);
            }
        } else if t < *BREAK_END_WINDOW_END {
            if break_end.map_or(true, |cur| t < cur) {
                break_end = Some(t);
            }
        } else if exit.map_or(true, |cur| t > cur) {
            exit = Some(t);
        }
    }

    let free = holidays::is_non_working(date);

    let (status, adjusted_start) = if free {
        (DayStatus::Free, entry)
    } else {
        match entry {
            None => (DayStatus::NoRecord, None),
            Some(t) if t <= *LEGAL_START => (DayStatus::Normal, Some(*LEGAL_START)),
            Some(t) if t <= *TOLERANCE_LIMIT => (DayStatus::Tolerance, Some(t)),
            Some(t) => (DayStatus::Late, Some(t)),
        }
    };

    let break_hours = match (break_start, break_end) {
        (Some(start), Some(end)) if !free => hours_between(start, end).max(0.0),
        // One fixed hour is assumed on working days with an entry mark.
        _ if !free && entry.is_some() => 1.0,
        _ => 0.0,
    };

    let (worked, overtime, deficit) = if free {
        (0.0, 0.0, 0.0)
    } else {
        let gross = match (entry, exit) {
            (Some(entry), Some(exit)) => hours_between(entry, exit),
            _ => 0.0,
        };
        let worked = (gross - break_hours).max(0.0);
        let overtime = (worked - EXPECTED_HOURS).max(0.0);
        // A day with nothing worked is SIN REGISTRO, not an 8-hour deficit.
        let deficit = if worked > 0.0 {
            (EXPECTED_HOURS - worked).max(0.0)
        } else {
            0.0
        };
        (worked, overtime, deficit)
    };

    DayRecord {
        date,
        employee: employee.to_string(),
        job_title: job_title.to_string(),
        clock_in: format_time(entry),
        adjusted_start: format_time(adjusted_start),
        clock_out: format_time(exit),
        break_start: format_time(break_start),
        break_end: format_time(break_end),
        break_hours: format!("{:.2} h", break_hours),
        worked_hours: format_hours(worked),
        overtime_hours: format_hours(overtime),
        deficit_hours: format_hours(deficit),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-02-10 is a working Tuesday, outside the holiday table.
    fn workday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()
    }

    fn at(date: NaiveDate, h: u32, m: u32, s: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, s).unwrap()
    }

    fn classify(date: NaiveDate, marks: &[NaiveDateTime]) -> DayRecord {
        classify_day(date, "PEREZ JUAN", "ANALISTA", marks)
    }

    #[test]
    fn early_entry_is_clamped_to_legal_start() {
        let d = workday();
        let rec = classify(d, &[at(d, 7, 55, 10), at(d, 17, 0, 0)]);
        assert_eq!(rec.status, DayStatus::Normal);
        assert_eq!(rec.clock_in, "07:55:10");
        assert_eq!(rec.adjusted_start, "08:30:00");
    }

    #[test]
    fn boundary_entries_classify_per_threshold() {
        let d = workday();

        let rec = classify(d, &[at(d, 8, 30, 0), at(d, 17, 0, 0)]);
        assert_eq!(rec.status, DayStatus::Normal);
        assert_eq!(rec.adjusted_start, "08:30:00");

        let rec = classify(d, &[at(d, 8, 45, 0), at(d, 17, 0, 0)]);
        assert_eq!(rec.status, DayStatus::Tolerance);
        assert_eq!(rec.adjusted_start, "08:45:00");

        let rec = classify(d, &[at(d, 8, 45, 1), at(d, 17, 0, 0)]);
        assert_eq!(rec.status, DayStatus::Late);
        assert_eq!(rec.adjusted_start, "08:45:01");
    }

    #[test]
    fn weekend_with_marks_is_still_free_with_zero_totals() {
        let saturday = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        let rec = classify(saturday, &[at(saturday, 8, 0, 0), at(saturday, 17, 0, 0)]);
        assert_eq!(rec.status, DayStatus::Free);
        assert_eq!(rec.worked_hours, "00:00:00");
        assert_eq!(rec.overtime_hours, "00:00:00");
        assert_eq!(rec.deficit_hours, "00:00:00");
        assert_eq!(rec.break_hours, "0.00 h");
    }

    #[test]
    fn holiday_with_marks_is_free() {
        let carnival = NaiveDate::from_ymd_opt(2026, 2, 16).unwrap();
        let rec = classify(carnival, &[at(carnival, 8, 20, 0)]);
        assert_eq!(rec.status, DayStatus::Free);
        assert_eq!(rec.worked_hours, "00:00:00");
    }

    #[test]
    fn empty_working_day_is_no_record_without_deficit() {
        let rec = classify(workday(), &[]);
        assert_eq!(rec.status, DayStatus::NoRecord);
        assert_eq!(rec.clock_in, NO_MARK);
        assert_eq!(rec.adjusted_start, NO_MARK);
        assert_eq!(rec.worked_hours, "00:00:00");
        assert_eq!(rec.deficit_hours, "00:00:00");
        assert_eq!(rec.break_hours, "0.00 h");
    }

    #[test]
    fn late_day_without_break_marks_gets_default_break() {
        let d = workday();
        let rec = classify(d, &[at(d, 8, 50, 0), at(d, 17, 10, 0)]);
        assert_eq!(rec.status, DayStatus::Late);
        assert_eq!(rec.break_hours, "1.00 h");
        // gross 8.333h, minus the default break -> 7.333h worked
        assert_eq!(rec.worked_hours, "07:20:00");
        assert_eq!(rec.deficit_hours, "00:40:00");
        assert_eq!(rec.overtime_hours, "00:00:00");
    }

    #[test]
    fn measured_break_overrides_the_default() {
        let d = workday();
        let rec = classify(
            d,
            &[
                at(d, 8, 20, 0),
                at(d, 12, 30, 0),
                at(d, 14, 0, 0),
                at(d, 18, 0, 0),
            ],
        );
        assert_eq!(rec.break_start, "12:30:00");
        assert_eq!(rec.break_end, "14:00:00");
        assert_eq!(rec.break_hours, "1.50 h");
        // gross 9.667h minus 1.5h break -> 8.167h, 10 minutes of overtime
        assert_eq!(rec.worked_hours, "08:10:00");
        assert_eq!(rec.overtime_hours, "00:10:00");
        assert_eq!(rec.deficit_hours, "00:00:00");
    }

    #[test]
    fn window_buckets_keep_earliest_except_final_exit() {
        let d = workday();
        let rec = classify(
            d,
            &[
                at(d, 8, 40, 0),
                at(d, 8, 20, 0), // earlier entry wins even out of order
                at(d, 16, 30, 0),
                at(d, 17, 45, 0), // latest exit wins
            ],
        );
        assert_eq!(rec.clock_in, "08:20:00");
        assert_eq!(rec.clock_out, "17:45:00");
    }

    #[test]
    fn hours_format_rounds_minutes() {
        assert_eq!(format_hours(0.0), "00:00:00");
        assert_eq!(format_hours(7.3333333), "07:20:00");
        assert_eq!(format_hours(0.6666667), "00:40:00");
        assert_eq!(format_hours(7.9999), "08:00:00");
    }
}
