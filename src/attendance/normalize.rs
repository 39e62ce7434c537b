use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// One row of an imported file, as posted by the client: the original
/// column headers mapped to raw cell values.
pub type RawRow = Map<String, Value>;

/// Serial day 25569 is the Unix epoch (Excel day 0 = 1899-12-30).
const SERIAL_UNIX_EPOCH: f64 = 25569.0;

const SECONDS_PER_DAY: f64 = 86400.0;

/// Formats tried, in order, for free-form date/time cells. Teams exports
/// use the US-style AM/PM encoding; biometric dumps vary by vendor.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize, ToSchema,
)]
pub enum MarkKind {
    #[strum(serialize = "ENTRADA")]
    #[serde(rename = "ENTRADA")]
    Entry,
    #[strum(serialize = "SALIDA")]
    #[serde(rename = "SALIDA")]
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize, ToSchema)]
pub enum ImportSource {
    #[strum(serialize = "TEAMS")]
    #[serde(rename = "TEAMS")]
    Teams,
    #[strum(serialize = "BIOMETRICO")]
    #[serde(rename = "BIOMETRIC", alias = "BIOMETRICO")]
    Biometric,
}

/// The four Teams time columns and the mark kind each one maps to. A
/// break is modelled as a SALIDA/ENTRADA pair.
const TEAMS_TIME_COLUMNS: &[(&str, MarkKind)] = &[
    ("Hora de entrada", MarkKind::Entry),
    ("Hora de inicio del descanso", MarkKind::Exit),
    ("Hora de finalización del descanso", MarkKind::Entry),
    ("Hora de salida", MarkKind::Exit),
];

const TEAMS_NAME_COLUMN: &str = "Nombre del empleado";
const BIOMETRIC_ID_COLUMN: &str = "ID de Usuario";
const BIOMETRIC_TIME_COLUMN: &str = "Tiempo";
const BIOMETRIC_STATUS_COLUMNS: &[&str] = &["Estado", "Evento"];

/// Maps a biometric device's free-text status/event field to a mark
/// kind. Token list is configurable so new vendors can be supported
/// without touching the import loop.
#[derive(Debug, Clone)]
pub struct KindClassifier {
    exit_tokens: Vec<String>,
}

impl KindClassifier {
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        Self {
            exit_tokens: tokens
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn classify(&self, status: &str) -> MarkKind {
        let status = status.to_lowercase();
        if self.exit_tokens.iter().any(|t| status.contains(t)) {
            MarkKind::Exit
        } else {
            MarkKind::Entry
        }
    }
}

impl Default for KindClassifier {
    fn default() -> Self {
        Self::from_tokens(vec!["sal".into(), "out".into()])
    }
}

/// The marks extracted from one import row. `reference` is the external
/// employee reference (Teams display name or biometric device ID), still
/// unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMarks {
    pub reference: String,
    pub marks: Vec<(NaiveDateTime, MarkKind)>,
}

/// Converts a spreadsheet date serial (e.g. 45678.354) to a naive local
/// timestamp, rounding to whole seconds.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let secs = ((serial - SERIAL_UNIX_EPOCH) * SECONDS_PER_DAY).round() as i64;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

fn parse_datetime_str(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

/// Interprets a raw cell as a timestamp. Numbers are spreadsheet
/// serials, strings go through the format list. Anything unparseable
/// yields `None` — the cell is skipped, never an error.
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Number(n) => serial_to_datetime(n.as_f64()?),
        Value::String(s) => parse_datetime_str(s),
        _ => None,
    }
}

/// Raw cell to trimmed text; numeric cells (biometric IDs come through
/// both ways) are rendered as-is.
fn cell_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Normalizes one imported row into zero or more marks. Returns `None`
/// when the row carries no usable employee reference.
pub fn normalize_row(
    source: ImportSource,
    row: &RawRow,
    classifier: &KindClassifier,
) -> Option<RowMarks> {
    match source {
        ImportSource::Teams => {
            let reference = cell_text(row.get(TEAMS_NAME_COLUMN)?)?;
            let marks = TEAMS_TIME_COLUMNS
                .iter()
                .filter_map(|(col, kind)| {
                    row.get(*col)
                        .and_then(parse_timestamp)
                        .map(|ts| (ts, *kind))
                })
                .collect();
            Some(RowMarks { reference, marks })
        }
        ImportSource::Biometric => {
            let reference = cell_text(row.get(BIOMETRIC_ID_COLUMN)?)?;
            let marks = match row.get(BIOMETRIC_TIME_COLUMN).and_then(parse_timestamp) {
                Some(ts) => {
                    let status = BIOMETRIC_STATUS_COLUMNS
                        .iter()
                        .find_map(|col| row.get(*col).and_then(cell_text))
                        .unwrap_or_default();
                    vec![(ts, classifier.classify(&status))]
                }
                None => Vec::new(),
            };
            Some(RowMarks { reference, marks })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::json;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn row(value: serde_json::Value) -> RawRow {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn serial_conversion_matches_epoch_offset() {
        assert_eq!(
            serial_to_datetime(45678.3541666667),
            Some(dt(2025, 1, 21, 8, 30, 0))
        );
        assert_eq!(serial_to_datetime(25569.0), Some(dt(1970, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn string_dates_parse_with_us_locale() {
        assert_eq!(
            parse_timestamp(&json!("01/15/2026 08:30 AM")),
            Some(dt(2026, 1, 15, 8, 30, 0))
        );
        assert_eq!(
            parse_timestamp(&json!("2026-01-15 17:05:30")),
            Some(dt(2026, 1, 15, 17, 5, 30))
        );
    }

    #[test]
    fn unparseable_cells_yield_no_mark() {
        assert_eq!(parse_timestamp(&json!("")), None);
        assert_eq!(parse_timestamp(&json!("no es fecha")), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
        assert_eq!(parse_timestamp(&json!(true)), None);
    }

    #[test]
    fn teams_row_yields_break_as_exit_entry_pair() {
        let row = row(json!({
            "Nombre del empleado": "Alvarez Daniela",
            "Hora de entrada": "01/15/2026 08:20 AM",
            "Hora de inicio del descanso": "01/15/2026 12:30 PM",
            "Hora de finalización del descanso": "01/15/2026 01:50 PM",
            "Hora de salida": "01/15/2026 05:10 PM"
        }));
        let marks = normalize_row(ImportSource::Teams, &row, &KindClassifier::default()).unwrap();
        assert_eq!(marks.reference, "Alvarez Daniela");
        assert_eq!(
            marks.marks,
            vec![
                (dt(2026, 1, 15, 8, 20, 0), MarkKind::Entry),
                (dt(2026, 1, 15, 12, 30, 0), MarkKind::Exit),
                (dt(2026, 1, 15, 13, 50, 0), MarkKind::Entry),
                (dt(2026, 1, 15, 17, 10, 0), MarkKind::Exit),
            ]
        );
    }

    #[test]
    fn teams_row_skips_missing_columns_only() {
        let row = row(json!({
            "Nombre del empleado": "Amaya Byron",
            "Hora de entrada": "01/15/2026 08:20 AM",
            "Hora de salida": ""
        }));
        let marks = normalize_row(ImportSource::Teams, &row, &KindClassifier::default()).unwrap();
        assert_eq!(marks.marks.len(), 1);
    }

    #[test]
    fn biometric_status_drives_mark_kind() {
        let classifier = KindClassifier::default();
        let salida = row(json!({
            "ID de Usuario": 10,
            "Tiempo": 45678.3541666667,
            "Estado": "Salida"
        }));
        let marks = normalize_row(ImportSource::Biometric, &salida, &classifier).unwrap();
        assert_eq!(marks.reference, "10");
        assert_eq!(marks.marks, vec![(dt(2025, 1, 21, 8, 30, 0), MarkKind::Exit)]);

        let checkin = row(json!({
            "ID de Usuario": "10",
            "Tiempo": 45678.3541666667,
            "Evento": "Check-In"
        }));
        let marks = normalize_row(ImportSource::Biometric, &checkin, &classifier).unwrap();
        assert_eq!(marks.marks[0].1, MarkKind::Entry);
    }

    #[test]
    fn classifier_tokens_are_configurable() {
        let classifier = KindClassifier::from_tokens(vec!["egreso".into()]);
        assert_eq!(classifier.classify("EGRESO PUERTA 2"), MarkKind::Exit);
        assert_eq!(classifier.classify("salida"), MarkKind::Entry);
    }

    #[test]
    fn row_without_reference_is_dropped() {
        let row = row(json!({ "Hora de entrada": "01/15/2026 08:20 AM" }));
        assert!(normalize_row(ImportSource::Teams, &row, &KindClassifier::default()).is_none());
    }
}
