use chrono::{Datelike, Weekday};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};

use super::classify::{DayRecord, DayStatus};

const INSTITUTION_TITLE: &str = "FONDO DE INVERSIÓN AMBIENTAL SOSTENIBLE - FIAS";
const REPORT_TITLE: &str = "REGISTRO MENSUAL DE ASISTENCIA Y PERMANENCIA";

/// Flat institutional break credit shown in the workbook regardless of
/// the computed break duration. Kept to match the legacy template; the
/// JSON report carries the computed value.
const INSTITUTIONAL_BREAK: &str = "01:00:00";

const LATE_OBSERVATION: &str = "EXCEDE TOLERANCIA 08:45";

const HEADER_FILL: u32 = 0x4472C4;
const FREE_FILL: u32 = 0xF2F2F2;
const FREE_FONT: u32 = 0xA6A6A6;
const SHIFT_FILL: u32 = 0xFFF2CC;
const DEFICIT_FILL: u32 = 0xFCE4D6;
const DEFICIT_FONT: u32 = 0x9C0006;

const HEADERS: &[&str] = &[
    "FECHA",
    "DÍA",
    "NOVEDAD",
    "DETALLE",
    "BIOMÉTRICO (E)",
    "INICIO JORNADA REAL",
    "FIN JORNADA",
    "INI DESCANSO",
    "FIN DESCANSO",
    "T. DESC. BIO",
    "TOTAL DESC.",
    "H. TRABAJADAS",
    "EXTRAS",
    "H. MENOS",
    "OBSERVACIONES",
];

const COLUMN_WIDTHS: &[f64] = &[
    12.0, 12.0, 15.0, 15.0, 15.0, 15.0, 15.0, 12.0, 12.0, 12.0, 12.0, 15.0, 10.0, 10.0, 30.0,
];

// Data occupies columns A..O; headers sit on spreadsheet row 7.
const LAST_COL: u16 = 14;
const HEADER_ROW: u32 = 6;

/// Sheet names are capped at 31 characters by the xlsx format.
pub fn sheet_name(employee: &str) -> String {
    employee.chars().take(31).collect()
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// Signature block row, three rows below the last data row. Data rows
/// start at `HEADER_ROW + 1`.
fn signature_row(data_rows: usize) -> u32 {
    HEADER_ROW + data_rows as u32 + 3
}

/// Groups records by employee, preserving first-seen order, so each
/// employee gets one sheet.
fn group_by_employee(records: &[DayRecord]) -> Vec<(String, Vec<&DayRecord>)> {
    let mut groups: Vec<(String, Vec<&DayRecord>)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(name, _)| name == &record.employee) {
            Some((_, rows)) => rows.push(record),
            None => groups.push((record.employee.clone(), vec![record])),
        }
    }
    groups
}

/// Renders the institutional workbook: one sheet per employee with the
/// FIAS header block, the styled table, conditional fills, and the
/// signature block. Pure rendering over already-computed Day Records.
pub fn render_workbook(records: &[DayRecord], month: u32, year: i32) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    let title_format = Format::new()
        .set_font_name("Arial")
        .set_font_size(14)
        .set_bold()
        .set_font_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center);
    let subtitle_format = Format::new().set_bold().set_align(FormatAlign::Center);
    let label_format = Format::new().set_bold();

    let header_format = Format::new()
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_font_color(Color::White)
        .set_bold()
        .set_font_size(9)
        .set_font_name("Arial")
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin);

    let base = Format::new()
        .set_font_size(9)
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let free_format = base
        .clone()
        .set_background_color(Color::RGB(FREE_FILL))
        .set_font_color(Color::RGB(FREE_FONT));
    let shift_format = base.clone().set_background_color(Color::RGB(SHIFT_FILL));
    let deficit_format = base
        .clone()
        .set_background_color(Color::RGB(DEFICIT_FILL))
        .set_font_color(Color::RGB(DEFICIT_FONT))
        .set_bold();

    let signature_format = Format::new()
        .set_bold()
        .set_font_size(9)
        .set_align(FormatAlign::Center);

    for (employee, rows) in group_by_employee(records) {
        let name = sheet_name(&employee);
        let sheet = workbook.add_worksheet();
        sheet.set_name(&name)?;

        for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
            sheet.set_column_width(col as u16, *width)?;
        }

        let job_title = rows
            .first()
            .map(|r| r.job_title.clone())
            .unwrap_or_else(|| "N/A".to_string());

        // Institutional header block
        sheet.merge_range(0, 0, 0, LAST_COL, INSTITUTION_TITLE, &title_format)?;
        sheet.merge_range(1, 0, 1, LAST_COL, REPORT_TITLE, &subtitle_format)?;
        sheet.write_string_with_format(3, 0, "FUNCIONARIO:", &label_format)?;
        sheet.write_string(3, 1, &employee)?;
        sheet.write_string_with_format(4, 0, "CARGO:", &label_format)?;
        sheet.write_string(4, 1, &job_title)?;
        sheet.write_string_with_format(3, 11, "MES:", &label_format)?;
        sheet.write_number(3, 12, month as f64)?;
        sheet.write_string_with_format(4, 11, "AÑO:", &label_format)?;
        sheet.write_number(4, 12, year as f64)?;

        sheet.set_row_height(HEADER_ROW, 35)?;
        for (col, header) in HEADERS.iter().enumerate() {
            sheet.write_string_with_format(HEADER_ROW, col as u16, *header, &header_format)?;
        }

        for (idx, record) in rows.iter().enumerate() {
            let row = HEADER_ROW + 1 + idx as u32;
            let free = record.status == DayStatus::Free;

            let cells: [String; 15] = [
                record.date.format("%Y-%m-%d").to_string(),
                weekday_name(record.date.weekday()).to_string(),
                record.status.label().to_string(),
                if free { "NO LABORABLE" } else { "LABORAL" }.to_string(),
                record.clock_in.clone(),
                record.adjusted_start.clone(),
                record.clock_out.clone(),
                record.break_start.clone(),
                record.break_end.clone(),
                INSTITUTIONAL_BREAK.to_string(),
                INSTITUTIONAL_BREAK.to_string(),
                record.worked_hours.clone(),
                record.overtime_hours.clone(),
                record.deficit_hours.clone(),
                if record.status == DayStatus::Late {
                    LATE_OBSERVATION
                } else {
                    ""
                }
                .to_string(),
            ];

            for (col, value) in cells.iter().enumerate() {
                let col = col as u16;
                let format = if free {
                    &free_format
                } else if col == 5 || col == 6 {
                    &shift_format
                } else if col == 13 && record.deficit_hours != "00:00:00" {
                    &deficit_format
                } else {
                    &base
                };
                sheet.write_string_with_format(row, col, value, format)?;
            }
        }

        let sig_row = signature_row(rows.len());
        sheet.merge_range(sig_row, 1, sig_row, 4, "__________________________", &base)?;
        sheet.write_string_with_format(sig_row + 1, 1, "ELABORADO POR (F):", &signature_format)?;
        sheet.write_string(sig_row + 2, 1, &employee)?;

        sheet.merge_range(sig_row, 10, sig_row, 13, "__________________________", &base)?;
        sheet.write_string_with_format(sig_row + 1, 10, "VALIDADO POR (F):", &signature_format)?;
        sheet.write_string(sig_row + 2, 10, "TALENTO HUMANO / RESPONSABLE")?;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::classify::classify_day;
    use chrono::NaiveDate;

    fn sample_records() -> Vec<DayRecord> {
        let date = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let marks = [
            date.and_hms_opt(8, 50, 0).unwrap(),
            date.and_hms_opt(17, 10, 0).unwrap(),
        ];
        vec![
            classify_day(date, "PEREZ JUAN", "ANALISTA", &marks),
            classify_day(date, "GOMEZ MARIA", "ASISTENTE", &[]),
        ]
    }

    #[test]
    fn sheet_names_are_capped_at_31_chars() {
        let long = "VILLARREAL ERAZO MATILDE DE LOS ANGELES";
        assert_eq!(sheet_name(long).chars().count(), 31);
        assert_eq!(sheet_name("PEREZ JUAN"), "PEREZ JUAN");
    }

    #[test]
    fn signature_block_sits_three_rows_below_the_table() {
        let last_data_row = HEADER_ROW + 20;
        assert_eq!(signature_row(20), last_data_row + 3);
        assert_eq!(signature_row(0), HEADER_ROW + 3);
    }

    #[test]
    fn weekdays_render_in_spanish() {
        let tuesday = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        assert_eq!(weekday_name(tuesday.weekday()), "martes");
    }

    #[test]
    fn one_group_per_employee_in_first_seen_order() {
        let records = sample_records();
        let groups = group_by_employee(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "PEREZ JUAN");
        assert_eq!(groups[1].0, "GOMEZ MARIA");
    }

    #[test]
    fn workbook_renders_to_a_non_empty_buffer() {
        let buffer = render_workbook(&sample_records(), 2, 2026).unwrap();
        assert!(!buffer.is_empty());
    }
}
