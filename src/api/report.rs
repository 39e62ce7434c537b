use actix_web::{error::ErrorInternalServerError, http::header::ContentDisposition, web,
    HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::IntoParams;

use crate::attendance::{classify::DayRecord, excel::render_workbook, report::assemble_report};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportQuery {
    /// Month 1-12 (required)
    pub month: Option<u32>,
    /// Four-digit year (required)
    pub year: Option<i32>,
    /// Employee ID, or "all"/absent for everyone
    pub employee_id: Option<String>,
}

impl ReportQuery {
    fn employee_filter(&self) -> Option<u64> {
        match self.employee_id.as_deref() {
            None | Some("all") | Some("todos") => None,
            Some(id) => id.parse().ok(),
        }
    }
}

async fn run_report(
    pool: &MySqlPool,
    query: &ReportQuery,
) -> Result<Result<Vec<DayRecord>, HttpResponse>, actix_web::Error> {
    let (Some(month), Some(year)) = (query.month, query.year) else {
        return Ok(Err(HttpResponse::BadRequest().json(json!({
            "error": "Se requieren los parámetros 'month' y 'year'."
        }))));
    };
    if !(1..=12).contains(&month) {
        return Ok(Err(HttpResponse::BadRequest().json(json!({
            "error": "Mes fuera de rango."
        }))));
    }

    let records = assemble_report(pool, year, month, query.employee_filter())
        .await
        .map_err(|e| {
            error!(error = %e, month, year, "Failed to assemble report");
            ErrorInternalServerError("Database error")
        })?;

    Ok(Ok(records))
}

/// Monthly attendance report
///
/// One Day Record per employee per calendar day of the month, ordered by
/// date then employee.
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Flattened Day Record sequence", body = [DayRecord]),
        (status = 400, description = "Missing month/year parameters")
    ),
    tag = "Report"
)]
pub async fn attendance_report(
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    match run_report(pool.get_ref(), &query).await? {
        Ok(records) => Ok(HttpResponse::Ok().json(records)),
        Err(bad_request) => Ok(bad_request),
    }
}

/// Export the institutional workbook
///
/// Same data as the report endpoint, rendered as a styled multi-sheet
/// xlsx download, one sheet per employee.
#[utoipa::path(
    get,
    path = "/api/reports/export",
    params(ReportQuery),
    responses(
        (status = 200, description = "xlsx attachment", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Missing month/year parameters")
    ),
    tag = "Report"
)]
pub async fn export_report(
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let records = match run_report(pool.get_ref(), &query).await? {
        Ok(records) => records,
        Err(bad_request) => return Ok(bad_request),
    };

    // run_report only succeeds with both parameters present
    let (month, year) = (query.month.unwrap_or(1), query.year.unwrap_or(0));

    let buffer = render_workbook(&records, month, year).map_err(|e| {
        error!(error = %e, "Failed to render workbook");
        ErrorInternalServerError("Spreadsheet rendering failed")
    })?;

    let filename = format!("REPORTE_INSTITUCIONAL_FIAS_{}_{}.xlsx", year, month);

    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header(ContentDisposition::attachment(filename))
        .body(buffer))
}
