use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info};
use utoipa::{IntoParams, ToSchema};

use crate::{
    attendance::{
        normalize::{normalize_row, ImportSource, KindClassifier, RawRow},
        report::month_bounds,
        resolver::EmployeeDirectory,
        writer::{MarkInsert, MarkWriter},
    },
    config::Config,
    model::mark::MarkWithEmployee,
};

#[derive(Deserialize, ToSchema)]
pub struct ImportRequest {
    /// Declared source of the rows.
    #[serde(rename = "type")]
    pub source: ImportSource,
    /// Raw rows keyed by the export's original column headers.
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<RawRow>,
}

#[derive(Serialize, ToSchema)]
pub struct ImportSummary {
    pub success: bool,
    /// Marks upserted (inserted or sync-flag refreshed).
    #[schema(example = 120)]
    pub processed: u64,
    /// Rows dropped: unknown reference or nothing parseable.
    #[schema(example = 3)]
    pub skipped: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthQuery {
    /// Month 1-12 (required)
    pub month: Option<u32>,
    /// Four-digit year (required)
    pub year: Option<i32>,
}

/// Import attendance rows
///
/// Normalizes each row, resolves employee references against a snapshot
/// loaded once for the batch, and upserts the marks in ordered
/// transactional batches. Re-importing the same file is idempotent.
#[utoipa::path(
    post,
    path = "/api/attendance/import",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Import summary", body = ImportSummary),
        (status = 500, description = "A batch was rejected; earlier batches stand", body = Object, example = json!({
            "error": "mark batch rejected after 100 committed marks: ...",
            "committed": 100
        }))
    ),
    tag = "Attendance"
)]
pub async fn import_marks(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<ImportRequest>,
) -> actix_web::Result<impl Responder> {
    // Fresh snapshot per import call; avoids one lookup per row without
    // ever serving a stale employee table across requests.
    let directory = EmployeeDirectory::load(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to load employee directory");
        ErrorInternalServerError("Database error")
    })?;

    let classifier = KindClassifier::from_tokens(config.biometric_exit_tokens.clone());

    let mut inserts: Vec<MarkInsert> = Vec::new();
    let mut unresolved: u64 = 0;
    let mut unparseable: u64 = 0;

    for row in &payload.rows {
        let Some(row_marks) = normalize_row(payload.source, row, &classifier) else {
            unparseable += 1;
            continue;
        };
        let Some(employee_id) = directory.resolve(payload.source, &row_marks.reference) else {
            unresolved += 1;
            continue;
        };
        if row_marks.marks.is_empty() {
            unparseable += 1;
            continue;
        }
        for (recorded_at, kind) in row_marks.marks {
            inserts.push(MarkInsert {
                employee_id,
                recorded_at,
                kind,
                source: payload.source,
            });
        }
    }

    debug!(
        rows = payload.rows.len(),
        directory = directory.len(),
        marks = inserts.len(),
        unresolved,
        unparseable,
        "import batch normalized"
    );

    let writer = MarkWriter::new(config.import_batch_size);
    match writer.write_all(pool.get_ref(), &inserts).await {
        Ok(processed) => {
            info!(processed, skipped = unresolved + unparseable, "import finished");
            Ok(HttpResponse::Ok().json(ImportSummary {
                success: true,
                processed,
                skipped: unresolved + unparseable,
            }))
        }
        Err(e) => {
            error!(error = %e, committed = e.committed, "import aborted");
            Ok(HttpResponse::InternalServerError().json(json!({
                "error": e.to_string(),
                "committed": e.committed
            })))
        }
    }
}

/// List marks for a month
///
/// Marks joined with minimal employee fields, ordered by timestamp then
/// biometric code.
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(MonthQuery),
    responses(
        (status = 200, description = "Marks for the month", body = [MarkWithEmployee]),
        (status = 400, description = "Missing month/year parameters")
    ),
    tag = "Attendance"
)]
pub async fn list_marks(
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    let (Some(month), Some(year)) = (query.month, query.year) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Se requieren los parámetros 'month' y 'year'."
        })));
    };
    let Some((start, end)) = month_bounds(year, month) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Mes o año fuera de rango."
        })));
    };

    let marks = sqlx::query_as::<_, MarkWithEmployee>(
        "SELECT m.id, m.employee_id, m.recorded_at, m.kind, m.device, \
                e.biometric_code, e.first_name, e.last_name, e.national_id \
         FROM marks m \
         JOIN employees e ON e.id = m.employee_id \
         WHERE m.recorded_at BETWEEN ? AND ? \
         ORDER BY m.recorded_at, e.biometric_code",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, month, year, "Failed to list marks");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(marks))
}
