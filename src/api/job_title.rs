use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

use crate::{
    model::job_title::JobTitle,
    utils::db_utils::{build_update_sql, duplicate_field_message, execute_update},
};

const UPDATABLE_COLUMNS: &[&str] = &["code", "name", "level", "description"];

#[derive(Deserialize, ToSchema)]
pub struct CreateJobTitle {
    #[schema(example = "ATH-01")]
    pub code: String,
    #[schema(example = "Analista de Talento Humano")]
    pub name: String,
    #[schema(example = 1, nullable = true)]
    pub level: Option<i32>,
    #[schema(nullable = true)]
    pub description: Option<String>,
}

/// List Job Titles
#[utoipa::path(
    get,
    path = "/api/job-titles",
    responses((status = 200, description = "Job title catalog", body = [JobTitle])),
    tag = "JobTitle"
)]
pub async fn list_job_titles(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let titles =
        sqlx::query_as::<_, JobTitle>("SELECT * FROM job_titles ORDER BY name")
            .fetch_all(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch job titles");
                ErrorInternalServerError("Database error")
            })?;

    Ok(HttpResponse::Ok().json(titles))
}

/// Create Job Title
#[utoipa::path(
    post,
    path = "/api/job-titles",
    request_body = CreateJobTitle,
    responses(
        (status = 200, description = "Job title created"),
        (status = 400, description = "Missing field or duplicate code", body = Object, example = json!({
            "error": "El código del cargo ya existe en el sistema."
        }))
    ),
    tag = "JobTitle"
)]
pub async fn create_job_title(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateJobTitle>,
) -> actix_web::Result<impl Responder> {
    if payload.code.trim().is_empty() || payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Código y Nombre son obligatorios"
        })));
    }

    let result = sqlx::query(
        "INSERT INTO job_titles (code, name, level, description) VALUES (?, ?, ?, ?)",
    )
    .bind(payload.code.trim().to_uppercase())
    .bind(payload.name.trim().to_uppercase())
    .bind(payload.level.unwrap_or(1))
    .bind(payload.description.as_deref().unwrap_or(""))
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(res) => Ok(HttpResponse::Ok().json(json!({ "id": res.last_insert_id() }))),
        Err(e) => {
            if let Some(message) = duplicate_field_message(&e) {
                return Ok(HttpResponse::BadRequest().json(json!({ "error": message })));
            }
            error!(error = %e, "Failed to create job title");
            Err(ErrorInternalServerError("Database error"))
        }
    }
}

/// Update Job Title
#[utoipa::path(
    put,
    path = "/api/job-titles/{id}",
    params(("id", Path, description = "Job title ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Job title updated"),
        (status = 404, description = "Job title not found")
    ),
    tag = "JobTitle"
)]
pub async fn update_job_title(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let job_title_id = path.into_inner();

    let update = build_update_sql("job_titles", &body, UPDATABLE_COLUMNS, "id", job_title_id)?;

    match execute_update(pool.get_ref(), update).await {
        Ok(0) => Ok(HttpResponse::NotFound().json(json!({ "error": "Cargo no encontrado" }))),
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "message": "Cargo actualizado" }))),
        Err(e) => {
            if let Some(message) = duplicate_field_message(&e) {
                return Ok(HttpResponse::BadRequest().json(json!({ "error": message })));
            }
            error!(error = %e, job_title_id, "Failed to update job title");
            Err(ErrorInternalServerError("Database error"))
        }
    }
}

/// Delete Job Title
///
/// Deletion is blocked while employees still reference the title; the
/// error reports the dependent count.
#[utoipa::path(
    delete,
    path = "/api/job-titles/{id}",
    params(("id", Path, description = "Job title ID")),
    responses(
        (status = 200, description = "Job title deleted"),
        (status = 400, description = "Employees still assigned", body = Object, example = json!({
            "error": "Restricción de integridad: 4 funcionarios están asignados a este cargo."
        })),
        (status = 404, description = "Job title not found")
    ),
    tag = "JobTitle"
)]
pub async fn delete_job_title(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let job_title_id = path.into_inner();

    let dependents = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM employees WHERE job_title_id = ?",
    )
    .bind(job_title_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, job_title_id, "Failed to count dependents");
        ErrorInternalServerError("Database error")
    })?;

    if dependents > 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": format!(
                "Restricción de integridad: {} funcionarios están asignados a este cargo.",
                dependents
            )
        })));
    }

    let result = sqlx::query("DELETE FROM job_titles WHERE id = ?")
        .bind(job_title_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, job_title_id, "Failed to delete job title");
            ErrorInternalServerError("Database error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({ "error": "Cargo no encontrado" })));
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
