use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

use crate::{
    model::project::Project,
    utils::db_utils::{build_update_sql, duplicate_field_message, execute_update},
};

const UPDATABLE_COLUMNS: &[&str] = &["code", "name", "description", "status", "start_date"];

#[derive(Deserialize, ToSchema)]
pub struct CreateProject {
    #[schema(example = "REM")]
    pub code: String,
    #[schema(example = "Programa REM")]
    pub name: String,
    #[schema(nullable = true)]
    pub description: Option<String>,
    #[schema(example = "ACTIVO", nullable = true)]
    pub status: Option<String>,
    #[schema(example = "2026-01-01", value_type = String, format = "date", nullable = true)]
    pub start_date: Option<NaiveDate>,
}

/// List Projects
#[utoipa::path(
    get,
    path = "/api/projects",
    responses((status = 200, description = "Project catalog", body = [Project])),
    tag = "Project"
)]
pub async fn list_projects(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let projects = sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY name")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch projects");
            ErrorInternalServerError("Database error")
        })?;

    Ok(HttpResponse::Ok().json(projects))
}

/// Create Project
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProject,
    responses(
        (status = 200, description = "Project created"),
        (status = 400, description = "Missing field or duplicate code")
    ),
    tag = "Project"
)]
pub async fn create_project(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateProject>,
) -> actix_web::Result<impl Responder> {
    if payload.code.trim().is_empty() || payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Código y Nombre son obligatorios"
        })));
    }

    let result = sqlx::query(
        "INSERT INTO projects (code, name, description, status, start_date) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(payload.code.trim().to_uppercase())
    .bind(payload.name.trim().to_uppercase())
    .bind(payload.description.as_deref().unwrap_or(""))
    .bind(payload.status.as_deref().unwrap_or("ACTIVO"))
    .bind(payload.start_date.unwrap_or_else(|| Utc::now().date_naive()))
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(res) => Ok(HttpResponse::Ok().json(json!({ "id": res.last_insert_id() }))),
        Err(e) => {
            if let Some(message) = duplicate_field_message(&e) {
                return Ok(HttpResponse::BadRequest().json(json!({ "error": message })));
            }
            error!(error = %e, "Failed to create project");
            Err(ErrorInternalServerError("Database error"))
        }
    }
}

/// Update Project
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(("id", Path, description = "Project ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Project updated"),
        (status = 404, description = "Project not found")
    ),
    tag = "Project"
)]
pub async fn update_project(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let project_id = path.into_inner();

    let update = build_update_sql("projects", &body, UPDATABLE_COLUMNS, "id", project_id)?;

    match execute_update(pool.get_ref(), update).await {
        Ok(0) => Ok(HttpResponse::NotFound().json(json!({ "error": "Proyecto no encontrado" }))),
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "message": "Proyecto actualizado" }))),
        Err(e) => {
            if let Some(message) = duplicate_field_message(&e) {
                return Ok(HttpResponse::BadRequest().json(json!({ "error": message })));
            }
            error!(error = %e, project_id, "Failed to update project");
            Err(ErrorInternalServerError("Database error"))
        }
    }
}

/// Delete Project
///
/// Blocked while employees are still assigned to the project.
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id", Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted"),
        (status = 400, description = "Employees still assigned"),
        (status = 404, description = "Project not found")
    ),
    tag = "Project"
)]
pub async fn delete_project(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let project_id = path.into_inner();

    let dependents =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE project_id = ?")
            .bind(project_id)
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, project_id, "Failed to count dependents");
                ErrorInternalServerError("Database error")
            })?;

    if dependents > 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": format!("Proyecto con personal asignado: {} funcionarios.", dependents)
        })));
    }

    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(project_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, project_id, "Failed to delete project");
            ErrorInternalServerError("Database error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({ "error": "Proyecto no encontrado" })));
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
