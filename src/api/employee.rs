use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    model::employee::EmployeeDetail,
    utils::db_utils::{build_update_sql, duplicate_field_message, execute_update, SqlValue},
};

/// Columns the partial update endpoint may touch.
const UPDATABLE_COLUMNS: &[&str] = &[
    "first_name",
    "last_name",
    "national_id",
    "email",
    "phone",
    "biometric_code",
    "teams_name",
    "job_title_id",
    "project_id",
    "status",
    "hire_date",
];

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Estefanía Daniela")]
    pub first_name: String,
    #[schema(example = "Alvarez Castro")]
    pub last_name: String,
    #[schema(example = "1712345678")]
    pub national_id: String,
    #[schema(example = "10")]
    pub biometric_code: String,
    #[schema(example = "dalvarez@fias.org.ec", nullable = true)]
    pub email: Option<String>,
    #[schema(example = "+593991234567", nullable = true)]
    pub phone: Option<String>,
    #[schema(example = "Alvarez Daniela", nullable = true)]
    pub teams_name: Option<String>,
    #[schema(example = 3)]
    pub job_title_id: u64,
    #[schema(example = 1)]
    pub project_id: u64,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    /// Filter by status (`ACTIVO` / `INACTIVO`)
    pub status: Option<String>,
    /// Filter by job title
    pub job_title_id: Option<u64>,
    /// Filter by project
    pub project_id: Option<u64>,
    /// Search by name or national ID
    pub search: Option<String>,
}

fn validation_error(field: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "error": format!("El campo '{}' es obligatorio.", field)
    }))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 200, description = "Employee created", body = Object, example = json!({
            "id": 12, "employee_code": "EMP-7f9c2d"
        })),
        (status = 400, description = "Missing field or uniqueness conflict", body = Object, example = json!({
            "error": "El ID BIOMÉTRICO ya está asignado."
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    // Required fields are checked before any persistence attempt.
    for (field, value) in [
        ("first_name", &payload.first_name),
        ("last_name", &payload.last_name),
        ("national_id", &payload.national_id),
        ("biometric_code", &payload.biometric_code),
    ] {
        if value.trim().is_empty() {
            return Ok(validation_error(field));
        }
    }

    let employee_code = format!("EMP-{}", Uuid::new_v4().simple());

    let result = sqlx::query(
        r#"
        INSERT INTO employees
        (employee_code, first_name, last_name, national_id, email, phone,
         biometric_code, teams_name, job_title_id, project_id, status, hire_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'ACTIVO', ?)
        "#,
    )
    .bind(&employee_code)
    .bind(payload.first_name.trim().to_uppercase())
    .bind(payload.last_name.trim().to_uppercase())
    .bind(payload.national_id.trim())
    .bind(payload.email.as_deref().map(str::trim))
    .bind(payload.phone.as_deref().map(str::trim))
    .bind(payload.biometric_code.trim())
    .bind(payload.teams_name.as_deref().map(str::trim))
    .bind(payload.job_title_id)
    .bind(payload.project_id)
    .bind(Utc::now().date_naive())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(res) => Ok(HttpResponse::Ok().json(json!({
            "id": res.last_insert_id(),
            "employee_code": employee_code
        }))),
        Err(e) => {
            if let Some(message) = duplicate_field_message(&e) {
                return Ok(HttpResponse::BadRequest().json(json!({ "error": message })));
            }
            error!(error = %e, "Failed to create employee");
            Ok(HttpResponse::InternalServerError().json(json!({
                "error": "Error interno al registrar el funcionario"
            })))
        }
    }
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employee list with catalog names", body = [EmployeeDetail])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let mut conditions = Vec::new();
    let mut bindings: Vec<SqlValue> = Vec::new();

    if let Some(status) = &query.status {
        conditions.push("e.status = ?");
        bindings.push(SqlValue::String(status.clone()));
    }
    if let Some(job_title_id) = query.job_title_id {
        conditions.push("e.job_title_id = ?");
        bindings.push(SqlValue::I64(job_title_id as i64));
    }
    if let Some(project_id) = query.project_id {
        conditions.push("e.project_id = ?");
        bindings.push(SqlValue::I64(project_id as i64));
    }
    if let Some(search) = &query.search {
        conditions.push("(e.first_name LIKE ? OR e.last_name LIKE ? OR e.national_id LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(SqlValue::String(like.clone()));
        bindings.push(SqlValue::String(like.clone()));
        bindings.push(SqlValue::String(like));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT e.id, e.employee_code, e.first_name, e.last_name, e.national_id, \
                e.email, e.phone, e.biometric_code, e.teams_name, e.status, e.hire_date, \
                j.name AS job_title, p.name AS project \
         FROM employees e \
         LEFT JOIN job_titles j ON j.id = e.job_title_id \
         LEFT JOIN projects p ON p.id = e.project_id \
         {} ORDER BY e.id DESC",
        where_clause
    );
    debug!(sql = %sql, bindings = ?bindings, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, EmployeeDetail>(&sql);
    for value in bindings {
        data_query = match value {
            SqlValue::String(v) => data_query.bind(v),
            SqlValue::I64(v) => data_query.bind(v),
            other => {
                error!(value = ?other, "Unsupported filter bind");
                return Err(ErrorInternalServerError("Bad filter"));
            }
        };
    }

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeDetail),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let employee = sqlx::query_as::<_, EmployeeDetail>(
        "SELECT e.id, e.employee_code, e.first_name, e.last_name, e.national_id, \
                e.email, e.phone, e.biometric_code, e.teams_name, e.status, e.hire_date, \
                j.name AS job_title, p.name AS project \
         FROM employees e \
         LEFT JOIN job_titles j ON j.id = e.job_title_id \
         LEFT JOIN projects p ON p.id = e.project_id \
         WHERE e.id = ?",
    )
    .bind(employee_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee");
        ErrorInternalServerError("Database error")
    })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "error": "Funcionario no encontrado"
        }))),
    }
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id", Path, description = "Employee ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Employee updated"),
        (status = 400, description = "Unknown column or uniqueness conflict"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let update = build_update_sql("employees", &body, UPDATABLE_COLUMNS, "id", employee_id)?;

    match execute_update(pool.get_ref(), update).await {
        Ok(0) => Ok(HttpResponse::NotFound().json(json!({
            "error": "Funcionario no encontrado"
        }))),
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "message": "Funcionario actualizado"
        }))),
        Err(e) => {
            if let Some(message) = duplicate_field_message(&e) {
                return Ok(HttpResponse::BadRequest().json(json!({ "error": message })));
            }
            error!(error = %e, employee_id, "Failed to update employee");
            Err(ErrorInternalServerError("Database error"))
        }
    }
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) if res.rows_affected() == 0 => Ok(HttpResponse::NotFound().json(json!({
            "error": "Funcionario no encontrado"
        }))),
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "message": "Eliminado con éxito" }))),
        Err(e) => {
            error!(error = %e, employee_id, "Failed to delete employee");
            Ok(HttpResponse::InternalServerError().json(json!({
                "error": "Error interno al eliminar"
            })))
        }
    }
}
