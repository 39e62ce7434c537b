use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "EMP-7f9c2d",
        "first_name": "ESTEFANÍA DANIELA",
        "last_name": "ALVAREZ CASTRO",
        "national_id": "1712345678",
        "email": "dalvarez@fias.org.ec",
        "phone": "+593991234567",
        "biometric_code": "10",
        "teams_name": "Alvarez Daniela",
        "job_title_id": 3,
        "project_id": 1,
        "status": "ACTIVO",
        "hire_date": "2024-01-01"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-7f9c2d")]
    pub employee_code: String,

    #[schema(example = "ESTEFANÍA DANIELA")]
    pub first_name: String,

    #[schema(example = "ALVAREZ CASTRO")]
    pub last_name: String,

    /// National identification number (cédula). Unique.
    #[schema(example = "1712345678")]
    pub national_id: String,

    #[schema(example = "dalvarez@fias.org.ec", nullable = true)]
    pub email: Option<String>,

    #[schema(example = "+593991234567", nullable = true)]
    pub phone: Option<String>,

    /// Time-clock device code. Unique among active employees.
    #[schema(example = "10", nullable = true)]
    pub biometric_code: Option<String>,

    /// Teams display name as it appears in attendance exports. Unique.
    #[schema(example = "Alvarez Daniela", nullable = true)]
    pub teams_name: Option<String>,

    #[schema(example = 3)]
    pub job_title_id: u64,

    #[schema(example = 1)]
    pub project_id: u64,

    #[schema(example = "ACTIVO")]
    pub status: String,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,
}

/// Listing row with the joined catalog names.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeDetail {
    pub id: u64,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub biometric_code: Option<String>,
    pub teams_name: Option<String>,
    pub status: String,
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,
    #[schema(example = "ANALISTA DE TALENTO HUMANO", nullable = true)]
    pub job_title: Option<String>,
    #[schema(example = "INSTITUCIONAL", nullable = true)]
    pub project: Option<String>,
}
