use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One persisted entry/exit punch. Unique on (employee_id, recorded_at,
/// kind); re-imports only refresh the synced flag.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Mark {
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "2026-02-10T08:30:00", value_type = String, format = "date-time")]
    pub recorded_at: NaiveDateTime,
    #[schema(example = "ENTRADA")]
    pub kind: String,
    #[schema(example = "BIOMETRICO")]
    pub device: String,
    pub synced: bool,
}

/// Listing row: a mark joined with the minimal employee fields the
/// monthly view needs.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct MarkWithEmployee {
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "2026-02-10T08:30:00", value_type = String, format = "date-time")]
    pub recorded_at: NaiveDateTime,
    #[schema(example = "ENTRADA")]
    pub kind: String,
    #[schema(example = "BIOMETRICO")]
    pub device: String,
    pub biometric_code: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
}
