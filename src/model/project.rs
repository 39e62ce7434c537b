use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Project {
    #[schema(example = 1)]
    pub id: u64,
    /// Unique catalog code.
    #[schema(example = "INST")]
    pub code: String,
    #[schema(example = "INSTITUCIONAL")]
    pub name: String,
    #[schema(nullable = true)]
    pub description: Option<String>,
    #[schema(example = "ACTIVO")]
    pub status: String,
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
}
