use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct JobTitle {
    #[schema(example = 3)]
    pub id: u64,
    /// Unique catalog code.
    #[schema(example = "ATH-01")]
    pub code: String,
    #[schema(example = "ANALISTA DE TALENTO HUMANO")]
    pub name: String,
    #[schema(example = 1)]
    pub level: i32,
    #[schema(nullable = true)]
    pub description: Option<String>,
}
