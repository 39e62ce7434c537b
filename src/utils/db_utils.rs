use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use sqlx::MySqlPool;

/// Typed value for dynamic binds.
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Builds a dynamic UPDATE from a partial JSON payload. Only columns in
/// `allowed` may appear; anything else is rejected before touching the
/// database.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    allowed: &[&str],
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    if let Some(unknown) = obj.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(ErrorBadRequest(format!(
            "Field '{}' cannot be updated",
            unknown
        )));
    }

    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(obj.len() + 1);
    for value in obj.values() {
        values.push(json_to_sql(value)?);
    }
    values.push(SqlValue::I64(id_value as i64));

    Ok(SqlUpdate { sql, values })
}

fn json_to_sql(value: &Value) -> Result<SqlValue, actix_web::Error> {
    let converted = match value {
        Value::String(s) => {
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                SqlValue::Date(d)
            } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                SqlValue::DateTime(dt)
            } else {
                SqlValue::String(s.clone())
            }
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::I64(i)
            } else if let Some(f) = n.as_f64() {
                SqlValue::F64(f)
            } else {
                return Err(ErrorBadRequest("Unsupported numeric value"));
            }
        }
        Value::Bool(b) => SqlValue::Bool(*b),
        Value::Null => SqlValue::Null,
        _ => return Err(ErrorBadRequest("Unsupported JSON value type")),
    };
    Ok(converted)
}

pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

/// Conflicting unique keys, mapped to the operator-facing message that
/// names the offending field. Key names match the schema's unique
/// indexes; MySQL embeds them in the duplicate-entry message.
const UNIQUE_KEY_MESSAGES: &[(&str, &str)] = &[
    ("email", "El CORREO electrónico ya está registrado."),
    ("national_id", "El NÚMERO DE CÉDULA ya está registrado."),
    ("biometric_code", "El ID BIOMÉTRICO ya está asignado."),
    ("teams_name", "El NOMBRE DE TEAMS ya existe."),
    ("job_titles.code", "El código del cargo ya existe en el sistema."),
    ("projects.code", "El código del proyecto ya existe en el sistema."),
];

/// Maps a store error to a field-specific duplicate message, or `None`
/// when it is not a uniqueness violation.
pub fn duplicate_field_message(err: &sqlx::Error) -> Option<String> {
    let db_err = match err {
        sqlx::Error::Database(db_err) => db_err,
        _ => return None,
    };
    if db_err.code().as_deref() != Some("23000") {
        return None;
    }

    let message = db_err.message();
    let specific = UNIQUE_KEY_MESSAGES
        .iter()
        .find(|(key, _)| message.contains(key))
        .map(|(_, msg)| (*msg).to_string());

    Some(specific.unwrap_or_else(|| "Ya existe un registro con datos duplicados.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_sql_binds_in_payload_order() {
        let update = build_update_sql(
            "job_titles",
            &json!({"code": "ATH-01", "level": 2}),
            &["code", "name", "level", "description"],
            "id",
            3,
        )
        .unwrap();
        assert_eq!(update.sql, "UPDATE job_titles SET code = ?, level = ? WHERE id = ?");
        assert_eq!(update.values.len(), 3);
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let err = build_update_sql(
            "job_titles",
            &json!({"salary": 100}),
            &["code", "name"],
            "id",
            1,
        )
        .unwrap_err();
        assert!(err.to_string().contains("salary"));
    }

    #[test]
    fn empty_payloads_are_rejected() {
        assert!(build_update_sql("projects", &json!({}), &["code"], "id", 1).is_err());
        assert!(build_update_sql("projects", &json!([1]), &["code"], "id", 1).is_err());
    }

    #[test]
    fn date_strings_become_typed_binds() {
        let update = build_update_sql(
            "employees",
            &json!({"hire_date": "2026-01-15"}),
            &["hire_date"],
            "id",
            1,
        )
        .unwrap();
        assert!(matches!(update.values[0], SqlValue::Date(_)));
    }
}
