use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::MySqlPool;

use super::classify::{classify_day, DayRecord};

/// Row shape for the report driver: one employee with the presentation
/// fields the classifier echoes into every Day Record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportEmployee {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub job_title: Option<String>,
}

impl ReportEmployee {
    /// Report display convention: surnames first.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Classifies every day of the month for one employee. `marks` are that
/// employee's punches within the month, in any order.
pub fn build_employee_month(
    employee: &str,
    job_title: &str,
    year: i32,
    month: u32,
    marks: &[NaiveDateTime],
) -> Vec<DayRecord> {
    let Some(days) = days_in_month(year, month) else {
        return Vec::new();
    };

    (1..=days)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .map(|date| {
            let day_marks: Vec<NaiveDateTime> = marks
                .iter()
                .filter(|m| m.date() == date)
                .copied()
                .collect();
            classify_day(date, employee, job_title, &day_marks)
        })
        .collect()
}

/// Drives the daily classifier across a whole (year, month) for one or
/// all employees. Output is ordered by date, then employee.
pub async fn assemble_report(
    pool: &MySqlPool,
    year: i32,
    month: u32,
    employee_id: Option<u64>,
) -> Result<Vec<DayRecord>, sqlx::Error> {
    let employees = fetch_employees(pool, employee_id).await?;
    let mut marks_by_employee = fetch_month_marks(pool, year, month).await?;

    let mut records: Vec<DayRecord> = Vec::new();
    for employee in &employees {
        let marks = marks_by_employee.remove(&employee.id).unwrap_or_default();
        records.extend(build_employee_month(
            &employee.display_name(),
            employee.job_title.as_deref().unwrap_or("N/A"),
            year,
            month,
            &marks,
        ));
    }

    records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.employee.cmp(&b.employee)));
    Ok(records)
}

async fn fetch_employees(
    pool: &MySqlPool,
    employee_id: Option<u64>,
) -> Result<Vec<ReportEmployee>, sqlx::Error> {
    let base = "SELECT e.id, e.first_name, e.last_name, j.name AS job_title \
         FROM employees e \
         LEFT JOIN job_titles j ON j.id = e.job_title_id";

    match employee_id {
        Some(id) => {
            sqlx::query_as::<_, ReportEmployee>(&format!("{base} WHERE e.id = ?"))
                .bind(id)
                .fetch_all(pool)
                .await
        }
        None => {
            sqlx::query_as::<_, ReportEmployee>(&format!("{base} ORDER BY e.last_name, e.first_name"))
                .fetch_all(pool)
                .await
        }
    }
}

async fn fetch_month_marks(
    pool: &MySqlPool,
    year: i32,
    month: u32,
) -> Result<HashMap<u64, Vec<NaiveDateTime>>, sqlx::Error> {
    let Some((start, end)) = month_bounds(year, month) else {
        return Ok(HashMap::new());
    };

    let rows = sqlx::query_as::<_, (u64, NaiveDateTime)>(
        "SELECT employee_id, recorded_at FROM marks \
         WHERE recorded_at BETWEEN ? AND ? \
         ORDER BY recorded_at",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<u64, Vec<NaiveDateTime>> = HashMap::new();
    for (employee_id, recorded_at) in rows {
        grouped.entry(employee_id).or_default().push(recorded_at);
    }
    Ok(grouped)
}

/// First and last instant of the month, for BETWEEN range queries.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let days = days_in_month(year, month)?;
    let start = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
    let end = NaiveDate::from_ymd_opt(year, month, days)?.and_hms_opt(23, 59, 59)?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::classify::DayStatus;

    #[test]
    fn month_lengths_honor_leap_years() {
        assert_eq!(days_in_month(2026, 2), Some(28));
        assert_eq!(days_in_month(2028, 2), Some(29));
        assert_eq!(days_in_month(2026, 12), Some(31));
        assert_eq!(days_in_month(2026, 13), None);
    }

    #[test]
    fn month_bounds_cover_the_whole_month() {
        let (start, end) = month_bounds(2026, 2).unwrap();
        assert_eq!(start.to_string(), "2026-02-01 00:00:00");
        assert_eq!(end.to_string(), "2026-02-28 23:59:59");
    }

    #[test]
    fn every_day_of_the_month_gets_a_record() {
        let records = build_employee_month("PEREZ JUAN", "ANALISTA", 2026, 2, &[]);
        assert_eq!(records.len(), 28);
        // 2026-02-01 is a Sunday
        assert_eq!(records[0].status, DayStatus::Free);
        // 2026-02-02 is a working Monday with no marks
        assert_eq!(records[1].status, DayStatus::NoRecord);
    }

    #[test]
    fn marks_land_on_their_own_day_only() {
        let d9 = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
        let d10 = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let marks = vec![
            d9.and_hms_opt(8, 20, 0).unwrap(),
            d9.and_hms_opt(17, 0, 0).unwrap(),
            d10.and_hms_opt(8, 50, 0).unwrap(),
        ];
        let records = build_employee_month("PEREZ JUAN", "ANALISTA", 2026, 2, &marks);
        assert_eq!(records[8].status, DayStatus::Normal);
        assert_eq!(records[9].status, DayStatus::Late);
        assert_eq!(records[9].clock_out, "S/M");
    }
}
