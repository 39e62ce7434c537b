use std::collections::{HashMap, HashSet};

use sqlx::MySqlPool;

use super::normalize::ImportSource;

/// Full in-memory snapshot of employee external references, loaded once
/// per import batch so the row loop never round-trips to the database.
#[derive(Debug, Default)]
pub struct EmployeeDirectory {
    by_biometric: HashMap<String, u64>,
    by_teams: HashMap<String, u64>,
}

#[derive(sqlx::FromRow)]
struct DirectoryRow {
    id: u64,
    biometric_code: Option<String>,
    teams_name: Option<String>,
}

impl EmployeeDirectory {
    pub async fn load(pool: &MySqlPool) -> Result<Self, sqlx::Error> {
        let rows = sqlx::query_as::<_, DirectoryRow>(
            "SELECT id, biometric_code, teams_name FROM employees",
        )
        .fetch_all(pool)
        .await?;

        Ok(Self::from_rows(rows.into_iter().map(|r| {
            (r.id, r.biometric_code, r.teams_name)
        })))
    }

    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (u64, Option<String>, Option<String>)>,
    {
        let mut directory = Self::default();
        for (id, biometric, teams) in rows {
            if let Some(code) = biometric {
                let code = code.trim().to_string();
                if !code.is_empty() {
                    directory.by_biometric.insert(code, id);
                }
            }
            if let Some(name) = teams {
                let name = name.trim().to_string();
                if !name.is_empty() {
                    directory.by_teams.insert(name, id);
                }
            }
        }
        directory
    }

    /// Exact-match lookup by the reference kind the source emits.
    pub fn resolve(&self, source: ImportSource, reference: &str) -> Option<u64> {
        let reference = reference.trim();
        match source {
            ImportSource::Teams => self.by_teams.get(reference).copied(),
            ImportSource::Biometric => self.by_biometric.get(reference).copied(),
        }
    }

    /// Distinct employees with at least one indexed reference.
    pub fn len(&self) -> usize {
        self.by_biometric
            .values()
            .chain(self.by_teams.values())
            .collect::<HashSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> EmployeeDirectory {
        EmployeeDirectory::from_rows(vec![
            (1, Some("10".into()), Some("Alvarez Daniela".into())),
            (2, Some(" 103 ".into()), None),
            (3, None, Some("Araujo Paulina".into())),
        ])
    }

    #[test]
    fn resolves_by_the_source_kind() {
        let d = directory();
        assert_eq!(d.resolve(ImportSource::Biometric, "10"), Some(1));
        assert_eq!(d.resolve(ImportSource::Teams, "Alvarez Daniela"), Some(1));
        assert_eq!(d.resolve(ImportSource::Teams, "10"), None);
    }

    #[test]
    fn references_are_trimmed_on_both_sides() {
        let d = directory();
        assert_eq!(d.resolve(ImportSource::Biometric, " 103 "), Some(2));
    }

    #[test]
    fn unknown_reference_is_a_miss_not_an_error() {
        let d = directory();
        assert_eq!(d.resolve(ImportSource::Teams, "Nuevo Empleado"), None);
    }

    #[test]
    fn len_counts_distinct_employees_across_both_indexes() {
        // Employee 2 is biometric-only and 3 is teams-only, so neither
        // index alone sees all three.
        let d = directory();
        assert_eq!(d.len(), 3);
        assert_eq!(EmployeeDirectory::default().len(), 0);
    }
}
