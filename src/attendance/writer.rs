use std::future::Future;

use chrono::NaiveDateTime;
use derive_more::{Display, Error};
use sqlx::MySqlPool;
use tracing::debug;

use super::normalize::{ImportSource, MarkKind};

pub const DEFAULT_BATCH_SIZE: usize = 50;

const UPSERT_MARK_SQL: &str = "INSERT INTO marks (employee_id, recorded_at, kind, device, synced) \
     VALUES (?, ?, ?, ?, TRUE) \
     ON DUPLICATE KEY UPDATE synced = TRUE";

/// A normalized, resolved mark ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkInsert {
    pub employee_id: u64,
    pub recorded_at: NaiveDateTime,
    pub kind: MarkKind,
    pub source: ImportSource,
}

/// A batch was rejected by the store. Earlier batches are already
/// committed and stay persisted; `committed` tells the caller how many
/// marks made it in before the failure.
#[derive(Debug, Display, Error)]
#[display(fmt = "mark batch rejected after {} committed marks: {}", committed, source)]
pub struct BatchWriteError {
    pub committed: u64,
    pub source: sqlx::Error,
}

/// Persists marks in fixed-size batches, one transaction per batch, in
/// submission order. The upsert key (employee, timestamp, kind) makes
/// re-imports idempotent: an existing mark only gets its synced flag
/// refreshed.
pub struct MarkWriter {
    batch_size: usize,
}

impl MarkWriter {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub async fn write_all(
        &self,
        pool: &MySqlPool,
        marks: &[MarkInsert],
    ) -> Result<u64, BatchWriteError> {
        self.write_chunks(marks, |batch| async move {
            let mut tx = pool.begin().await?;
            for mark in batch {
                sqlx::query(UPSERT_MARK_SQL)
                    .bind(mark.employee_id)
                    .bind(mark.recorded_at)
                    .bind(mark.kind.to_string())
                    .bind(mark.source.to_string())
                    .execute(&mut *tx)
                    .await?;
            }
            tx.commit().await
        })
        .await
    }

    /// Splits `marks` into batches and commits them in submission order.
    /// `committed` in the error only ever counts fully applied batches;
    /// a rejected batch contributes nothing.
    async fn write_chunks<'a, F, Fut>(
        &self,
        marks: &'a [MarkInsert],
        mut commit: F,
    ) -> Result<u64, BatchWriteError>
    where
        F: FnMut(&'a [MarkInsert]) -> Fut,
        Fut: Future<Output = Result<(), sqlx::Error>>,
    {
        let mut committed: u64 = 0;

        for batch in marks.chunks(self.batch_size) {
            commit(batch)
                .await
                .map_err(|source| BatchWriteError { committed, source })?;

            committed += batch.len() as u64;
            debug!(committed, batch = batch.len(), "mark batch committed");
        }

        Ok(committed)
    }
}

impl Default for MarkWriter {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn mark(employee_id: u64) -> MarkInsert {
        MarkInsert {
            employee_id,
            recorded_at: NaiveDate::from_ymd_opt(2025, 1, 21)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
            kind: MarkKind::Entry,
            source: ImportSource::Biometric,
        }
    }

    #[test]
    fn batch_size_never_drops_below_one() {
        assert_eq!(MarkWriter::new(0).batch_size, 1);
        assert_eq!(MarkWriter::new(75).batch_size, 75);
        assert_eq!(MarkWriter::default().batch_size, DEFAULT_BATCH_SIZE);
    }

    #[actix_web::test]
    async fn chunks_commit_in_submission_order() {
        let writer = MarkWriter::new(2);
        let marks: Vec<MarkInsert> = (1..=5).map(mark).collect();

        let mut seen: Vec<Vec<u64>> = Vec::new();
        let total = writer
            .write_chunks(&marks, |batch| {
                seen.push(batch.iter().map(|m| m.employee_id).collect());
                async { Ok(()) }
            })
            .await
            .unwrap();

        assert_eq!(total, 5);
        assert_eq!(seen, vec![vec![1, 2], vec![3, 4], vec![5]]);
    }

    #[actix_web::test]
    async fn committed_counts_only_fully_applied_chunks() {
        let writer = MarkWriter::new(2);
        let marks: Vec<MarkInsert> = (1..=5).map(mark).collect();

        let mut calls = 0usize;
        let err = writer
            .write_chunks(&marks, |_batch| {
                calls += 1;
                let reject = calls == 3;
                async move {
                    if reject {
                        Err(sqlx::Error::PoolClosed)
                    } else {
                        Ok(())
                    }
                }
            })
            .await
            .unwrap_err();

        // The first two chunks hold two marks each; the failing third
        // chunk adds nothing.
        assert_eq!(err.committed, 4);
        assert_eq!(calls, 3);
    }

    #[actix_web::test]
    async fn first_chunk_failure_reports_zero_committed() {
        let writer = MarkWriter::new(10);
        let marks: Vec<MarkInsert> = (1..=3).map(mark).collect();

        let err = writer
            .write_chunks(&marks, |_| async { Err(sqlx::Error::PoolClosed) })
            .await
            .unwrap_err();

        assert_eq!(err.committed, 0);
    }
}
