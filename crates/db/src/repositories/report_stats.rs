//! Aggregate stats repository.

use std::sync::Arc;

use crate::entities::{ReportStats, report_stats};
use dzretour_common::{AppError, AppResult};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{DatabaseConnection, EntityTrait, Set};

/// Repository for the single global stats row.
#[derive(Clone)]
pub struct ReportStatsRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportStatsRepository {
    /// Create a new stats repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record one accepted report: insert the row on first report ever,
    /// increment the counter thereafter. One atomic upsert.
    pub async fn increment(&self, now: DateTimeWithTimeZone) -> AppResult<()> {
        let active = report_stats::ActiveModel {
            id: Set(report_stats::GLOBAL_STATS_ID.to_string()),
            total_reports: Set(1),
            last_updated: Set(now),
        };

        ReportStats::insert(active)
            .on_conflict(
                OnConflict::column(report_stats::Column::Id)
                    .value(
                        report_stats::Column::TotalReports,
                        Expr::col((report_stats::Entity, report_stats::Column::TotalReports))
                            .add(1),
                    )
                    .value(report_stats::Column::LastUpdated, now)
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Current aggregate counters, if any report was ever accepted.
    pub async fn get(&self) -> AppResult<Option<report_stats::Model>> {
        ReportStats::find_by_id(report_stats::GLOBAL_STATS_ID)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn increment_executes_upsert() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = ReportStatsRepository::new(Arc::new(db));
        repo.increment(Utc::now().fixed_offset()).await.unwrap();
    }
}
