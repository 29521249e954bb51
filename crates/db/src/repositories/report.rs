//! Report repository.

use std::sync::Arc;

use crate::entities::{Report, report};
use dzretour_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter,
    QueryOrder, Statement,
};
use sea_orm::prelude::DateTimeWithTimeZone;

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All reports for a phone key, oldest first.
    pub async fn find_by_phone_key(&self, phone_key: &str) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::PhoneKey.eq(phone_key))
            .order_by_asc(report::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Most recent report for a phone key at or after `cutoff`, if any.
    pub async fn find_recent_by_phone_key(
        &self,
        phone_key: &str,
        cutoff: DateTimeWithTimeZone,
    ) -> AppResult<Option<report::Model>> {
        Report::find()
            .filter(report::Column::PhoneKey.eq(phone_key))
            .filter(report::Column::CreatedAt.gte(cutoff))
            .order_by_desc(report::Column::CreatedAt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a report unless another report for the same phone key exists
    /// at or after `cutoff`.
    ///
    /// The dedup window is enforced inside a single conditional INSERT, so
    /// two concurrent submissions for the same phone cannot both pass a
    /// separate existence check. Returns `true` if the row was inserted,
    /// `false` if the window suppressed it.
    pub async fn insert_unless_recent(
        &self,
        model: report::Model,
        cutoff: DateTimeWithTimeZone,
    ) -> AppResult<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO "report"
                ("id", "phone_key", "reason", "custom_reason", "reporter_ip",
                 "reporter_user_agent", "reporter_country", "reporter_city",
                 "reporter_timezone", "created_at")
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10
            WHERE NOT EXISTS (
                SELECT 1 FROM "report"
                WHERE "phone_key" = $2 AND "created_at" >= $11
            )
            "#,
            [
                model.id.into(),
                model.phone_key.into(),
                model.reason.into(),
                model.custom_reason.into(),
                model.reporter_ip.into(),
                model.reporter_user_agent.into(),
                model.reporter_country.into(),
                model.reporter_city.into(),
                model.reporter_timezone.into(),
                model.created_at.into(),
                cutoff.into(),
            ],
        );

        let result = self
            .db
            .execute(stmt)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::report_fixture;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn find_by_phone_key_returns_rows() {
        let now = Utc::now().fixed_offset();
        let rows = vec![
            report_fixture("key", now - Duration::days(3)),
            report_fixture("key", now),
        ];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows.clone()])
            .into_connection();

        let repo = ReportRepository::new(Arc::new(db));
        let found = repo.find_by_phone_key("key").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].phone_key, "key");
    }

    #[tokio::test]
    async fn insert_unless_recent_reports_suppression() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = ReportRepository::new(Arc::new(db));
        let now = Utc::now().fixed_offset();
        let cutoff = now - Duration::hours(24);

        let inserted = repo
            .insert_unless_recent(report_fixture("key", now), cutoff)
            .await
            .unwrap();
        assert!(inserted);

        let inserted = repo
            .insert_unless_recent(report_fixture("key", now), cutoff)
            .await
            .unwrap();
        assert!(!inserted);
    }
}
