//! Report submission service.

use chrono::{DateTime, Duration, Utc};
use dzretour_common::{AppError, AppResult, IdGenerator, PhoneHasher, phone};
use dzretour_db::entities::report;
use dzretour_db::repositories::{ReportRepository, ReportStatsRepository};

use crate::geo::GeoLocator;
use crate::reasons;

/// One report accepted per phone number across all reporters in this window.
const DEDUP_WINDOW_HOURS: i64 = 24;

/// A report as submitted by a caller, before validation.
#[derive(Debug, Clone)]
pub struct NewReport {
    /// Phone number in any accepted input form.
    pub phone: String,
    /// Reason category; must match the allow-list exactly.
    pub reason: String,
    /// Free-text detail, only kept for the catch-all category.
    pub custom_reason: Option<String>,
    /// Reporter IP as seen by the server, or `"unknown"`.
    pub reporter_ip: String,
    /// Reporter User-Agent header, if present.
    pub reporter_user_agent: Option<String>,
}

/// Receipt for an accepted report.
#[derive(Debug, Clone)]
pub struct SubmittedReport {
    /// Generated report id.
    pub id: String,
    /// Server-side acceptance time.
    pub created_at: DateTime<Utc>,
}

/// Service behind `POST /report`.
#[derive(Clone)]
pub struct ReportService {
    reports: ReportRepository,
    stats: ReportStatsRepository,
    hasher: PhoneHasher,
    geo: GeoLocator,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(
        reports: ReportRepository,
        stats: ReportStatsRepository,
        hasher: PhoneHasher,
        geo: GeoLocator,
        id_gen: IdGenerator,
    ) -> Self {
        Self {
            reports,
            stats,
            hasher,
            geo,
            id_gen,
        }
    }

    /// Validate and persist a report.
    ///
    /// The raw phone number never reaches the database: it is normalized,
    /// hashed with the instance salt, and only the hash is stored. A second
    /// report for the same phone inside the dedup window is rejected with
    /// the timestamp of the prior one.
    pub async fn submit(&self, new_report: NewReport) -> AppResult<SubmittedReport> {
        if !reasons::is_valid_reason(&new_report.reason) {
            return Err(AppError::InvalidReason);
        }

        // Free text is only meaningful for the catch-all category;
        // anything else gets it silently dropped.
        let custom_reason = if reasons::is_other_reason(&new_report.reason) {
            new_report
                .custom_reason
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
        } else {
            None
        };

        let normalized = phone::normalize_and_validate(&new_report.phone)?;
        let phone_key = self.hasher.hash(&normalized);

        let now = Utc::now();
        let cutoff = (now - Duration::hours(DEDUP_WINDOW_HOURS)).fixed_offset();

        // Cheap probe before the geolocation round-trip. The conditional
        // insert below still closes the race this probe leaves open.
        if let Some(existing) = self
            .reports
            .find_recent_by_phone_key(&phone_key, cutoff)
            .await?
        {
            return Err(AppError::DuplicateReport {
                last_reported: existing.created_at.with_timezone(&Utc),
            });
        }

        let location = self.geo.lookup(&new_report.reporter_ip).await;

        let id = self.id_gen.generate();
        let model = report::Model {
            id: id.clone(),
            phone_key: phone_key.clone(),
            reason: new_report.reason,
            custom_reason,
            reporter_ip: Some(new_report.reporter_ip).filter(|ip| ip != "unknown"),
            reporter_user_agent: new_report.reporter_user_agent,
            reporter_country: location.country,
            reporter_city: location.city,
            reporter_timezone: location.timezone,
            created_at: now.fixed_offset(),
        };

        let inserted = self.reports.insert_unless_recent(model, cutoff).await?;
        if !inserted {
            // Lost the race to a concurrent submission.
            let last_reported = self
                .reports
                .find_recent_by_phone_key(&phone_key, cutoff)
                .await?
                .map_or(now, |r| r.created_at.with_timezone(&Utc));
            return Err(AppError::DuplicateReport { last_reported });
        }

        self.stats.increment(now.fixed_offset()).await?;

        tracing::info!(report_id = %id, "report stored");

        Ok(SubmittedReport {
            id,
            created_at: now,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dzretour_common::config::GeoIpConfig;
    use dzretour_db::test_utils::report_fixture;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: sea_orm::DatabaseConnection) -> ReportService {
        let db = Arc::new(db);
        ReportService::new(
            ReportRepository::new(db.clone()),
            ReportStatsRepository::new(db),
            PhoneHasher::new("test-salt"),
            GeoLocator::new(&GeoIpConfig {
                enabled: false,
                timeout_secs: 1,
            })
            .unwrap(),
            IdGenerator::new(),
        )
    }

    fn new_report(phone: &str, reason: &str) -> NewReport {
        NewReport {
            phone: phone.to_string(),
            reason: reason.to_string(),
            custom_reason: None,
            reporter_ip: "203.0.113.10".to_string(),
            reporter_user_agent: Some("test-agent".to_string()),
        }
    }

    #[tokio::test]
    async fn accepts_a_fresh_report() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<report::Model>::new()])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let submitted = service(db)
            .submit(new_report("0551234567", "Refused to open package"))
            .await
            .unwrap();
        assert_eq!(submitted.id.len(), 26);
    }

    #[tokio::test]
    async fn rejects_unlisted_reason() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = service(db)
            .submit(new_report("0551234567", "Spam"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidReason));
    }

    #[tokio::test]
    async fn rejects_invalid_phone() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = service(db)
            .submit(new_report("0255123456", "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPhone { .. }));
    }

    #[tokio::test]
    async fn duplicate_within_window_is_a_conflict() {
        let now = Utc::now().fixed_offset();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![report_fixture("key", now)]])
            .into_connection();

        let err = service(db)
            .submit(new_report("0551234567", "Customer changed mind"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateReport { .. }));
    }

    #[tokio::test]
    async fn lost_insert_race_is_a_conflict() {
        let now = Utc::now().fixed_offset();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<report::Model>::new()])
            .append_query_results([vec![report_fixture("key", now)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = service(db)
            .submit(new_report("0551234567", "Customer changed mind"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateReport { .. }));
    }
}
