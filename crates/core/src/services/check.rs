//! Phone number check service.

use chrono::{DateTime, Utc};
use dzretour_common::{AppResult, PhoneHasher, phone};
use dzretour_db::repositories::ReportRepository;

use crate::risk::{self, ReportPatterns, RiskAssessment};

/// Everything a check response is built from.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Whether at least one report exists for this number.
    pub is_reported: bool,
    /// Scored risk for the full history.
    pub risk: RiskAssessment,
    /// Derived patterns, absent when there are no reports.
    pub patterns: Option<ReportPatterns>,
}

/// Service behind `POST /check`.
#[derive(Clone)]
pub struct CheckService {
    reports: ReportRepository,
    hasher: PhoneHasher,
}

impl CheckService {
    /// Create a new check service.
    #[must_use]
    pub const fn new(reports: ReportRepository, hasher: PhoneHasher) -> Self {
        Self { reports, hasher }
    }

    /// Look up a phone number and score its report history.
    ///
    /// The raw number is normalized and hashed before touching storage;
    /// the lookup itself only ever sees the hash.
    pub async fn check(&self, raw_phone: &str) -> AppResult<CheckOutcome> {
        let normalized = phone::normalize_and_validate(raw_phone)?;
        let phone_key = self.hasher.hash(&normalized);

        let reports = self.reports.find_by_phone_key(&phone_key).await?;

        let now = Utc::now();
        let days_since_first = risk::days_since_first(&reports, now);
        let timestamps: Vec<DateTime<Utc>> = reports
            .iter()
            .map(|r| r.created_at.with_timezone(&Utc))
            .collect();

        let assessment = risk::score_reports(&timestamps, days_since_first, now);
        let patterns = risk::derive_patterns(&reports, days_since_first, now);

        Ok(CheckOutcome {
            is_reported: !reports.is_empty(),
            risk: assessment,
            patterns,
        })
    }
}
