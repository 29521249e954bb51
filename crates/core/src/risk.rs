//! Time-decayed risk scoring.
//!
//! Converts the report history of a phone number into a qualitative risk
//! level and a numeric score. Pure functions of their inputs: callers pass
//! `now` explicitly, so the same history always scores the same.
//!
//! Per-report points decay with age, recent activity earns a capped bonus,
//! and a sustained reporting frequency earns a small extra. The thresholds
//! below were tuned against exactly this accumulation; they are not
//! interchangeable with other formulas.

use chrono::{DateTime, Duration, Utc};
use dzretour_db::entities::report;
use serde::Serialize;

/// Qualitative risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Lowercase wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Result of scoring a report history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Qualitative level.
    pub level: RiskLevel,
    /// Numeric score, rounded to one decimal place.
    pub score: f64,
    /// Fixed human-readable message for the level.
    pub message: &'static str,
}

/// General patterns derived from a report history.
///
/// Exact counts and dates are deliberately withheld so a requester probing
/// a number cannot reconstruct report volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPatterns {
    /// Up to three distinct reason categories, in order of first appearance.
    pub reason_types: Vec<String>,
    /// Whether any report carried a free-text reason.
    pub has_custom_reasons: bool,
    /// Whether any report falls within the last 30 days.
    pub reported_recently: bool,
    /// Coarse bucket for how long ago the first report occurred.
    pub first_reported: &'static str,
}

const MSG_SAFE: &str = "No reports found";
const MSG_LOW: &str = "Low risk detected";
const MSG_MEDIUM: &str = "Moderate risk - exercise caution";
const MSG_HIGH: &str = "High risk - proceed with extreme caution";

/// Points a single report contributes, by age bucket.
fn decay_points(days_old: i64) -> f64 {
    if days_old <= 7 {
        15.0
    } else if days_old <= 30 {
        12.0
    } else if days_old <= 90 {
        9.0
    } else if days_old <= 180 {
        6.0
    } else if days_old <= 365 {
        3.0
    } else {
        1.5
    }
}

/// Score a report history.
///
/// `created_at` holds one timestamp per report; `days_since_first` is the
/// whole-day age of the earliest report (0 when there are none).
#[must_use]
pub fn score_reports(
    created_at: &[DateTime<Utc>],
    days_since_first: i64,
    now: DateTime<Utc>,
) -> RiskAssessment {
    if created_at.is_empty() {
        return RiskAssessment {
            level: RiskLevel::Safe,
            score: 0.0,
            message: MSG_SAFE,
        };
    }

    let mut total: f64 = created_at
        .iter()
        .map(|ts| decay_points((now - *ts).num_days()))
        .sum();

    // Recent activity bonus: +5 per report in the last 30 days, capped at +20.
    let recent = created_at
        .iter()
        .filter(|ts| now - **ts < Duration::days(30))
        .count();
    if recent > 0 {
        total += (recent as f64 * 5.0).min(20.0);
    }

    // Frequency bonus over the lifetime of the history.
    let per_day = created_at.len() as f64 / days_since_first.max(1) as f64;
    if per_day > 0.5 {
        total += 10.0;
    } else if per_day > 0.1 {
        total += 3.0;
    }

    let score = (total * 10.0).round() / 10.0;

    let (level, message) = if score < 15.0 {
        (RiskLevel::Low, MSG_LOW)
    } else if score < 35.0 {
        (RiskLevel::Medium, MSG_MEDIUM)
    } else {
        (RiskLevel::High, MSG_HIGH)
    };

    RiskAssessment {
        level,
        score,
        message,
    }
}

/// Whole days since the earliest report, assuming ascending order.
/// Zero when the history is empty.
#[must_use]
pub fn days_since_first(reports: &[report::Model], now: DateTime<Utc>) -> i64 {
    reports
        .first()
        .map_or(0, |r| (now - r.created_at.with_timezone(&Utc)).num_days().max(0))
}

/// Derive the patterns block for a check response. `None` when there are no
/// reports, in which case the block is omitted from the response entirely.
#[must_use]
pub fn derive_patterns(
    reports: &[report::Model],
    days_since_first: i64,
    now: DateTime<Utc>,
) -> Option<ReportPatterns> {
    if reports.is_empty() {
        return None;
    }

    let mut reason_types: Vec<String> = Vec::new();
    for r in reports {
        if !reason_types.contains(&r.reason) {
            reason_types.push(r.reason.clone());
            if reason_types.len() == 3 {
                break;
            }
        }
    }

    let has_custom_reasons = reports
        .iter()
        .any(|r| r.custom_reason.as_deref().is_some_and(|c| !c.is_empty()));

    let reported_recently = reports
        .iter()
        .any(|r| now - r.created_at.with_timezone(&Utc) < Duration::days(30));

    let first_reported = if days_since_first > 365 {
        "over a year ago"
    } else if days_since_first > 30 {
        "over a month ago"
    } else if days_since_first > 7 {
        "over a week ago"
    } else {
        "recently"
    };

    Some(ReportPatterns {
        reason_types,
        has_custom_reasons,
        reported_recently,
        first_reported,
    })
}
