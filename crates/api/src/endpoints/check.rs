//! Phone check endpoint.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use chrono::Utc;
use dzretour_common::{AppError, AppResult};
use dzretour_core::{CheckOutcome, ReportPatterns, RiskLevel};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::ClientIp,
    rate_limit::RateLimitDecision,
    state::AppState,
};

/// Check request body.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    /// Phone number in any accepted input form.
    pub phone: Option<String>,
}

/// Check response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub is_reported: bool,
    pub risk: RiskBlock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<PatternsBlock>,
    pub metadata: CheckMetadata,
}

/// Risk block of the check response.
#[derive(Debug, Serialize)]
pub struct RiskBlock {
    pub level: RiskLevel,
    pub message: &'static str,
    /// Raw numeric score, withheld in production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Patterns block, present only when reports exist.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternsBlock {
    pub reason_types: Vec<String>,
    pub has_custom_reasons: bool,
    pub reported_recently: bool,
    pub reporting_timespan: TimespanBlock,
}

/// Coarse first-report bucket.
#[derive(Debug, Serialize)]
pub struct TimespanBlock {
    pub first: &'static str,
}

/// Request metadata echoed back to the caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckMetadata {
    pub checked_at: String,
    /// Checks left in the caller's current rate limit window.
    pub remaining: u32,
}

impl From<ReportPatterns> for PatternsBlock {
    fn from(p: ReportPatterns) -> Self {
        Self {
            reason_types: p.reason_types,
            has_custom_reasons: p.has_custom_reasons,
            reported_recently: p.reported_recently,
            reporting_timespan: TimespanBlock {
                first: p.first_reported,
            },
        }
    }
}

/// Check a phone number against the report database.
async fn check_phone(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> AppResult<Json<CheckResponse>> {
    // The limiter counts the request before the body is even parsed, so
    // malformed payloads burn quota too.
    let remaining = match state.check_limiter.check(&format!("ip:{ip}")).await {
        RateLimitDecision::Allowed { remaining, .. } => remaining,
        RateLimitDecision::Limited { reset_at } => {
            return Err(AppError::RateLimitedCheck {
                reset_time: reset_at,
            });
        }
    };

    let Json(request) = payload.map_err(|rejection| AppError::InvalidJson(rejection.to_string()))?;

    let phone = request
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(AppError::MissingPhone)?;

    let CheckOutcome {
        is_reported,
        risk,
        patterns,
    } = state.check_service.check(phone).await?;

    Ok(Json(CheckResponse {
        is_reported,
        risk: RiskBlock {
            level: risk.level,
            message: risk.message,
            score: state.expose_score.then_some(risk.score),
        },
        patterns: patterns.map(Into::into),
        metadata: CheckMetadata {
            checked_at: Utc::now().to_rfc3339(),
            remaining,
        },
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/check", post(check_phone))
}
