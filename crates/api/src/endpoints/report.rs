//! Report submission endpoint.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    routing::post,
};
use dzretour_common::{AppError, AppResult};
use dzretour_core::NewReport;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    extractors::ClientIp,
    rate_limit::RateLimitDecision,
    state::AppState,
};

/// Report request body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// Phone number in any accepted input form.
    pub phone: Option<String>,
    /// Reason category; must match the allow-list exactly.
    pub reason: Option<String>,
    /// Free-text detail for the catch-all category.
    #[validate(length(max = 500, message = "Custom reason is too long"))]
    pub custom_reason: Option<String>,
}

/// Report response body.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub message: &'static str,
    pub id: String,
    pub timestamp: String,
}

/// Submit a report for a phone number.
async fn submit_report(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ReportResponse>)> {
    if let RateLimitDecision::Limited { reset_at } =
        state.report_limiter.check(&format!("ip:{ip}")).await
    {
        return Err(AppError::RateLimited {
            reset_time: reset_at,
        });
    }

    let Json(request) = payload.map_err(|rejection| AppError::InvalidJson(rejection.to_string()))?;
    request.validate()?;

    let phone = request
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    let reason = request
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());
    let (Some(phone), Some(reason)) = (phone, reason) else {
        return Err(AppError::MissingFields(
            "Phone number and reason are required".to_string(),
        ));
    };

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let submitted = state
        .report_service
        .submit(NewReport {
            phone: phone.to_string(),
            reason: reason.to_string(),
            custom_reason: request.custom_reason,
            reporter_ip: ip,
            reporter_user_agent: user_agent,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReportResponse {
            message: "Report submitted successfully",
            id: submitted.id,
            timestamp: submitted.created_at.to_rfc3339(),
        }),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/report", post(submit_report))
}
