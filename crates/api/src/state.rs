//! Shared application state.

use dzretour_core::{CheckService, ReportService};

use crate::rate_limit::RateLimiter;

/// State shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Report submission service.
    pub report_service: ReportService,
    /// Phone check service.
    pub check_service: CheckService,
    /// Per-IP limiter for `/check`.
    pub check_limiter: RateLimiter,
    /// Per-IP limiter for `/report`.
    pub report_limiter: RateLimiter,
    /// Whether check responses include the raw numeric score.
    /// Off in production.
    pub expose_score: bool,
}
