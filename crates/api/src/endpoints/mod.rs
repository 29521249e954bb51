//! API endpoints.

use axum::Router;

use crate::state::AppState;

pub mod check;
pub mod report;

/// Build the public API router.
#[must_use]
pub fn router() -> Router<AppState> {
    Router::new().merge(check::router()).merge(report::router())
}
