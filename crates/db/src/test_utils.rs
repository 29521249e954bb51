//! Test utilities for database operations.
//!
//! Fixture builders shared by repository, service and API tests.

use crate::entities::report;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Build a report row with the given phone key and creation time.
///
/// Remaining fields get plausible defaults; override what a test cares about.
#[must_use]
pub fn report_fixture(phone_key: &str, created_at: DateTimeWithTimeZone) -> report::Model {
    report::Model {
        id: format!("fixture{:020}", created_at.timestamp_millis()),
        phone_key: phone_key.to_string(),
        reason: "Refused to open package".to_string(),
        custom_reason: None,
        reporter_ip: Some("203.0.113.10".to_string()),
        reporter_user_agent: Some("test-agent".to_string()),
        reporter_country: Some("DZ".to_string()),
        reporter_city: None,
        reporter_timezone: None,
        created_at,
    }
}

/// Like [`report_fixture`] with an explicit reason category.
#[must_use]
pub fn report_fixture_with_reason(
    phone_key: &str,
    created_at: DateTimeWithTimeZone,
    reason: &str,
    custom_reason: Option<&str>,
) -> report::Model {
    report::Model {
        reason: reason.to_string(),
        custom_reason: custom_reason.map(ToString::to_string),
        ..report_fixture(phone_key, created_at)
    }
}
