//! Core business logic for dzretour.
//!
//! Risk scoring, reason validation, reporter geolocation, and the two
//! services behind the `report` and `check` endpoints.

pub mod geo;
pub mod reasons;
pub mod risk;
pub mod services;

pub use geo::{GeoLocation, GeoLocator};
pub use risk::{ReportPatterns, RiskAssessment, RiskLevel};
pub use services::check::{CheckOutcome, CheckService};
pub use services::report::{NewReport, ReportService, SubmittedReport};
