//! Database entities.

pub mod report;
pub mod report_stats;

pub use report::Entity as Report;
pub use report_stats::Entity as ReportStats;
