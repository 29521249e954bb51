//! Database repositories.

pub mod report;
pub mod report_stats;

pub use report::ReportRepository;
pub use report_stats::ReportStatsRepository;
