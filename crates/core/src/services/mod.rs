//! Business logic services.

pub mod check;
pub mod report;
