//! Aggregate report statistics (single global counter row).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed identifier of the one global stats row.
pub const GLOBAL_STATS_ID: &str = "00000000-0000-0000-0000-000000000001";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Total reports ever accepted.
    pub total_reports: i64,

    pub last_updated: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
