//! Report entity (one claim that a phone number was involved in a
//! problematic return).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Salted hash of the normalized phone number. Lookup and grouping key.
    pub phone_key: String,

    /// Reason category, exact string from the bilingual allow-list.
    pub reason: String,

    /// Free-text reason, only present when the category is "Other".
    #[sea_orm(nullable)]
    pub custom_reason: Option<String>,

    /// Reporter origin IP, when known and public.
    #[sea_orm(nullable)]
    pub reporter_ip: Option<String>,

    #[sea_orm(nullable)]
    pub reporter_user_agent: Option<String>,

    /// Coarse geolocation of the reporter, best-effort.
    #[sea_orm(nullable)]
    pub reporter_country: Option<String>,

    #[sea_orm(nullable)]
    pub reporter_city: Option<String>,

    #[sea_orm(nullable)]
    pub reporter_timezone: Option<String>,

    /// Submission time. Immutable; drives all time-based scoring.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
