//! Printer station entity - a registered remote print agent.
//!
//! Stations are soft-deleted via `is_active` so job history keeps valid
//! references. `(user_id, station_name)` is unique.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "printer_stations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub station_name: String,
    pub station_location: Option<String>,
    /// Long-lived device identity credential, stable across reconnects.
    pub station_token: String,
    /// Liveness soft-state: online, offline, busy.
    pub status: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub capabilities: JsonValue,
    /// Soft-delete flag; inactive stations are never eligible for new jobs.
    pub is_active: bool,
    pub last_heartbeat: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::station_session::Entity")]
    StationSessions,
    #[sea_orm(has_many = "super::print_job::Entity")]
    PrintJobs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::station_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StationSessions.def()
    }
}

impl Related<super::print_job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrintJobs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
