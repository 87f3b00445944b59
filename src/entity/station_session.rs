//! Station session entity - ephemeral per-connection credential.
//!
//! Rotated on every registration/reconnect; at most one active session per
//! station by application convention.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "station_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub station_id: Uuid,
    pub session_token: String,
    pub ip_address: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,
    pub started_at: DateTimeUtc,
    pub last_activity: DateTimeUtc,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::printer_station::Entity",
        from = "Column::StationId",
        to = "super::printer_station::Column::Id",
        on_delete = "Cascade"
    )]
    PrinterStation,
}

impl Related<super::printer_station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrinterStation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
