//! Per-user settings entity (one-to-one with users).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub max_file_size_mb: i32,
    pub auto_process_files: bool,
    pub auto_print_enabled: bool,
    pub print_orientation: String,
    pub print_copies: i32,
    pub default_station_id: Option<Uuid>,
    /// Observability only: last time a consumer polled for work.
    pub last_print_check: Option<DateTimeUtc>,
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
    #[sea_orm(
        belongs_to = "super::printer_station::Entity",
        from = "Column::DefaultStationId",
        to = "super::printer_station::Column::Id",
        on_delete = "SetNull"
    )]
    DefaultStation,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
