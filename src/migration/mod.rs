//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260714_000001_create_users;
mod m20260714_000002_create_uploaded_files;
mod m20260714_000003_create_printer_stations;
mod m20260714_000004_create_station_sessions;
mod m20260714_000005_create_print_queue;
mod m20260714_000006_create_user_settings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260714_000001_create_users::Migration),
            Box::new(m20260714_000002_create_uploaded_files::Migration),
            Box::new(m20260714_000003_create_printer_stations::Migration),
            Box::new(m20260714_000004_create_station_sessions::Migration),
            Box::new(m20260714_000005_create_print_queue::Migration),
            Box::new(m20260714_000006_create_user_settings::Migration),
        ]
    }
}
