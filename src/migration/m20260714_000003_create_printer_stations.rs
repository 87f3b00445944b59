//! Migration: Create printer_stations table.
//!
//! Stations are soft-deleted (is_active=false) so print history keeps valid
//! references to the station that ran it.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE printer_stations (
                    id UUID PRIMARY KEY,
                    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,

                    station_name VARCHAR(100) NOT NULL,
                    station_location VARCHAR(255),

                    -- Long-lived device identity, stable across reconnects
                    station_token VARCHAR(255) NOT NULL UNIQUE,

                    status VARCHAR(20) NOT NULL DEFAULT 'offline'
                        CHECK (status IN ('online', 'offline', 'busy')),

                    capabilities JSONB NOT NULL DEFAULT '{}'::jsonb,

                    is_active BOOLEAN NOT NULL DEFAULT TRUE,
                    last_heartbeat TIMESTAMPTZ,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                    -- One station name per owner; re-registration reactivates in place
                    UNIQUE (user_id, station_name)
                );

                CREATE INDEX idx_printer_stations_user_active
                    ON printer_stations(user_id) WHERE is_active;

                CREATE TRIGGER update_printer_stations_updated_at
                    BEFORE UPDATE ON printer_stations
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_printer_stations_updated_at ON printer_stations;
                DROP TABLE IF EXISTS printer_stations CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
