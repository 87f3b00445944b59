//! Migration: Create station_sessions table.

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
                CREATE TABLE station_sessions (
                    id UUID PRIMARY KEY,
                    station_id UUID NOT NULL REFERENCES printer_stations(id) ON DELETE CASCADE,

                    session_token VARCHAR(255) NOT NULL UNIQUE,

                    ip_address VARCHAR(45),
                    user_agent TEXT,

                    started_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    last_activity TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    is_active BOOLEAN NOT NULL DEFAULT TRUE
                );

                -- Heartbeat verification looks up by (token, station, active)
                CREATE INDEX idx_station_sessions_station_active
                    ON station_sessions(station_id) WHERE is_active;
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS station_sessions CASCADE;")
            .await?;

        Ok(())
    }
}
