//! Migration: Create print_queue table.
//!
//! The partial unique index enforces at most one pending job per
//! (user, file, station) triple, with NULL station (local jobs) folded to a
//! sentinel so local duplicates collide too.

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
                CREATE TABLE print_queue (
                    id UUID PRIMARY KEY, -- UUIDv7 for time-ordered sorting
                    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    file_id UUID NOT NULL REFERENCES uploaded_files(id) ON DELETE CASCADE,

                    -- NULL means a local job (printed directly by the browser)
                    station_id UUID REFERENCES printer_stations(id),

                    status VARCHAR(20) NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'printing', 'completed', 'failed', 'cancelled')),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    printed_at TIMESTAMPTZ,
                    error_message TEXT
                );

                -- Claim scans: oldest pending job for a user/station pair
                CREATE INDEX idx_print_queue_claim
                    ON print_queue(user_id, status, created_at);

                CREATE INDEX idx_print_queue_station
                    ON print_queue(station_id, status);

                -- At most one pending job per (user, file, station); NULL station
                -- folds to the zero UUID so local duplicates are caught as well
                CREATE UNIQUE INDEX uq_print_queue_pending
                    ON print_queue(
                        user_id,
                        file_id,
                        COALESCE(station_id, '00000000-0000-0000-0000-000000000000'::uuid)
                    )
                    WHERE status = 'pending';
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS print_queue CASCADE;")
            .await?;

        Ok(())
    }
}
