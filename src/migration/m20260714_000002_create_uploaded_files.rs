//! Migration: Create uploaded_files table.

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
                CREATE TABLE uploaded_files (
                    id UUID PRIMARY KEY,
                    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,

                    -- Stored name on disk (timestamp-prefixed) and the client's name
                    filename VARCHAR(255) NOT NULL,
                    original_filename VARCHAR(255) NOT NULL,

                    file_size BIGINT NOT NULL,
                    file_hash VARCHAR(64) NOT NULL, -- SHA-256 hex
                    mime_type VARCHAR(100) NOT NULL,

                    status VARCHAR(20) NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'processing', 'completed', 'failed')),

                    uploaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    processed_at TIMESTAMPTZ,
                    error_message TEXT
                );

                -- Listing is always per-owner, newest first
                CREATE INDEX idx_uploaded_files_user_uploaded
                    ON uploaded_files(user_id, uploaded_at DESC);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS uploaded_files CASCADE;")
            .await?;

        Ok(())
    }
}
