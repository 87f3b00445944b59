//! Migration: Create user_settings table.

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
                CREATE TABLE user_settings (
                    id UUID PRIMARY KEY,
                    user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,

                    max_file_size_mb INTEGER NOT NULL DEFAULT 10
                        CHECK (max_file_size_mb BETWEEN 1 AND 100),
                    auto_process_files BOOLEAN NOT NULL DEFAULT TRUE,

                    auto_print_enabled BOOLEAN NOT NULL DEFAULT FALSE,
                    print_orientation VARCHAR(20) NOT NULL DEFAULT 'portrait'
                        CHECK (print_orientation IN ('portrait', 'landscape')),
                    print_copies INTEGER NOT NULL DEFAULT 1
                        CHECK (print_copies BETWEEN 1 AND 10),

                    default_station_id UUID REFERENCES printer_stations(id) ON DELETE SET NULL,

                    -- Observability: last time a consumer polled for work
                    last_print_check TIMESTAMPTZ,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE TRIGGER update_user_settings_updated_at
                    BEFORE UPDATE ON user_settings
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
                DROP TRIGGER IF EXISTS update_user_settings_updated_at ON user_settings;
                DROP TABLE IF EXISTS user_settings CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
