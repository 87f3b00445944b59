//! Database operations for user settings.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::user_settings::{self, ActiveModel, Entity as UserSettings};
use crate::error::{AppError, AppResult};
use crate::models::UpdateSettingsRequest;

use super::DbPool;

impl DbPool {
    /// Get the user's settings row, creating it with defaults if absent.
    pub async fn get_or_create_settings(&self, user_id: Uuid) -> AppResult<user_settings::Model> {
        let existing = UserSettings::find()
            .filter(user_settings::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load settings: {}", e)))?;

        if let Some(m) = existing {
            return Ok(m);
        }

        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            max_file_size_mb: Set(10),
            auto_process_files: Set(true),
            auto_print_enabled: Set(false),
            print_orientation: Set("portrait".to_string()),
            print_copies: Set(1),
            default_station_id: Set(None),
            last_print_check: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to create settings: {}", e)))?;

        Ok(result)
    }

    /// Apply a validated partial update to a settings row.
    pub async fn apply_settings_update(
        &self,
        current: user_settings::Model,
        req: &UpdateSettingsRequest,
    ) -> AppResult<user_settings::Model> {
        let mut active: ActiveModel = current.into();

        if let Some(size) = req.max_file_size_mb {
            active.max_file_size_mb = Set(size);
        }
        if let Some(auto_process) = req.auto_process_files {
            active.auto_process_files = Set(auto_process);
        }
        if let Some(auto_print) = req.auto_print_enabled {
            active.auto_print_enabled = Set(auto_print);
        }
        if let Some(ref orientation) = req.print_orientation {
            active.print_orientation = Set(orientation.clone());
        }
        if let Some(copies) = req.print_copies {
            active.print_copies = Set(copies);
        }
        if let Some(station) = req.default_station_id {
            active.default_station_id = Set(station);
        }
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update settings: {}", e)))?;

        Ok(result)
    }

    /// Stamp the last time a consumer polled for work. Observability only.
    pub async fn touch_last_print_check(&self, settings: user_settings::Model) -> AppResult<()> {
        let mut active: ActiveModel = settings.into();
        active.last_print_check = Set(Some(Utc::now()));

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to stamp print check: {}", e)))?;

        Ok(())
    }
}
