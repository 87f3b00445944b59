//! Database operations for printer stations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::entity::printer_station::{self, ActiveModel, Entity as PrinterStation};
use crate::error::{AppError, AppResult};
use crate::models::StationStatus;

use super::DbPool;

impl DbPool {
    /// Find a station by owner and name, regardless of active flag.
    ///
    /// Used by registration to reactivate soft-deleted stations in place.
    pub async fn find_station_by_name(
        &self,
        user_id: Uuid,
        station_name: &str,
    ) -> AppResult<Option<printer_station::Model>> {
        let result = PrinterStation::find()
            .filter(printer_station::Column::UserId.eq(user_id))
            .filter(printer_station::Column::StationName.eq(station_name))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find station: {}", e)))?;

        Ok(result)
    }

    /// Find a station by owner and id, regardless of active flag.
    pub async fn find_station(
        &self,
        user_id: Uuid,
        station_id: Uuid,
    ) -> AppResult<Option<printer_station::Model>> {
        let result = PrinterStation::find_by_id(station_id)
            .filter(printer_station::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find station: {}", e)))?;

        Ok(result)
    }

    /// Find an active station by owner and id.
    pub async fn find_active_station(
        &self,
        user_id: Uuid,
        station_id: Uuid,
    ) -> AppResult<Option<printer_station::Model>> {
        let result = PrinterStation::find_by_id(station_id)
            .filter(printer_station::Column::UserId.eq(user_id))
            .filter(printer_station::Column::IsActive.eq(true))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find station: {}", e)))?;

        Ok(result)
    }

    /// Insert a freshly registered station, online with a current heartbeat.
    pub async fn insert_station(
        &self,
        user_id: Uuid,
        station_name: &str,
        station_location: Option<String>,
        station_token: &str,
        capabilities: JsonValue,
    ) -> AppResult<printer_station::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            station_name: Set(station_name.to_string()),
            station_location: Set(station_location),
            station_token: Set(station_token.to_string()),
            status: Set(StationStatus::Online.as_str().to_string()),
            capabilities: Set(capabilities),
            is_active: Set(true),
            last_heartbeat: Set(Some(now)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert station: {}", e)))?;

        Ok(result)
    }

    /// Persist changes staged on a station ActiveModel.
    pub async fn update_station(&self, active: ActiveModel) -> AppResult<printer_station::Model> {
        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update station: {}", e)))?;

        Ok(result)
    }

    /// List the user's active stations ordered by name, optionally filtered by
    /// status. Liveness is NOT recomputed here; callers go through the station
    /// registry service which applies the staleness flip first.
    pub async fn list_active_stations(
        &self,
        user_id: Uuid,
        status: Option<StationStatus>,
    ) -> AppResult<Vec<printer_station::Model>> {
        let mut select = PrinterStation::find()
            .filter(printer_station::Column::UserId.eq(user_id))
            .filter(printer_station::Column::IsActive.eq(true));

        if let Some(status) = status {
            select = select.filter(printer_station::Column::Status.eq(status.as_str()));
        }

        let stations = select
            .order_by_asc(printer_station::Column::StationName)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list stations: {}", e)))?;

        Ok(stations)
    }

    /// Global station counts (active, online) for the stats broadcaster.
    pub async fn station_counts(&self) -> AppResult<(u64, u64)> {
        let active = PrinterStation::find()
            .filter(printer_station::Column::IsActive.eq(true))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count stations: {}", e)))?;

        let online = PrinterStation::find()
            .filter(printer_station::Column::IsActive.eq(true))
            .filter(printer_station::Column::Status.eq(StationStatus::Online.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count stations: {}", e)))?;

        Ok((active, online))
    }
}
