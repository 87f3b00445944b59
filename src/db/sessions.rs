//! Database operations for station sessions.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::station_session::{self, ActiveModel, Entity as StationSession};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Insert a fresh session for a station.
    pub async fn insert_session(
        &self,
        station_id: Uuid,
        session_token: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<station_session::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            station_id: Set(station_id),
            session_token: Set(session_token.to_string()),
            ip_address: Set(ip_address),
            user_agent: Set(user_agent),
            started_at: Set(now),
            last_activity: Set(now),
            is_active: Set(true),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert session: {}", e)))?;

        Ok(result)
    }

    /// Deactivate every session for a station (rotation / deactivation).
    pub async fn deactivate_station_sessions(&self, station_id: Uuid) -> AppResult<u64> {
        let result = StationSession::update_many()
            .col_expr(station_session::Column::IsActive, Expr::value(false))
            .filter(station_session::Column::StationId.eq(station_id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to deactivate sessions: {}", e)))?;

        Ok(result.rows_affected)
    }

    /// Find the active session matching a station and session token.
    ///
    /// This is the heartbeat credential check: a rotated-out token no longer
    /// matches because rotation clears is_active.
    pub async fn find_active_session(
        &self,
        station_id: Uuid,
        session_token: &str,
    ) -> AppResult<Option<station_session::Model>> {
        let result = StationSession::find()
            .filter(station_session::Column::StationId.eq(station_id))
            .filter(station_session::Column::SessionToken.eq(session_token))
            .filter(station_session::Column::IsActive.eq(true))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find session: {}", e)))?;

        Ok(result)
    }

    /// Find a session by token regardless of active flag (reconnect cleanup).
    pub async fn find_session(
        &self,
        station_id: Uuid,
        session_token: &str,
    ) -> AppResult<Option<station_session::Model>> {
        let result = StationSession::find()
            .filter(station_session::Column::StationId.eq(station_id))
            .filter(station_session::Column::SessionToken.eq(session_token))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find session: {}", e)))?;

        Ok(result)
    }

    /// Mark a single session inactive.
    pub async fn deactivate_session(&self, session: station_session::Model) -> AppResult<()> {
        let mut active: ActiveModel = session.into();
        active.is_active = Set(false);

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to deactivate session: {}", e)))?;

        Ok(())
    }

    /// Bump a session's last_activity to now.
    pub async fn touch_session(&self, session: station_session::Model) -> AppResult<()> {
        let mut active: ActiveModel = session.into();
        active.last_activity = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to touch session: {}", e)))?;

        Ok(())
    }
}
