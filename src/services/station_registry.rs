//! Station registry: registration, credential rotation, liveness.
//!
//! Liveness is soft-state derived from heartbeat age at read time. There is no
//! background sweeper; `list`/`status` flip stale stations to offline and
//! persist the flip as a cache refresh.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entity::printer_station::{self, ActiveModel};
use crate::error::{AppError, AppResult};
use crate::models::{
    AuthenticatedUser, HeartbeatRequest, ReconnectRequest, RegisterStationRequest, StationStatus,
};
use crate::services::tokens;

/// A station whose heartbeat is older than this is reported offline.
pub const HEARTBEAT_STALE_SECS: i64 = 60;

/// True when the heartbeat is old enough for the station to count as offline.
///
/// A station that never heartbeated is left as-is; registration always stamps
/// an initial heartbeat, so this only covers legacy rows.
pub fn is_stale(last_heartbeat: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_heartbeat {
        Some(hb) => (now - hb).num_seconds() > HEARTBEAT_STALE_SECS,
        None => false,
    }
}

/// Result of a station registration.
pub struct RegistrationOutcome {
    pub station: printer_station::Model,
    pub session_token: String,
    pub station_token: String,
    /// True when an existing (user, name) station was reactivated in place.
    pub reactivated: bool,
}

/// Register a new station, or reactivate the existing one with this name.
///
/// Reactivation overwrites location/capabilities, marks the station online
/// with a fresh heartbeat, and rotates the session: all prior sessions are
/// deactivated and exactly one new one is created. The station_token is
/// stable across the station's lifetime.
pub async fn register(
    pool: &DbPool,
    user: &AuthenticatedUser,
    req: RegisterStationRequest,
    ip_address: Option<String>,
    user_agent: Option<String>,
) -> AppResult<RegistrationOutcome> {
    if req.station_name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Station name is required".to_string(),
        ));
    }

    let capabilities = req.capabilities.unwrap_or_else(|| serde_json::json!({}));

    if let Some(existing) = pool.find_station_by_name(user.id, &req.station_name).await? {
        let station_id = existing.id;

        let mut active: ActiveModel = existing.into();
        active.is_active = Set(true);
        active.station_location = Set(req.station_location);
        active.capabilities = Set(capabilities);
        active.status = Set(StationStatus::Online.as_str().to_string());
        active.last_heartbeat = Set(Some(Utc::now()));
        active.updated_at = Set(Utc::now());
        let station = pool.update_station(active).await?;

        // Rotate: every prior session token stops working now
        pool.deactivate_station_sessions(station_id).await?;
        let session_token = tokens::generate_session_token();
        pool.insert_session(station_id, &session_token, ip_address, user_agent)
            .await?;

        info!(
            user = %user.username,
            station_id = %station_id,
            station_name = %station.station_name,
            "Station reactivated"
        );

        let station_token = station.station_token.clone();
        return Ok(RegistrationOutcome {
            station,
            session_token,
            station_token,
            reactivated: true,
        });
    }

    let station_token = tokens::generate_station_token();
    let station = pool
        .insert_station(
            user.id,
            &req.station_name,
            req.station_location,
            &station_token,
            capabilities,
        )
        .await?;

    let session_token = tokens::generate_session_token();
    pool.insert_session(station.id, &session_token, ip_address, user_agent)
        .await?;

    info!(
        user = %user.username,
        station_id = %station.id,
        station_name = %station.station_name,
        "Station registered"
    );

    Ok(RegistrationOutcome {
        station,
        session_token,
        station_token,
        reactivated: false,
    })
}

/// Process a heartbeat: verify the active session, refresh liveness.
///
/// Fails with 401 unless an active session matches both the token and the
/// station. A rotated-out token therefore stops working on its next beat.
pub async fn heartbeat(
    pool: &DbPool,
    user: &AuthenticatedUser,
    station_id: Uuid,
    req: &HeartbeatRequest,
) -> AppResult<printer_station::Model> {
    let session = pool
        .find_active_session(station_id, &req.session_token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid session".to_string()))?;

    let station = pool
        .find_station(user.id, station_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Station".to_string()))?;

    let reported = req.status.unwrap_or(StationStatus::Online);

    let mut active: ActiveModel = station.into();
    active.last_heartbeat = Set(Some(Utc::now()));
    active.status = Set(reported.as_str().to_string());
    let station = pool.update_station(active).await?;

    pool.touch_session(session).await?;

    Ok(station)
}

/// Rotate the session for a reconnecting station.
///
/// Idempotent with respect to the old token: stale or missing tokens are
/// ignored, a fresh session is always created, and the station comes back
/// online with a refreshed heartbeat.
pub async fn reconnect(
    pool: &DbPool,
    user: &AuthenticatedUser,
    station_id: Uuid,
    req: &ReconnectRequest,
) -> AppResult<(String, printer_station::Model)> {
    let station = pool
        .find_station(user.id, station_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Station".to_string()))?;

    if let Some(ref old_token) = req.session_token
        && let Some(old_session) = pool.find_session(station_id, old_token).await?
    {
        pool.deactivate_session(old_session).await?;
    }

    let session_token = tokens::generate_session_token();
    pool.insert_session(station_id, &session_token, None, None)
        .await?;

    let mut active: ActiveModel = station.into();
    active.status = Set(StationStatus::Online.as_str().to_string());
    active.last_heartbeat = Set(Some(Utc::now()));
    let station = pool.update_station(active).await?;

    info!(
        user = %user.username,
        station_id = %station_id,
        "Station reconnected"
    );

    Ok((session_token, station))
}

/// Soft-delete a station: deactivate it and invalidate all its sessions.
///
/// Pending jobs addressed to the station are left untouched; the admin bulk
/// operations are the path for resolving them.
pub async fn deactivate(
    pool: &DbPool,
    user: &AuthenticatedUser,
    station_id: Uuid,
) -> AppResult<printer_station::Model> {
    let station = pool
        .find_station(user.id, station_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Station".to_string()))?;

    let mut active: ActiveModel = station.into();
    active.is_active = Set(false);
    active.status = Set(StationStatus::Offline.as_str().to_string());
    let station = pool.update_station(active).await?;

    pool.deactivate_station_sessions(station_id).await?;

    info!(
        user = %user.username,
        station_id = %station_id,
        "Station deactivated"
    );

    Ok(station)
}

/// List the user's active stations, refreshing stale liveness first.
///
/// Any station whose heartbeat is older than [`HEARTBEAT_STALE_SECS`] is
/// flipped to offline and the flip persisted before the list is returned.
pub async fn list(
    pool: &DbPool,
    user: &AuthenticatedUser,
    status_filter: Option<StationStatus>,
) -> AppResult<Vec<printer_station::Model>> {
    let stations = pool.list_active_stations(user.id, status_filter).await?;
    let now = Utc::now();

    let mut refreshed = Vec::with_capacity(stations.len());
    for station in stations {
        refreshed.push(refresh_liveness(pool, station, now).await?);
    }

    Ok(refreshed)
}

/// Single-station view with pending job count, stale liveness refreshed.
pub async fn station_status(
    pool: &DbPool,
    user: &AuthenticatedUser,
    station_id: Uuid,
) -> AppResult<(printer_station::Model, u64, bool)> {
    let station = pool
        .find_station(user.id, station_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Station".to_string()))?;

    let station = refresh_liveness(pool, station, Utc::now()).await?;
    let pending_jobs = pool.count_pending_jobs_for_station(station_id).await?;
    let is_online = station.status == StationStatus::Online.as_str();

    Ok((station, pending_jobs, is_online))
}

/// Persist the offline flip for a stale station; pass fresh ones through.
async fn refresh_liveness(
    pool: &DbPool,
    station: printer_station::Model,
    now: DateTime<Utc>,
) -> AppResult<printer_station::Model> {
    if station.status != StationStatus::Offline.as_str() && is_stale(station.last_heartbeat, now) {
        let mut active: ActiveModel = station.into();
        active.status = Set(StationStatus::Offline.as_str().to_string());
        return pool.update_station(active).await;
    }
    Ok(station)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_is_stale_threshold() {
        let now = Utc::now();

        assert!(!is_stale(Some(now), now));
        assert!(!is_stale(Some(now - Duration::seconds(59)), now));
        // Exactly at the threshold still counts as alive (strict >)
        assert!(!is_stale(Some(now - Duration::seconds(60)), now));
        assert!(is_stale(Some(now - Duration::seconds(61)), now));
        assert!(is_stale(Some(now - Duration::hours(2)), now));
    }

    #[test]
    fn test_never_heartbeated_is_not_flipped() {
        assert!(!is_stale(None, Utc::now()));
    }
}
