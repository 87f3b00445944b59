//! Printer station models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::printer_station;

/// Station liveness status.
///
/// Soft-state derived from heartbeat age; informational only and never gates
/// job eligibility (`is_active` does that).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StationStatus {
    Online,
    Offline,
    Busy,
}

impl StationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Busy => "busy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(Self::Online),
            "offline" => Some(Self::Offline),
            "busy" => Some(Self::Busy),
            _ => None,
        }
    }
}

impl std::fmt::Display for StationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Station details as returned to clients.
///
/// The station_token is deliberately absent: it is only revealed at
/// registration time.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StationResponse {
    pub id: Uuid,
    pub station_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_location: Option<String>,
    pub status: StationStatus,
    pub capabilities: JsonValue,
    pub is_active: bool,
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<printer_station::Model> for StationResponse {
    fn from(m: printer_station::Model) -> Self {
        StationResponse {
            id: m.id,
            station_name: m.station_name,
            station_location: m.station_location,
            status: StationStatus::parse(&m.status).unwrap_or(StationStatus::Offline),
            capabilities: m.capabilities,
            is_active: m.is_active,
            last_heartbeat: m.last_heartbeat,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Request to register (or reactivate) a station.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterStationRequest {
    pub station_name: String,
    #[serde(default)]
    pub station_location: Option<String>,
    #[serde(default)]
    pub capabilities: Option<JsonValue>,
}

/// Response after registering a station.
///
/// `station_token` is the long-lived device identity; `session_token` is the
/// short-lived credential rotated on every registration/reconnect.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisterStationResponse {
    pub message: String,
    pub station: StationResponse,
    pub session_token: String,
    pub station_token: String,
}

/// Heartbeat request from a station.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct HeartbeatRequest {
    pub session_token: String,
    /// Reported liveness; defaults to online.
    #[serde(default)]
    pub status: Option<StationStatus>,
}

/// Heartbeat acknowledgement.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HeartbeatResponse {
    pub message: String,
    pub station: StationResponse,
}

/// Reconnect request; the old session token may be stale or missing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReconnectRequest {
    #[serde(default)]
    pub session_token: Option<String>,
}

/// Reconnect response with the rotated session credential.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReconnectResponse {
    pub message: String,
    pub session_token: String,
    pub station: StationResponse,
}

/// Query parameters for listing stations.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListStationsQuery {
    #[serde(default)]
    pub status: Option<StationStatus>,
}

/// Station list response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StationListResponse {
    pub stations: Vec<StationResponse>,
}

/// Single-station status view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StationStatusResponse {
    pub station: StationResponse,
    pub pending_jobs: u64,
    pub is_online: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            StationStatus::Online,
            StationStatus::Offline,
            StationStatus::Busy,
        ] {
            assert_eq!(StationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(StationStatus::parse("away"), None);
    }

    #[test]
    fn test_station_token_not_serialized() {
        // The response type simply has no token field; this guards against
        // someone adding it back.
        let json = serde_json::to_value(StationResponse {
            id: Uuid::new_v4(),
            station_name: "front-desk".to_string(),
            station_location: None,
            status: StationStatus::Online,
            capabilities: serde_json::json!({}),
            is_active: true,
            last_heartbeat: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .unwrap();

        assert!(json.get("station_token").is_none());
        assert!(json.get("session_token").is_none());
    }
}
