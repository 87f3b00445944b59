//! WebSocket event types for real-time updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// WebSocket event sent to connected clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum WsEvent {
    /// Periodic global queue statistics.
    QueueStats(QueueStatsPayload),
    /// A job entered the queue.
    JobCreated(JobEventPayload),
    /// A job changed status.
    JobUpdated(JobEventPayload),
    /// A job was removed from the queue.
    JobDeleted(JobEventPayload),
    /// A station registered, changed status, or was deactivated.
    StationUpdated(StationEventPayload),
}

/// Payload for the periodic queue_stats event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStatsPayload {
    pub pending_jobs: u64,
    pub printing_jobs: u64,
    pub active_stations: u64,
    pub online_stations: u64,
}

/// Payload for job lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEventPayload {
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub status: String,
}

/// Payload for station lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationEventPayload {
    pub user_id: Uuid,
    pub station_id: Uuid,
    pub status: String,
}

impl WsEvent {
    /// Owner of the event, used to scope delivery; None means broadcast to all.
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::QueueStats(_) => None,
            Self::JobCreated(p) | Self::JobUpdated(p) | Self::JobDeleted(p) => Some(p.user_id),
            Self::StationUpdated(p) => Some(p.user_id),
        }
    }

    pub fn queue_stats(
        pending_jobs: u64,
        printing_jobs: u64,
        active_stations: u64,
        online_stations: u64,
    ) -> Self {
        WsEvent::QueueStats(QueueStatsPayload {
            pending_jobs,
            printing_jobs,
            active_stations,
            online_stations,
        })
    }

    pub fn job_created(user_id: Uuid, job_id: Uuid, status: &str) -> Self {
        WsEvent::JobCreated(JobEventPayload {
            user_id,
            job_id,
            status: status.to_string(),
        })
    }

    pub fn job_updated(user_id: Uuid, job_id: Uuid, status: &str) -> Self {
        WsEvent::JobUpdated(JobEventPayload {
            user_id,
            job_id,
            status: status.to_string(),
        })
    }

    pub fn job_deleted(user_id: Uuid, job_id: Uuid) -> Self {
        WsEvent::JobDeleted(JobEventPayload {
            user_id,
            job_id,
            status: "deleted".to_string(),
        })
    }

    pub fn station_updated(user_id: Uuid, station_id: Uuid, status: &str) -> Self {
        WsEvent::StationUpdated(StationEventPayload {
            user_id,
            station_id,
            status: status.to_string(),
        })
    }
}

/// Wrapper that includes timestamp with every event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsEventMessage {
    #[serde(flatten)]
    pub event: WsEvent,
    pub timestamp: DateTime<Utc>,
}

impl WsEventMessage {
    /// Create a new event message with the current timestamp.
    pub fn new(event: WsEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_scoping() {
        assert_eq!(WsEvent::queue_stats(0, 0, 0, 0).user_id(), None);

        let user = Uuid::new_v4();
        let job = Uuid::new_v4();
        assert_eq!(WsEvent::job_created(user, job, "pending").user_id(), Some(user));
        assert_eq!(
            WsEvent::station_updated(user, Uuid::new_v4(), "online").user_id(),
            Some(user)
        );
    }

    #[test]
    fn test_event_serialization_shape() {
        let msg = WsEventMessage::new(WsEvent::queue_stats(3, 1, 2, 1));
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "queue_stats");
        assert_eq!(json["payload"]["pending_jobs"], 3);
        assert!(json["timestamp"].is_string());
    }
}
