//! Print job models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::settings::PrintSettings;
use super::station::StationResponse;

/// Print job lifecycle status.
///
/// `pending → printing → {completed, failed}`, with `cancelled` reachable
/// before completion. Terminal states are only left via the bulk requeue
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Printing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Printing => "printing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "printing" => Some(Self::Printing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Terminal states are never left except via bulk requeue.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved routing target for a new job.
///
/// Makes the explicit-station → default-station → local fallback chain a
/// tagged value instead of a silently propagated NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobRoute {
    /// Addressed to a specific registered station.
    Station(Uuid),
    /// Printed directly by the browser/client.
    Local,
}

impl JobRoute {
    /// The station id to store on the job row, if any.
    pub fn station_id(&self) -> Option<Uuid> {
        match self {
            Self::Station(id) => Some(*id),
            Self::Local => None,
        }
    }
}

/// Request to enqueue a file for printing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EnqueueRequest {
    /// Target station; falls back to the caller's default station, then local.
    #[serde(default)]
    pub station_id: Option<Uuid>,
}

/// Job details as returned to clients, with display names joined in.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobResponse {
    pub id: Uuid,
    pub file_id: Uuid,
    pub filename: Option<String>,
    pub station_id: Option<Uuid>,
    pub station_name: Option<String>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub printed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// Response after enqueueing a job.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnqueueResponse {
    pub message: String,
    pub print_job: JobResponse,
}

/// Generic message-only response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Query parameters for claiming the next job.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NextJobQuery {
    /// When set, the caller is a station draining its own and local jobs.
    #[serde(default)]
    pub station_id: Option<Uuid>,
}

/// Response with a claimed job and the settings needed to print it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NextJobResponse {
    pub print_job: JobResponse,
    pub settings: PrintSettings,
}

/// Request to update a job's status.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateJobStatusRequest {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response after a status update.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateJobStatusResponse {
    pub message: String,
    pub print_job: JobResponse,
}

/// Query parameters for the caller's queue listing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct QueueQuery {
    #[serde(default)]
    pub status: Option<JobStatus>,
}

/// Queue listing response (most recent jobs first).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QueueListResponse {
    pub print_jobs: Vec<JobResponse>,
}

/// Query parameters for a station-scoped queue listing.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StationQueueQuery {
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    50
}

impl StationQueueQuery {
    /// Clamp limit to the maximum page size.
    pub fn clamped_limit(&self) -> u64 {
        self.limit.clamp(1, 100)
    }
}

/// Jobs grouped by status for the station queue view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobsByStatus {
    pub pending: Vec<JobResponse>,
    pub printing: Vec<JobResponse>,
    pub completed: Vec<JobResponse>,
    pub failed: Vec<JobResponse>,
}

/// Pagination metadata for offset/limit listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationInfo {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Station queue response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StationQueueResponse {
    pub station: StationResponse,
    pub print_jobs: Vec<JobResponse>,
    pub jobs_by_status: JobsByStatus,
    pub pagination: PaginationInfo,
}

/// Query parameters for station print history.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StationHistoryQuery {
    #[serde(default)]
    pub from_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to_date: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl StationHistoryQuery {
    pub fn clamped_limit(&self) -> u64 {
        self.limit.clamp(1, 100)
    }
}

/// Aggregate history statistics for a station.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StationHistoryStats {
    pub total_printed: u64,
    pub total_failed: u64,
    pub last_24h: u64,
}

/// Station history response (completed/failed jobs, newest first).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StationHistoryResponse {
    pub station: StationResponse,
    pub history: Vec<JobResponse>,
    pub stats: StationHistoryStats,
    pub pagination: PaginationInfo,
}

/// Bulk queue operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BulkOperation {
    /// Transition all selected jobs to cancelled.
    Cancel,
    /// Reset all selected jobs to pending with the error cleared.
    Requeue,
    /// Hard-delete all selected jobs.
    Delete,
}

impl BulkOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Requeue => "requeue",
            Self::Delete => "delete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cancel" => Some(Self::Cancel),
            "requeue" => Some(Self::Requeue),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Request for a bulk queue operation (admin only).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BulkJobRequest {
    pub job_ids: Vec<Uuid>,
    pub operation: String,
}

/// Bulk operation outcome; per-item results are not reported.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkJobResponse {
    pub message: String,
    pub affected_jobs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Printing,
            JobStatus::Completed,
            JobStatus::Failed,
            JobStatus::Cancelled,
        ] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("queued"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Printing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_route_station_id() {
        let id = Uuid::new_v4();
        assert_eq!(JobRoute::Station(id).station_id(), Some(id));
        assert_eq!(JobRoute::Local.station_id(), None);
    }

    #[test]
    fn test_bulk_operation_parse() {
        assert_eq!(BulkOperation::parse("cancel"), Some(BulkOperation::Cancel));
        assert_eq!(
            BulkOperation::parse("requeue"),
            Some(BulkOperation::Requeue)
        );
        assert_eq!(BulkOperation::parse("delete"), Some(BulkOperation::Delete));
        assert_eq!(BulkOperation::parse("purge"), None);
    }
}
