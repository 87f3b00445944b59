//! Domain models and DTOs for the print station server.

pub mod file;
pub mod job;
pub mod settings;
pub mod station;
pub mod user;
pub mod ws_event;

// Re-export commonly used types
pub use file::{FileListResponse, FileQuery, FileResponse, FileStatus, UploadResponse};
pub use job::{
    BulkJobRequest, BulkJobResponse, BulkOperation, EnqueueRequest, EnqueueResponse, JobResponse,
    JobRoute, JobStatus, JobsByStatus, MessageResponse, NextJobQuery, NextJobResponse,
    PaginationInfo, QueueListResponse, QueueQuery, StationHistoryQuery, StationHistoryResponse,
    StationHistoryStats, StationQueueQuery, StationQueueResponse, UpdateJobStatusRequest,
    UpdateJobStatusResponse,
};
pub use settings::{
    PrintOrientation, PrintSettings, SettingsResponse, UpdateSettingsRequest,
    UpdateSettingsResponse,
};
pub use station::{
    HeartbeatRequest, HeartbeatResponse, ListStationsQuery, ReconnectRequest, ReconnectResponse,
    RegisterStationRequest, RegisterStationResponse, StationListResponse, StationResponse,
    StationStatus, StationStatusResponse,
};
pub use user::{
    AuthResponse, AuthenticatedUser, LoginRequest, ProfileResponse, RegisterRequest,
    VerifyResponse,
};
pub use ws_event::{QueueStatsPayload, WsEvent, WsEventMessage};
