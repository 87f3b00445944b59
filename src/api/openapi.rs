//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Print Station Server",
        version = "0.3.0",
        description = "API server for document uploads and remote print station management"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        // Auth endpoints
        api::auth::register,
        api::auth::login,
        api::auth::profile,
        api::auth::verify,
        api::auth::refresh,
        // File endpoints
        api::files::upload_file,
        api::files::list_files,
        api::files::get_file,
        api::files::delete_file,
        api::files::download_file,
        // Settings endpoints
        api::settings::get_settings,
        api::settings::update_settings,
        // Station endpoints
        api::stations::register_station,
        api::stations::list_stations,
        api::stations::station_heartbeat,
        api::stations::reconnect_station,
        api::stations::unregister_station,
        api::stations::station_status,
        // Print queue endpoints
        api::print_queue::get_print_queue,
        api::print_queue::add_to_print_queue,
        api::print_queue::get_next_print_job,
        api::print_queue::update_print_job_status,
        api::print_queue::remove_from_print_queue,
        api::print_queue::get_station_print_queue,
        api::print_queue::get_station_print_history,
        api::print_queue::bulk_queue_operation,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            api::health::HealthResponse,
            models::MessageResponse,
            models::PaginationInfo,
            // Auth
            models::RegisterRequest,
            models::LoginRequest,
            models::AuthResponse,
            models::ProfileResponse,
            models::VerifyResponse,
            // Files
            models::FileStatus,
            models::FileResponse,
            models::UploadResponse,
            models::FileQuery,
            models::FileListResponse,
            // Settings
            models::PrintOrientation,
            models::SettingsResponse,
            models::UpdateSettingsRequest,
            models::UpdateSettingsResponse,
            models::PrintSettings,
            // Stations
            models::StationStatus,
            models::StationResponse,
            models::RegisterStationRequest,
            models::RegisterStationResponse,
            models::HeartbeatRequest,
            models::HeartbeatResponse,
            models::ReconnectRequest,
            models::ReconnectResponse,
            models::ListStationsQuery,
            models::StationListResponse,
            models::StationStatusResponse,
            // Print queue
            models::JobStatus,
            models::JobResponse,
            models::EnqueueRequest,
            models::EnqueueResponse,
            models::NextJobQuery,
            models::NextJobResponse,
            models::UpdateJobStatusRequest,
            models::UpdateJobStatusResponse,
            models::QueueQuery,
            models::QueueListResponse,
            models::StationQueueQuery,
            models::JobsByStatus,
            models::StationQueueResponse,
            models::StationHistoryQuery,
            models::StationHistoryStats,
            models::StationHistoryResponse,
            models::BulkOperation,
            models::BulkJobRequest,
            models::BulkJobResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Accounts and bearer tokens"),
        (name = "Files", description = "Document upload and retrieval"),
        (name = "Settings", description = "Per-user print settings"),
        (name = "Stations", description = "Printer station registry and liveness"),
        (name = "Print Queue", description = "Job enqueueing, claiming, and status")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add bearer token security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
