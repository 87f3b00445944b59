//! Print queue API handlers.

use actix_web::{web, HttpResponse};
use tracing::info;
use uuid::Uuid;

use crate::auth::UserAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    BulkJobRequest, BulkJobResponse, EnqueueRequest, EnqueueResponse, JobResponse, JobStatus,
    JobsByStatus, MessageResponse, NextJobQuery, NextJobResponse, PaginationInfo,
    QueueListResponse, QueueQuery, StationHistoryQuery, StationHistoryResponse, StationQueueQuery,
    StationQueueResponse, StationResponse, UpdateJobStatusRequest, UpdateJobStatusResponse,
    WsEvent, WsEventMessage,
};
use crate::services::print_queue::{self, ClaimOutcome};
use crate::services::EventBroadcaster;

/// Most recent jobs returned by the flat queue listing.
const QUEUE_LIST_LIMIT: u64 = 20;

/// List the caller's print jobs, newest first.
#[utoipa::path(
    get,
    path = "/print-queue",
    tag = "Print Queue",
    params(
        ("status" = Option<String>, Query, description = "Filter by job status")
    ),
    responses(
        (status = 200, description = "Job list", body = QueueListResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn get_print_queue(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    query: web::Query<QueueQuery>,
) -> AppResult<HttpResponse> {
    let jobs = pool
        .list_jobs(auth.user.id, query.status, QUEUE_LIST_LIMIT)
        .await?;

    Ok(HttpResponse::Ok().json(QueueListResponse {
        print_jobs: jobs.into_iter().map(JobResponse::from).collect(),
    }))
}

/// Enqueue a file for printing.
///
/// Routing: explicit station (must be active and owned), else the caller's
/// default station, else local. A duplicate pending job for the same
/// (file, station) is rejected with 409.
#[utoipa::path(
    post,
    path = "/print-queue/add/{file_id}",
    tag = "Print Queue",
    params(("file_id" = Uuid, Path, description = "File UUID")),
    request_body = EnqueueRequest,
    responses(
        (status = 201, description = "Job enqueued", body = EnqueueResponse),
        (status = 404, description = "File or station not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate pending job", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn add_to_print_queue(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
    body: Option<web::Json<EnqueueRequest>>,
) -> AppResult<HttpResponse> {
    let station_id = body.map(|b| b.into_inner().station_id).unwrap_or(None);

    let record = print_queue::enqueue(&pool, &auth.user, path.into_inner(), station_id).await?;

    broadcaster.send(WsEventMessage::new(WsEvent::job_created(
        auth.user.id,
        record.id,
        &record.status,
    )));

    Ok(HttpResponse::Created().json(EnqueueResponse {
        message: "File added to print queue".to_string(),
        print_job: JobResponse::from(record),
    }))
}

/// Claim the next eligible job.
///
/// With `station_id`, the station drains its own and local jobs (hybrid
/// mode) and the auto-print preference is bypassed. Without, only local jobs
/// are eligible, and a disabled auto-print preference short-circuits. The
/// claimed job is returned already transitioned to printing.
#[utoipa::path(
    get,
    path = "/print-queue/next",
    tag = "Print Queue",
    params(
        ("station_id" = Option<Uuid>, Query, description = "Claim as this station (hybrid mode)")
    ),
    responses(
        (status = 200, description = "Claimed job, or a message when none is available", body = NextJobResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn get_next_print_job(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    query: web::Query<NextJobQuery>,
) -> AppResult<HttpResponse> {
    match print_queue::claim_next(&pool, &auth.user, query.station_id).await? {
        ClaimOutcome::Disabled => Ok(HttpResponse::Ok().json(MessageResponse {
            message: "Auto-print is disabled".to_string(),
        })),
        ClaimOutcome::Empty => Ok(HttpResponse::Ok().json(MessageResponse {
            message: "No pending print jobs".to_string(),
        })),
        ClaimOutcome::Claimed(record, settings) => {
            broadcaster.send(WsEventMessage::new(WsEvent::job_updated(
                auth.user.id,
                record.id,
                &record.status,
            )));

            Ok(HttpResponse::Ok().json(NextJobResponse {
                print_job: JobResponse::from(record),
                settings,
            }))
        }
    }
}

/// Update a job's status.
#[utoipa::path(
    put,
    path = "/print-queue/{job_id}/status",
    tag = "Print Queue",
    params(("job_id" = Uuid, Path, description = "Job UUID")),
    request_body = UpdateJobStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UpdateJobStatusResponse),
        (status = 400, description = "Invalid status", body = crate::error::ErrorResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Job already finalized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn update_print_job_status(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateJobStatusRequest>,
) -> AppResult<HttpResponse> {
    let record =
        print_queue::update_status(&pool, &auth.user, path.into_inner(), &body).await?;

    broadcaster.send(WsEventMessage::new(WsEvent::job_updated(
        record.user_id,
        record.id,
        &record.status,
    )));

    Ok(HttpResponse::Ok().json(UpdateJobStatusResponse {
        message: "Print job status updated".to_string(),
        print_job: JobResponse::from(record),
    }))
}

/// Remove a job from the queue.
#[utoipa::path(
    delete,
    path = "/print-queue/{job_id}",
    tag = "Print Queue",
    params(("job_id" = Uuid, Path, description = "Job UUID")),
    responses(
        (status = 200, description = "Job removed", body = MessageResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn remove_from_print_queue(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();
    let job = pool
        .find_job(auth.user.id, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Print job".to_string()))?;

    pool.delete_job(job).await?;

    broadcaster.send(WsEventMessage::new(WsEvent::job_deleted(
        auth.user.id,
        job_id,
    )));

    info!(user = %auth.user.username, job_id = %job_id, "Job removed from queue");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Print job removed from queue".to_string(),
    }))
}

/// List jobs addressed to one station, grouped by status.
#[utoipa::path(
    get,
    path = "/print-queue/station/{station_id}",
    tag = "Print Queue",
    params(
        ("station_id" = Uuid, Path, description = "Station UUID"),
        ("status" = Option<String>, Query, description = "Filter by job status"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 50, max 100)"),
        ("offset" = Option<u64>, Query, description = "Pagination offset")
    ),
    responses(
        (status = 200, description = "Station queue", body = StationQueueResponse),
        (status = 404, description = "Station not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn get_station_print_queue(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<StationQueueQuery>,
) -> AppResult<HttpResponse> {
    let station_id = path.into_inner();
    let station = pool
        .find_station(auth.user.id, station_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Station".to_string()))?;

    let limit = query.clamped_limit();
    let (jobs, total) = pool
        .list_station_jobs(auth.user.id, station_id, query.status, limit, query.offset)
        .await?;

    let jobs: Vec<JobResponse> = jobs.into_iter().map(JobResponse::from).collect();

    let by_status = |status: JobStatus| -> Vec<JobResponse> {
        jobs.iter().filter(|j| j.status == status).cloned().collect()
    };

    Ok(HttpResponse::Ok().json(StationQueueResponse {
        station: StationResponse::from(station),
        jobs_by_status: JobsByStatus {
            pending: by_status(JobStatus::Pending),
            printing: by_status(JobStatus::Printing),
            completed: by_status(JobStatus::Completed),
            failed: by_status(JobStatus::Failed),
        },
        print_jobs: jobs,
        pagination: PaginationInfo {
            total,
            limit,
            offset: query.offset,
        },
    }))
}

/// List a station's print history (completed and failed jobs).
#[utoipa::path(
    get,
    path = "/print-queue/station/{station_id}/history",
    tag = "Print Queue",
    params(
        ("station_id" = Uuid, Path, description = "Station UUID"),
        ("from_date" = Option<String>, Query, description = "Earliest creation date (ISO 8601)"),
        ("to_date" = Option<String>, Query, description = "Latest creation date (ISO 8601)"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 50, max 100)"),
        ("offset" = Option<u64>, Query, description = "Pagination offset")
    ),
    responses(
        (status = 200, description = "Station history", body = StationHistoryResponse),
        (status = 404, description = "Station not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn get_station_print_history(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<StationHistoryQuery>,
) -> AppResult<HttpResponse> {
    let station_id = path.into_inner();
    let station = pool
        .find_station(auth.user.id, station_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Station".to_string()))?;

    let limit = query.clamped_limit();
    let (jobs, total) = pool
        .list_station_history(
            auth.user.id,
            station_id,
            query.from_date,
            query.to_date,
            limit,
            query.offset,
        )
        .await?;

    let stats = pool.station_history_stats(auth.user.id, station_id).await?;

    Ok(HttpResponse::Ok().json(StationHistoryResponse {
        station: StationResponse::from(station),
        history: jobs.into_iter().map(JobResponse::from).collect(),
        stats,
        pagination: PaginationInfo {
            total,
            limit,
            offset: query.offset,
        },
    }))
}

/// Apply a bulk cancel/requeue/delete to a set of jobs (admin only).
///
/// Atomic: the whole batch is applied in one transaction or not at all.
/// Requeue resets even finished jobs to pending with the error cleared.
#[utoipa::path(
    post,
    path = "/print-queue/bulk",
    tag = "Print Queue",
    request_body = BulkJobRequest,
    responses(
        (status = 200, description = "Bulk operation applied", body = BulkJobResponse),
        (status = 400, description = "Invalid operation", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 404, description = "No matching jobs", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn bulk_queue_operation(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    body: web::Json<BulkJobRequest>,
) -> AppResult<HttpResponse> {
    auth.require_admin()?;

    let affected = print_queue::bulk(&pool, &body).await?;

    Ok(HttpResponse::Ok().json(BulkJobResponse {
        message: "Bulk operation completed successfully".to_string(),
        affected_jobs: affected,
    }))
}

/// Configure print queue routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/print-queue").route(web::get().to(get_print_queue)))
        .service(
            web::resource("/print-queue/add/{file_id}")
                .route(web::post().to(add_to_print_queue)),
        )
        .service(web::resource("/print-queue/next").route(web::get().to(get_next_print_job)))
        .service(web::resource("/print-queue/bulk").route(web::post().to(bulk_queue_operation)))
        .service(
            web::resource("/print-queue/{job_id}/status")
                .route(web::put().to(update_print_job_status)),
        )
        .service(
            web::resource("/print-queue/{job_id}")
                .route(web::delete().to(remove_from_print_queue)),
        )
        .service(
            web::resource("/print-queue/station/{station_id}")
                .route(web::get().to(get_station_print_queue)),
        )
        .service(
            web::resource("/print-queue/station/{station_id}/history")
                .route(web::get().to(get_station_print_history)),
        );
}
