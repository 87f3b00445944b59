//! Print queue state machine: enqueue, claim, status updates, bulk ops.
//!
//! State machine: `pending → printing → {completed, failed}` with `cancelled`
//! reachable before completion. No transition leaves a terminal state; only
//! the bulk requeue operation resets jobs to pending.

use chrono::Utc;
use sea_orm::Set;
use tracing::info;
use uuid::Uuid;

use crate::db::jobs::JobRecord;
use crate::db::DbPool;
use crate::entity::print_job::ActiveModel;
use crate::error::{AppError, AppResult};
use crate::models::{
    AuthenticatedUser, BulkJobRequest, BulkOperation, JobRoute, JobStatus, PrintSettings,
    UpdateJobStatusRequest,
};

/// Error text recorded when an administrator fails someone else's job without
/// supplying a reason.
pub const ADMIN_FAILURE_MESSAGE: &str = "Manually marked as failed by an administrator";

/// Resolve the routing target for a new job.
///
/// Three tiers: explicit station, then the caller's default station, then
/// local. The explicit id must already be validated (active, owned) by the
/// caller; the default is stored as configured.
pub fn resolve_route(explicit_station: Option<Uuid>, default_station: Option<Uuid>) -> JobRoute {
    match explicit_station.or(default_station) {
        Some(id) => JobRoute::Station(id),
        None => JobRoute::Local,
    }
}

/// Parse a client-supplied status for the update endpoint.
///
/// Only printing/completed/failed/cancelled are accepted; returning to
/// pending is reserved to the bulk requeue operation.
pub fn parse_update_status(s: &str) -> AppResult<JobStatus> {
    match JobStatus::parse(s) {
        Some(JobStatus::Pending) | None => {
            Err(AppError::InvalidInput("Invalid status".to_string()))
        }
        Some(status) => Ok(status),
    }
}

/// Reject transitions out of a terminal state.
pub fn ensure_not_finalized(current: JobStatus) -> AppResult<()> {
    if current.is_terminal() {
        Err(AppError::Conflict(format!(
            "Print job is already {}",
            current
        )))
    } else {
        Ok(())
    }
}

/// Enqueue a file for printing.
///
/// An explicit station must be an active station owned by the caller.
/// Without one, the caller's default station applies, and failing that the
/// job is local. A second pending job for the same (user, file, route) is a
/// conflict; the partial unique index backstops this check under concurrency.
pub async fn enqueue(
    pool: &DbPool,
    user: &AuthenticatedUser,
    file_id: Uuid,
    explicit_station: Option<Uuid>,
) -> AppResult<JobRecord> {
    let file = pool
        .get_file(user.id, file_id)
        .await?
        .ok_or_else(|| AppError::NotFound("File".to_string()))?;

    let route = match explicit_station {
        Some(station_id) => {
            pool.find_active_station(user.id, station_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Station".to_string()))?;
            JobRoute::Station(station_id)
        }
        None => {
            let settings = pool.get_or_create_settings(user.id).await?;
            resolve_route(None, settings.default_station_id)
        }
    };

    if pool.pending_duplicate_exists(user.id, file.id, route).await? {
        return Err(AppError::Conflict(
            "File already in print queue for this station".to_string(),
        ));
    }

    let job = pool.insert_job(user.id, file.id, route).await?;

    info!(
        user = %user.username,
        job_id = %job.id,
        file_id = %file.id,
        station_id = ?route.station_id(),
        "Job enqueued"
    );

    pool.get_job_record(job.id)
        .await?
        .ok_or_else(|| AppError::Database("Failed to fetch newly inserted job".to_string()))
}

/// Outcome of a claim poll.
pub enum ClaimOutcome {
    /// Caller has auto-print disabled and no station id was given.
    Disabled,
    /// Nothing eligible in the queue.
    Empty,
    /// A job was atomically claimed (already transitioned to printing).
    Claimed(JobRecord, PrintSettings),
}

/// Claim the next eligible job for a consumer.
///
/// Stations (station_id given) bypass the auto-print preference and drain
/// both their own and local jobs; browser clients only drain local jobs and
/// only while auto-print is enabled. The claim itself is a single atomic
/// conditional update, so concurrent pollers never receive the same job.
pub async fn claim_next(
    pool: &DbPool,
    user: &AuthenticatedUser,
    station_id: Option<Uuid>,
) -> AppResult<ClaimOutcome> {
    let settings = pool.get_or_create_settings(user.id).await?;

    if station_id.is_none() && !settings.auto_print_enabled {
        return Ok(ClaimOutcome::Disabled);
    }

    match pool.claim_next_job(user.id, station_id).await? {
        None => Ok(ClaimOutcome::Empty),
        Some(record) => {
            let print_settings = PrintSettings {
                orientation: settings.print_orientation.clone(),
                copies: settings.print_copies,
            };

            pool.touch_last_print_check(settings).await?;

            info!(
                user = %user.username,
                job_id = %record.id,
                station_id = ?station_id,
                "Job claimed"
            );

            Ok(ClaimOutcome::Claimed(record, print_settings))
        }
    }
}

/// Update a job's status.
///
/// Administrators may update any job; owners only their own. `completed`
/// stamps printed_at; `failed` records the supplied error text, or a fixed
/// default when an administrator fails another user's job without a reason.
pub async fn update_status(
    pool: &DbPool,
    user: &AuthenticatedUser,
    job_id: Uuid,
    req: &UpdateJobStatusRequest,
) -> AppResult<JobRecord> {
    let new_status = parse_update_status(&req.status)?;

    let job = if user.is_admin {
        pool.find_job_by_id(job_id).await?
    } else {
        pool.find_job(user.id, job_id).await?
    }
    .ok_or_else(|| AppError::NotFound("Print job".to_string()))?;

    let current = JobStatus::parse(&job.status).unwrap_or(JobStatus::Pending);
    ensure_not_finalized(current)?;

    let owner_id = job.user_id;
    let mut active: ActiveModel = job.into();
    active.status = Set(new_status.as_str().to_string());

    match new_status {
        JobStatus::Completed => {
            active.printed_at = Set(Some(Utc::now()));
        }
        JobStatus::Failed => {
            if let Some(ref error) = req.error {
                active.error_message = Set(Some(error.clone()));
            } else if user.is_admin && owner_id != user.id {
                active.error_message = Set(Some(ADMIN_FAILURE_MESSAGE.to_string()));
            }
        }
        _ => {}
    }

    let updated = pool.update_job(active).await?;

    info!(
        user = %user.username,
        job_id = %job_id,
        from = %current,
        to = %new_status,
        "Job status updated"
    );

    pool.get_job_record(updated.id)
        .await?
        .ok_or_else(|| AppError::Database("Failed to fetch updated job".to_string()))
}

/// Apply a bulk cancel/requeue/delete to a set of jobs.
///
/// One transaction; the whole batch succeeds or aborts. Only the affected
/// count is reported. Requeue resets even finished jobs to pending with the
/// error cleared.
pub async fn bulk(pool: &DbPool, req: &BulkJobRequest) -> AppResult<u64> {
    let operation = BulkOperation::parse(&req.operation)
        .ok_or_else(|| AppError::InvalidInput("Invalid operation".to_string()))?;

    if req.job_ids.is_empty() {
        return Err(AppError::InvalidInput(
            "At least one job id must be specified".to_string(),
        ));
    }

    let affected = pool.bulk_job_operation(&req.job_ids, operation).await?;

    if affected == 0 {
        return Err(AppError::NotFound("Print jobs".to_string()));
    }

    info!(
        operation = %operation.as_str(),
        requested = req.job_ids.len(),
        affected = affected,
        "Bulk queue operation applied"
    );

    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_route_explicit_wins() {
        let explicit = Uuid::new_v4();
        let default = Uuid::new_v4();

        assert_eq!(
            resolve_route(Some(explicit), Some(default)),
            JobRoute::Station(explicit)
        );
    }

    #[test]
    fn test_resolve_route_default_fallback() {
        let default = Uuid::new_v4();
        assert_eq!(
            resolve_route(None, Some(default)),
            JobRoute::Station(default)
        );
    }

    #[test]
    fn test_resolve_route_local() {
        assert_eq!(resolve_route(None, None), JobRoute::Local);
    }

    #[test]
    fn test_parse_update_status_accepts_working_and_terminal() {
        assert_eq!(parse_update_status("printing").unwrap(), JobStatus::Printing);
        assert_eq!(
            parse_update_status("completed").unwrap(),
            JobStatus::Completed
        );
        assert_eq!(parse_update_status("failed").unwrap(), JobStatus::Failed);
        assert_eq!(
            parse_update_status("cancelled").unwrap(),
            JobStatus::Cancelled
        );
    }

    #[test]
    fn test_parse_update_status_rejects_pending_and_unknown() {
        assert!(parse_update_status("pending").is_err());
        assert!(parse_update_status("done").is_err());
        assert!(parse_update_status("").is_err());
    }

    #[test]
    fn test_terminal_states_cannot_transition() {
        assert!(ensure_not_finalized(JobStatus::Pending).is_ok());
        assert!(ensure_not_finalized(JobStatus::Printing).is_ok());

        for finalized in [
            JobStatus::Completed,
            JobStatus::Failed,
            JobStatus::Cancelled,
        ] {
            let err = ensure_not_finalized(finalized).unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)));
        }
    }
}
