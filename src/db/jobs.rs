//! Database queries for print jobs.

use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::{Expr, NullOrdering};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseBackend, EntityTrait, FromQueryResult, JoinType,
    ModelTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Select, Set, SqlErr, Statement, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::{print_job, printer_station, uploaded_file};
use crate::error::{AppError, AppResult};
use crate::models::{BulkOperation, JobResponse, JobRoute, JobStatus, StationHistoryStats};

use super::DbPool;

/// A job row with the file and station display names joined in.
#[derive(Debug, Clone, FromQueryResult)]
pub struct JobRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_id: Uuid,
    pub station_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub printed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub filename: Option<String>,
    pub station_name: Option<String>,
}

impl From<JobRecord> for JobResponse {
    fn from(r: JobRecord) -> Self {
        JobResponse {
            id: r.id,
            file_id: r.file_id,
            filename: r.filename,
            station_id: r.station_id,
            station_name: r.station_name,
            status: JobStatus::parse(&r.status).unwrap_or(JobStatus::Pending),
            created_at: r.created_at,
            printed_at: r.printed_at,
            error: r.error_message,
        }
    }
}

/// Id returned by the atomic claim statement.
#[derive(Debug, FromQueryResult)]
struct ClaimedJob {
    id: Uuid,
}

/// Base select joining file and station names onto job rows.
fn select_with_names() -> Select<print_job::Entity> {
    print_job::Entity::find()
        .column_as(uploaded_file::Column::OriginalFilename, "filename")
        .column_as(printer_station::Column::StationName, "station_name")
        .join(JoinType::LeftJoin, print_job::Relation::File.def())
        .join(JoinType::LeftJoin, print_job::Relation::Station.def())
}

impl DbPool {
    /// Insert a pending job for the resolved route.
    ///
    /// The partial unique index on pending (user, file, station) backstops the
    /// duplicate pre-check; a violation surfaces as Conflict.
    pub async fn insert_job(
        &self,
        user_id: Uuid,
        file_id: Uuid,
        route: JobRoute,
    ) -> AppResult<print_job::Model> {
        let model = print_job::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            file_id: Set(file_id),
            station_id: Set(route.station_id()),
            status: Set(JobStatus::Pending.as_str().to_string()),
            created_at: Set(Utc::now()),
            printed_at: Set(None),
            error_message: Set(None),
        };

        match model.insert(self.connection()).await {
            Ok(m) => Ok(m),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::Conflict(
                    "File already in print queue for this station".to_string(),
                )),
                _ => Err(AppError::Database(format!("Failed to insert job: {}", e))),
            },
        }
    }

    /// True when a pending job already exists for the (user, file, route) triple.
    pub async fn pending_duplicate_exists(
        &self,
        user_id: Uuid,
        file_id: Uuid,
        route: JobRoute,
    ) -> AppResult<bool> {
        let mut select = print_job::Entity::find()
            .filter(print_job::Column::UserId.eq(user_id))
            .filter(print_job::Column::FileId.eq(file_id))
            .filter(print_job::Column::Status.eq(JobStatus::Pending.as_str()));

        select = match route.station_id() {
            Some(station_id) => select.filter(print_job::Column::StationId.eq(station_id)),
            None => select.filter(print_job::Column::StationId.is_null()),
        };

        let count = select
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check duplicates: {}", e)))?;

        Ok(count > 0)
    }

    /// Atomically claim the oldest eligible pending job for a consumer.
    ///
    /// One conditional UPDATE: the selected job transitions pending->printing
    /// and is returned in the same statement, so two concurrent pollers can
    /// never claim the same job. SKIP LOCKED makes the loser pick the next
    /// oldest row instead of blocking.
    ///
    /// With a station id the eligibility filter is `station_id = $2 OR
    /// station_id IS NULL` (hybrid mode: stations also drain local jobs);
    /// without, only local jobs match.
    pub async fn claim_next_job(
        &self,
        user_id: Uuid,
        station_id: Option<Uuid>,
    ) -> AppResult<Option<JobRecord>> {
        let stmt = match station_id {
            Some(station_id) => Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"
                UPDATE print_queue
                   SET status = 'printing'
                 WHERE id = (
                       SELECT id FROM print_queue
                        WHERE user_id = $1
                          AND status = 'pending'
                          AND (station_id = $2 OR station_id IS NULL)
                        ORDER BY created_at ASC
                        LIMIT 1
                        FOR UPDATE SKIP LOCKED
                 )
                 RETURNING id
                "#,
                [user_id.into(), station_id.into()],
            ),
            None => Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"
                UPDATE print_queue
                   SET status = 'printing'
                 WHERE id = (
                       SELECT id FROM print_queue
                        WHERE user_id = $1
                          AND status = 'pending'
                          AND station_id IS NULL
                        ORDER BY created_at ASC
                        LIMIT 1
                        FOR UPDATE SKIP LOCKED
                 )
                 RETURNING id
                "#,
                [user_id.into()],
            ),
        };

        let claimed = ClaimedJob::find_by_statement(stmt)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to claim job: {}", e)))?;

        match claimed {
            Some(c) => Ok(self.get_job_record(c.id).await?),
            None => Ok(None),
        }
    }

    /// Fetch a job with display names by id.
    pub async fn get_job_record(&self, job_id: Uuid) -> AppResult<Option<JobRecord>> {
        let record = select_with_names()
            .filter(print_job::Column::Id.eq(job_id))
            .into_model::<JobRecord>()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get job: {}", e)))?;

        Ok(record)
    }

    /// Find a job owned by a user.
    pub async fn find_job(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> AppResult<Option<print_job::Model>> {
        let result = print_job::Entity::find_by_id(job_id)
            .filter(print_job::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find job: {}", e)))?;

        Ok(result)
    }

    /// Find a job by id alone (administrative access).
    pub async fn find_job_by_id(&self, job_id: Uuid) -> AppResult<Option<print_job::Model>> {
        let result = print_job::Entity::find_by_id(job_id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find job: {}", e)))?;

        Ok(result)
    }

    /// Persist changes staged on a job ActiveModel.
    pub async fn update_job(&self, active: print_job::ActiveModel) -> AppResult<print_job::Model> {
        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update job: {}", e)))?;

        Ok(result)
    }

    /// Hard-delete a single job.
    pub async fn delete_job(&self, job: print_job::Model) -> AppResult<()> {
        job.delete(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete job: {}", e)))?;

        Ok(())
    }

    /// List a user's jobs, newest first.
    pub async fn list_jobs(
        &self,
        user_id: Uuid,
        status: Option<JobStatus>,
        limit: u64,
    ) -> AppResult<Vec<JobRecord>> {
        let mut select = select_with_names().filter(print_job::Column::UserId.eq(user_id));

        if let Some(status) = status {
            select = select.filter(print_job::Column::Status.eq(status.as_str()));
        }

        let jobs = select
            .order_by_desc(print_job::Column::CreatedAt)
            .limit(limit)
            .into_model::<JobRecord>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list jobs: {}", e)))?;

        Ok(jobs)
    }

    /// List jobs addressed to one station, paginated.
    ///
    /// Working states list oldest first (queue order); finished states list
    /// newest first. Returns (jobs, total).
    pub async fn list_station_jobs(
        &self,
        user_id: Uuid,
        station_id: Uuid,
        status: Option<JobStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<JobRecord>, u64)> {
        let base = print_job::Entity::find()
            .filter(print_job::Column::UserId.eq(user_id))
            .filter(print_job::Column::StationId.eq(station_id));

        let base = match status {
            Some(status) => base.filter(print_job::Column::Status.eq(status.as_str())),
            None => base,
        };

        let total = base
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count station jobs: {}", e)))?;

        let mut select = select_with_names()
            .filter(print_job::Column::UserId.eq(user_id))
            .filter(print_job::Column::StationId.eq(station_id));

        if let Some(status) = status {
            select = select.filter(print_job::Column::Status.eq(status.as_str()));
        }

        let order = match status {
            Some(JobStatus::Pending) | Some(JobStatus::Printing) => Order::Asc,
            _ => Order::Desc,
        };

        let jobs = select
            .order_by(print_job::Column::CreatedAt, order)
            .offset(offset)
            .limit(limit)
            .into_model::<JobRecord>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list station jobs: {}", e)))?;

        Ok((jobs, total))
    }

    /// List a station's finished jobs (completed/failed), newest first.
    pub async fn list_station_history(
        &self,
        user_id: Uuid,
        station_id: Uuid,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<JobRecord>, u64)> {
        let finished = [
            JobStatus::Completed.as_str(),
            JobStatus::Failed.as_str(),
        ];

        let mut base = print_job::Entity::find()
            .filter(print_job::Column::UserId.eq(user_id))
            .filter(print_job::Column::StationId.eq(station_id))
            .filter(print_job::Column::Status.is_in(finished));

        if let Some(from) = from_date {
            base = base.filter(print_job::Column::CreatedAt.gte(from));
        }
        if let Some(to) = to_date {
            base = base.filter(print_job::Column::CreatedAt.lte(to));
        }

        let total = base
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count history: {}", e)))?;

        let mut select = select_with_names()
            .filter(print_job::Column::UserId.eq(user_id))
            .filter(print_job::Column::StationId.eq(station_id))
            .filter(print_job::Column::Status.is_in(finished));

        if let Some(from) = from_date {
            select = select.filter(print_job::Column::CreatedAt.gte(from));
        }
        if let Some(to) = to_date {
            select = select.filter(print_job::Column::CreatedAt.lte(to));
        }

        let jobs = select
            .order_by_with_nulls(print_job::Column::PrintedAt, Order::Desc, NullOrdering::Last)
            .order_by_desc(print_job::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .into_model::<JobRecord>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list history: {}", e)))?;

        Ok((jobs, total))
    }

    /// Aggregate print history statistics for one station.
    pub async fn station_history_stats(
        &self,
        user_id: Uuid,
        station_id: Uuid,
    ) -> AppResult<StationHistoryStats> {
        let scoped = print_job::Entity::find()
            .filter(print_job::Column::UserId.eq(user_id))
            .filter(print_job::Column::StationId.eq(station_id));

        let total_printed = scoped
            .clone()
            .filter(print_job::Column::Status.eq(JobStatus::Completed.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count history: {}", e)))?;

        let total_failed = scoped
            .clone()
            .filter(print_job::Column::Status.eq(JobStatus::Failed.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count history: {}", e)))?;

        let last_24h = scoped
            .filter(print_job::Column::Status.eq(JobStatus::Completed.as_str()))
            .filter(print_job::Column::PrintedAt.gte(Utc::now() - Duration::days(1)))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count history: {}", e)))?;

        Ok(StationHistoryStats {
            total_printed,
            total_failed,
            last_24h,
        })
    }

    /// Count pending jobs addressed to a station.
    pub async fn count_pending_jobs_for_station(&self, station_id: Uuid) -> AppResult<u64> {
        let count = print_job::Entity::find()
            .filter(print_job::Column::StationId.eq(station_id))
            .filter(print_job::Column::Status.eq(JobStatus::Pending.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count pending jobs: {}", e)))?;

        Ok(count)
    }

    /// Global job count for one status (stats broadcaster).
    pub async fn count_jobs_with_status(&self, status: JobStatus) -> AppResult<u64> {
        let count = print_job::Entity::find()
            .filter(print_job::Column::Status.eq(status.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count jobs: {}", e)))?;

        Ok(count)
    }

    /// Apply a bulk operation to a set of jobs in one transaction.
    ///
    /// Returns the number of affected rows only; there is no per-item outcome.
    /// Requeue deliberately resets even finished jobs back to pending with the
    /// error cleared.
    pub async fn bulk_job_operation(
        &self,
        job_ids: &[Uuid],
        operation: BulkOperation,
    ) -> AppResult<u64> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open transaction: {}", e)))?;

        let ids = job_ids.to_vec();

        let affected = match operation {
            BulkOperation::Cancel => {
                print_job::Entity::update_many()
                    .col_expr(
                        print_job::Column::Status,
                        Expr::value(JobStatus::Cancelled.as_str()),
                    )
                    .filter(print_job::Column::Id.is_in(ids))
                    .exec(&txn)
                    .await
                    .map_err(|e| AppError::Database(format!("Failed to cancel jobs: {}", e)))?
                    .rows_affected
            }
            BulkOperation::Requeue => {
                print_job::Entity::update_many()
                    .col_expr(
                        print_job::Column::Status,
                        Expr::value(JobStatus::Pending.as_str()),
                    )
                    .col_expr(
                        print_job::Column::ErrorMessage,
                        Expr::value(Option::<String>::None),
                    )
                    .filter(print_job::Column::Id.is_in(ids))
                    .exec(&txn)
                    .await
                    .map_err(|e| AppError::Database(format!("Failed to requeue jobs: {}", e)))?
                    .rows_affected
            }
            BulkOperation::Delete => {
                print_job::Entity::delete_many()
                    .filter(print_job::Column::Id.is_in(ids))
                    .exec(&txn)
                    .await
                    .map_err(|e| AppError::Database(format!("Failed to delete jobs: {}", e)))?
                    .rows_affected
            }
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit bulk operation: {}", e)))?;

        Ok(affected)
    }
}
