//! Database operations for uploaded files.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::{print_job, uploaded_file};
use crate::error::{AppError, AppResult};
use crate::models::FileStatus;

use super::DbPool;

/// Metadata for a newly stored upload.
pub struct NewUploadedFile {
    pub user_id: Uuid,
    pub filename: String,
    pub original_filename: String,
    pub file_size: i64,
    pub file_hash: String,
    pub mime_type: String,
}

impl DbPool {
    /// Insert a record for a stored upload.
    ///
    /// Uploads are finalized synchronously, so the record is created already
    /// completed with processed_at stamped.
    pub async fn insert_file(&self, entry: NewUploadedFile) -> AppResult<uploaded_file::Model> {
        let now = Utc::now();

        let model = uploaded_file::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(entry.user_id),
            filename: Set(entry.filename),
            original_filename: Set(entry.original_filename),
            file_size: Set(entry.file_size),
            file_hash: Set(entry.file_hash),
            mime_type: Set(entry.mime_type),
            status: Set(FileStatus::Completed.as_str().to_string()),
            uploaded_at: Set(now),
            processed_at: Set(Some(now)),
            error_message: Set(None),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert file: {}", e)))?;

        Ok(result)
    }

    /// Get a file owned by the given user.
    pub async fn get_file(
        &self,
        user_id: Uuid,
        file_id: Uuid,
    ) -> AppResult<Option<uploaded_file::Model>> {
        let result = uploaded_file::Entity::find_by_id(file_id)
            .filter(uploaded_file::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get file: {}", e)))?;

        Ok(result)
    }

    /// List a user's files, newest first, paginated.
    ///
    /// Returns (files, total, pages).
    pub async fn list_files(
        &self,
        user_id: Uuid,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<uploaded_file::Model>, u64, u64)> {
        let paginator = uploaded_file::Entity::find()
            .filter(uploaded_file::Column::UserId.eq(user_id))
            .order_by_desc(uploaded_file::Column::UploadedAt)
            .paginate(self.connection(), per_page);

        let counts = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| AppError::Database(format!("Failed to count files: {}", e)))?;

        let files = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| AppError::Database(format!("Failed to list files: {}", e)))?;

        Ok((files, counts.number_of_items, counts.number_of_pages))
    }

    /// Delete a file record and its dependent print jobs in one transaction.
    ///
    /// The caller is responsible for removing the stored bytes afterwards.
    pub async fn delete_file(&self, file: uploaded_file::Model) -> AppResult<()> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open transaction: {}", e)))?;

        print_job::Entity::delete_many()
            .filter(print_job::Column::FileId.eq(file.id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete file jobs: {}", e)))?;

        file.delete(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete file: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit file delete: {}", e)))?;

        Ok(())
    }
}
