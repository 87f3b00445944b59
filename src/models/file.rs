//! Uploaded file models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::uploaded_file;

/// Upload lifecycle status.
///
/// Uploads are currently finalized synchronously (pending/processing exist for
/// the asynchronous pipeline the schema allows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// File details as returned to clients.
///
/// `filename` is the name the client uploaded with; the stored disk name is
/// internal.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileResponse {
    pub id: Uuid,
    pub filename: String,
    pub size: i64,
    pub status: FileStatus,
    pub uploaded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<uploaded_file::Model> for FileResponse {
    fn from(m: uploaded_file::Model) -> Self {
        FileResponse {
            id: m.id,
            filename: m.original_filename,
            size: m.file_size,
            status: FileStatus::parse(&m.status).unwrap_or(FileStatus::Pending),
            uploaded_at: m.uploaded_at,
            processed_at: m.processed_at,
            error: m.error_message,
        }
    }
}

/// Response after a successful upload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub file: FileResponse,
}

/// Query parameters for listing files.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FileQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    10
}

impl FileQuery {
    /// Clamp per_page to a sane maximum and page to at least 1.
    pub fn normalized(&self) -> (u64, u64) {
        (self.page.max(1), self.per_page.clamp(1, 100))
    }
}

/// Paginated file list response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileListResponse {
    pub files: Vec<FileResponse>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub per_page: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            FileStatus::Pending,
            FileStatus::Processing,
            FileStatus::Completed,
            FileStatus::Failed,
        ] {
            assert_eq!(FileStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(FileStatus::parse("bogus"), None);
    }

    #[test]
    fn test_query_normalization() {
        let q = FileQuery {
            page: 0,
            per_page: 5000,
        };
        assert_eq!(q.normalized(), (1, 100));

        let q = FileQuery {
            page: 3,
            per_page: 25,
        };
        assert_eq!(q.normalized(), (3, 25));
    }
}
