//! Disk storage for uploaded documents.
//!
//! Files land under `<upload_dir>/<user_id>/<timestamp>_<sanitized name>`.
//! Only PDFs are accepted: the extension is checked before the body is read
//! and the `%PDF` magic is checked after.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Allowed upload extensions.
const ALLOWED_EXTENSIONS: &[&str] = &["pdf"];

/// Leading bytes of every PDF file.
const PDF_MAGIC: &[u8] = b"%PDF";

/// MIME type recorded for accepted uploads.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Check that a filename carries an allowed extension.
pub fn has_allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check the file content for the PDF magic bytes.
pub fn is_pdf_content(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// SHA-256 hex digest of the file content.
pub fn file_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Keeps ASCII alphanumerics, dots, dashes and underscores; everything else
/// becomes an underscore. Leading dots are stripped so the result can never
/// be a hidden or relative path.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    let limited: String = trimmed.chars().take(255).collect();

    if limited.is_empty() {
        "file".to_string()
    } else {
        limited
    }
}

/// Directory holding one user's uploads.
pub fn user_dir(upload_dir: &Path, user_id: Uuid) -> PathBuf {
    upload_dir.join(user_id.to_string())
}

/// Full path of a stored file.
pub fn stored_path(upload_dir: &Path, user_id: Uuid, stored_name: &str) -> PathBuf {
    user_dir(upload_dir, user_id).join(stored_name)
}

/// Write the upload to disk and return the stored (timestamp-prefixed) name.
pub async fn store_upload(
    upload_dir: &Path,
    user_id: Uuid,
    original_name: &str,
    data: &[u8],
) -> AppResult<String> {
    let dir = user_dir(upload_dir, user_id);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to create upload directory: {}", e)))?;

    let stored_name = format!(
        "{}_{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        sanitize_filename(original_name)
    );
    let path = dir.join(&stored_name);

    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to write upload: {}", e)))?;

    Ok(stored_name)
}

/// Remove a stored file from disk; missing files are not an error.
pub async fn remove_stored_file(
    upload_dir: &Path,
    user_id: Uuid,
    stored_name: &str,
) -> AppResult<()> {
    let path = stored_path(upload_dir, user_id, stored_name);

    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AppError::Storage(format!(
            "Failed to remove stored file: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_check() {
        assert!(has_allowed_extension("report.pdf"));
        assert!(has_allowed_extension("REPORT.PDF"));
        assert!(!has_allowed_extension("report.docx"));
        assert!(!has_allowed_extension("report"));
        assert!(!has_allowed_extension(""));
    }

    #[test]
    fn test_pdf_magic() {
        assert!(is_pdf_content(b"%PDF-1.7 rest of file"));
        assert!(!is_pdf_content(b"<html>not a pdf</html>"));
        assert!(!is_pdf_content(b""));
    }

    #[test]
    fn test_file_hash_is_stable_sha256() {
        let a = file_hash(b"hello");
        let b = file_hash(b"hello");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64); // SHA-256 produces 64 hex chars
        assert_ne!(a, file_hash(b"other"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("my report (1).pdf"), "my_report__1_.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename("üñïçødé.pdf"), "_____d_.pdf");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[tokio::test]
    async fn test_store_and_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let user_id = Uuid::new_v4();

        let stored = store_upload(dir.path(), user_id, "doc.pdf", b"%PDF-1.7 data")
            .await
            .unwrap();
        assert!(stored.ends_with("_doc.pdf"));

        let path = stored_path(dir.path(), user_id, &stored);
        assert!(path.exists());
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.7 data");

        remove_stored_file(dir.path(), user_id, &stored).await.unwrap();
        assert!(!path.exists());

        // Removing again is not an error
        remove_stored_file(dir.path(), user_id, &stored).await.unwrap();
    }
}
