//! Uploaded file API handlers.

use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

use crate::auth::UserAuth;
use crate::db::files::NewUploadedFile;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{FileListResponse, FileQuery, FileResponse, MessageResponse, UploadResponse};
use crate::services::upload;

/// Upload a PDF document.
///
/// Accepts multipart form data with a single `file` field. The extension is
/// checked before the body is read; the content magic after. The caller's
/// configured size limit applies on top of the server-wide ceiling.
#[utoipa::path(
    post,
    path = "/files/upload",
    tag = "Files",
    responses(
        (status = 201, description = "File uploaded", body = UploadResponse),
        (status = 400, description = "Invalid file", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn upload_file(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    upload_dir: web::Data<PathBuf>,
    max_upload_size: web::Data<usize>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let settings = pool.get_or_create_settings(auth.user.id).await?;
    let server_ceiling: usize = *max_upload_size.get_ref();
    let max_size = (settings.max_file_size_mb as usize * 1024 * 1024).min(server_ceiling);

    let mut stored: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let filename = match field.content_disposition().and_then(|cd| cd.get_filename()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue, // not a file field
        };

        if !upload::has_allowed_extension(&filename) {
            return Err(AppError::InvalidInput(
                "Only PDF files are allowed".to_string(),
            ));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            data.extend_from_slice(&chunk);

            if data.len() > max_size {
                return Err(AppError::InvalidInput(format!(
                    "File size exceeds maximum allowed size of {}MB",
                    settings.max_file_size_mb
                )));
            }
        }

        stored = Some((filename, data));
        break; // a single file per upload request
    }

    let (original_filename, data) =
        stored.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    if data.is_empty() {
        return Err(AppError::InvalidInput("No file selected".to_string()));
    }

    if !upload::is_pdf_content(&data) {
        return Err(AppError::InvalidInput(
            "Invalid file type. Only PDF files are allowed".to_string(),
        ));
    }

    let file_hash = upload::file_hash(&data);
    let stored_name =
        upload::store_upload(upload_dir.get_ref(), auth.user.id, &original_filename, &data).await?;

    let record = pool
        .insert_file(NewUploadedFile {
            user_id: auth.user.id,
            filename: stored_name.clone(),
            original_filename: upload::sanitize_filename(&original_filename),
            file_size: data.len() as i64,
            file_hash,
            mime_type: upload::PDF_MIME_TYPE.to_string(),
        })
        .await;

    let record = match record {
        Ok(r) => r,
        Err(e) => {
            // Keep disk and database consistent when the insert fails
            let _ = upload::remove_stored_file(upload_dir.get_ref(), auth.user.id, &stored_name)
                .await;
            return Err(e);
        }
    };

    info!(
        user = %auth.user.username,
        file_id = %record.id,
        size = record.file_size,
        "File uploaded"
    );

    Ok(HttpResponse::Created().json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        file: FileResponse::from(record),
    }))
}

/// List the caller's files, newest first.
#[utoipa::path(
    get,
    path = "/files",
    tag = "Files",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default 1)"),
        ("per_page" = Option<u64>, Query, description = "Results per page (default 10, max 100)")
    ),
    responses(
        (status = 200, description = "File list", body = FileListResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn list_files(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    query: web::Query<FileQuery>,
) -> AppResult<HttpResponse> {
    let (page, per_page) = query.normalized();
    let (files, total, pages) = pool.list_files(auth.user.id, page, per_page).await?;

    Ok(HttpResponse::Ok().json(FileListResponse {
        files: files.into_iter().map(FileResponse::from).collect(),
        total,
        page,
        pages,
        per_page,
    }))
}

/// Get a single file's metadata.
#[utoipa::path(
    get,
    path = "/files/{file_id}",
    tag = "Files",
    params(("file_id" = Uuid, Path, description = "File UUID")),
    responses(
        (status = 200, description = "File details", body = FileResponse),
        (status = 404, description = "File not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn get_file(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let file = pool
        .get_file(auth.user.id, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("File".to_string()))?;

    Ok(HttpResponse::Ok().json(FileResponse::from(file)))
}

/// Delete a file, its dependent print jobs, and the stored bytes.
#[utoipa::path(
    delete,
    path = "/files/{file_id}",
    tag = "Files",
    params(("file_id" = Uuid, Path, description = "File UUID")),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 404, description = "File not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn delete_file(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    upload_dir: web::Data<PathBuf>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let file = pool
        .get_file(auth.user.id, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("File".to_string()))?;

    let stored_name = file.filename.clone();
    let file_id = file.id;

    pool.delete_file(file).await?;
    upload::remove_stored_file(upload_dir.get_ref(), auth.user.id, &stored_name).await?;

    info!(user = %auth.user.username, file_id = %file_id, "File deleted");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "File deleted successfully".to_string(),
    }))
}

/// Download the stored document under its original name.
#[utoipa::path(
    get,
    path = "/files/{file_id}/download",
    tag = "Files",
    params(("file_id" = Uuid, Path, description = "File UUID")),
    responses(
        (status = 200, description = "File content"),
        (status = 404, description = "File not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn download_file(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    upload_dir: web::Data<PathBuf>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let file = pool
        .get_file(auth.user.id, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("File".to_string()))?;

    let disk_path = upload::stored_path(upload_dir.get_ref(), auth.user.id, &file.filename);
    if !disk_path.exists() {
        return Err(AppError::NotFound("File on disk".to_string()));
    }

    let named = actix_files::NamedFile::open_async(&disk_path)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to open stored file: {}", e)))?
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.original_filename)],
        });

    Ok(named.into_response(&req))
}

/// Configure file routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/files/upload").route(web::post().to(upload_file)))
        .service(web::resource("/files").route(web::get().to(list_files)))
        .service(
            web::resource("/files/{file_id}")
                .route(web::get().to(get_file))
                .route(web::delete().to(delete_file)),
        )
        .service(web::resource("/files/{file_id}/download").route(web::get().to(download_file)));
}
