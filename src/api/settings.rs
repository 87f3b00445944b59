//! User settings API handlers.

use actix_web::{web, HttpResponse};
use tracing::info;

use crate::auth::UserAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    PrintOrientation, SettingsResponse, UpdateSettingsRequest, UpdateSettingsResponse,
};

/// Bounds for the per-user upload size limit in megabytes.
const FILE_SIZE_RANGE_MB: std::ops::RangeInclusive<i32> = 1..=100;
/// Bounds for print copies.
const PRINT_COPIES_RANGE: std::ops::RangeInclusive<i32> = 1..=10;

/// Get the caller's settings, creating defaults on first access.
#[utoipa::path(
    get,
    path = "/settings",
    tag = "Settings",
    responses(
        (status = 200, description = "Current settings", body = SettingsResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn get_settings(auth: UserAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let settings = pool.get_or_create_settings(auth.user.id).await?;

    Ok(HttpResponse::Ok().json(SettingsResponse::from(settings)))
}

/// Update the caller's settings.
///
/// Partial update: absent fields are unchanged. A provided default station
/// must be a station owned by the caller; an explicit null clears it.
#[utoipa::path(
    put,
    path = "/settings",
    tag = "Settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = UpdateSettingsResponse),
        (status = 400, description = "Invalid value", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn update_settings(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    body: web::Json<UpdateSettingsRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if let Some(size) = req.max_file_size_mb
        && !FILE_SIZE_RANGE_MB.contains(&size)
    {
        return Err(AppError::InvalidInput(
            "File size must be between 1 and 100 MB".to_string(),
        ));
    }

    if let Some(ref orientation) = req.print_orientation
        && PrintOrientation::parse(orientation).is_none()
    {
        return Err(AppError::InvalidInput(
            "Print orientation must be portrait or landscape".to_string(),
        ));
    }

    if let Some(copies) = req.print_copies
        && !PRINT_COPIES_RANGE.contains(&copies)
    {
        return Err(AppError::InvalidInput(
            "Print copies must be between 1 and 10".to_string(),
        ));
    }

    // A provided (non-null) default station must exist and belong to the caller
    if let Some(Some(station_id)) = req.default_station_id
        && pool.find_station(auth.user.id, station_id).await?.is_none()
    {
        return Err(AppError::InvalidInput("Invalid station ID".to_string()));
    }

    let current = pool.get_or_create_settings(auth.user.id).await?;
    let updated = pool.apply_settings_update(current, &req).await?;

    info!(user = %auth.user.username, "Settings updated");

    Ok(HttpResponse::Ok().json(UpdateSettingsResponse {
        message: "Settings updated successfully".to_string(),
        settings: SettingsResponse::from(updated),
    }))
}

/// Configure settings routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/settings")
            .route(web::get().to(get_settings))
            .route(web::put().to(update_settings)),
    );
}
