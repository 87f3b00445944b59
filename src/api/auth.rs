//! Account and token API handlers.

use actix_web::{web, HttpResponse};
use tracing::info;

use crate::auth::{self, JwtKeys, UserAuth};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::user::{MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH};
use crate::models::{
    AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, VerifyResponse,
};

/// Register a new user account.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid username or password", body = crate::error::ErrorResponse),
        (status = 409, description = "Username already exists", body = crate::error::ErrorResponse),
    )
)]
pub async fn register(
    pool: web::Data<DbPool>,
    keys: web::Data<JwtKeys>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.username.len() < MIN_USERNAME_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Username must be at least {} characters long",
            MIN_USERNAME_LENGTH
        )));
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }

    if pool.find_user_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let user = pool.insert_user(&req.username, &password_hash).await?;

    let token = keys.generate_token(user.id, &user.username)?;

    info!(user = %user.username, user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User created successfully".to_string(),
        token,
        username: user.username,
    }))
}

/// Log in with username and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse),
    )
)]
pub async fn login(
    pool: web::Data<DbPool>,
    keys: web::Data<JwtKeys>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = pool.find_user_by_username(&req.username).await?;

    // Verify against a match or fall through to the same error either way, so
    // the response does not reveal which usernames exist.
    let valid = match user {
        Some(ref u) => auth::verify_password(&req.password, &u.password_hash)?,
        None => false,
    };

    let user = match (valid, user) {
        (true, Some(u)) => u,
        _ => {
            return Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }
    };

    if !user.is_active {
        return Err(AppError::Unauthorized("Account is disabled".to_string()));
    }

    let token = keys.generate_token(user.id, &user.username)?;

    info!(user = %user.username, "User logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        username: user.username,
    }))
}

/// Get the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/auth/profile",
    tag = "Auth",
    responses(
        (status = 200, description = "Profile details", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn profile(auth: UserAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let user = pool
        .find_user_by_id(auth.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        id: user.id,
        username: user.username,
        created_at: user.created_at,
    }))
}

/// Verify that the presented bearer token is valid.
#[utoipa::path(
    get,
    path = "/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn verify(auth: UserAuth) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(VerifyResponse {
        valid: true,
        username: auth.user.username,
    }))
}

/// Issue a fresh token with extended expiry.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "Auth",
    responses(
        (status = 200, description = "Token refreshed", body = AuthResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn refresh(auth: UserAuth, keys: web::Data<JwtKeys>) -> AppResult<HttpResponse> {
    let token = keys.generate_token(auth.user.id, &auth.user.username)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Token refreshed successfully".to_string(),
        token,
        username: auth.user.username,
    }))
}

/// Configure auth routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/auth/register").route(web::post().to(register)))
        .service(web::resource("/auth/login").route(web::post().to(login)))
        .service(web::resource("/auth/profile").route(web::get().to(profile)))
        .service(web::resource("/auth/verify").route(web::get().to(verify)))
        .service(web::resource("/auth/refresh").route(web::post().to(refresh)));
}
