//! Actix-web extractor for bearer-token user authentication.
//!
//! # Security
//! - The raw Authorization header value is wrapped in `SecretString` immediately
//! - Token values are never logged or exposed in debug output
//! - The user row is loaded on every request so deactivated accounts are
//!   rejected without waiting for token expiry

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use secrecy::{ExposeSecret, SecretString};

use super::JwtKeys;
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::AuthenticatedUser;

/// Extractor that requires a valid bearer token.
///
/// Use this in handlers that require authentication:
/// ```ignore
/// async fn protected_handler(auth: UserAuth) -> impl Responder {
///     // auth.user contains the authenticated user info
/// }
/// ```
pub struct UserAuth {
    pub user: AuthenticatedUser,
}

impl UserAuth {
    /// Require the authenticated user to be an administrator.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.user.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }
}

impl FromRequest for UserAuth {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        let keys = req.app_data::<web::Data<JwtKeys>>().cloned();

        // Wrap the raw header value before anything else can log it
        let raw_header: Option<SecretString> = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| SecretString::from(s.to_string()));

        Box::pin(async move {
            let (pool, keys) = match (pool, keys) {
                (Some(pool), Some(keys)) => (pool, keys),
                _ => {
                    return Err(AppError::Unauthorized(
                        "Internal configuration error".to_string(),
                    ));
                }
            };

            let raw = raw_header
                .ok_or_else(|| AppError::Unauthorized("Token is missing".to_string()))?;

            // Accept both "Bearer <token>" and a bare token value
            let header_value = raw.expose_secret();
            let token = header_value.strip_prefix("Bearer ").unwrap_or(header_value);

            let claims = keys.verify_token(token)?;

            let user = pool
                .find_user_by_id(claims.sub)
                .await?
                .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

            if !user.is_active {
                return Err(AppError::Unauthorized("Account is disabled".to_string()));
            }

            Ok(UserAuth {
                user: AuthenticatedUser {
                    id: user.id,
                    username: user.username,
                    is_admin: user.is_admin,
                },
            })
        })
    }
}
