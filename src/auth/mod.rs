//! Authentication: bearer JWT issuance/verification and password hashing.
//!
//! Access tokens are HS256-signed JWTs carrying the user id and username with a
//! 24 hour expiry. Passwords are hashed with Argon2id in PHC string format so
//! algorithm parameters and salt travel with the hash.

mod extractor;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use extractor::UserAuth;

use crate::error::{AppError, AppResult};

/// Access token lifetime in hours.
const TOKEN_TTL_HOURS: i64 = 24;

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the user's id.
    pub sub: Uuid,
    /// Username at issue time (display only; the user row is authoritative).
    pub username: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// JWT signing/verification keys derived from the configured secret.
///
/// The secret is wrapped in `SecretString` so it is never logged and its
/// memory is zeroed on drop.
#[derive(Clone)]
pub struct JwtKeys {
    secret: SecretString,
}

impl JwtKeys {
    /// Create keys from the configured secret.
    pub fn new(secret: String) -> Self {
        Self {
            secret: SecretString::from(secret),
        }
    }

    /// Issue an access token for the given user.
    pub fn generate_token(&self, user_id: Uuid, username: &str) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            exp: now + TOKEN_TTL_HOURS * 3600,
            iat: now,
        };

        encode(
            &Header::default(), // HS256
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| AppError::Unauthorized(format!("Failed to issue token: {}", e)))
    }

    /// Validate a bearer token and return its claims.
    ///
    /// Expired tokens and signature mismatches both map to 401, with the
    /// message distinguishing the expiry case for clients that auto-refresh.
    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &Validation::default(), // HS256, validates exp
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Unauthorized("Token has expired".to_string())
            }
            _ => AppError::Unauthorized("Invalid token".to_string()),
        })?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JwtKeys([REDACTED])")
    }
}

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::InvalidInput(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(false)` for a mismatch; other parse/verify failures are errors.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Database(format!("Stored password hash is invalid: {}", e)))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Database(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_keys() -> JwtKeys {
        JwtKeys::new("test-secret-that-is-long-enough-for-hmac".to_string())
    }

    #[test]
    fn test_generate_and_verify_token() {
        let keys = test_keys();
        let user_id = Uuid::new_v4();

        let token = keys
            .generate_token(user_id, "alice")
            .expect("token generation should succeed");
        let claims = keys
            .verify_token(&token)
            .expect("token validation should succeed");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_expired_token_fails() {
        let keys = test_keys();

        // Manually create an already-expired token, past the default leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "alice".to_string(),
            exp: now - 300,
            iat: now - 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-that-is-long-enough-for-hmac"),
        )
        .expect("encoding should succeed");

        let err = keys.verify_token(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg.contains("expired")));
    }

    #[test]
    fn test_token_signed_with_other_secret_fails() {
        let keys_a = JwtKeys::new("secret-alpha".to_string());
        let keys_b = JwtKeys::new("secret-bravo".to_string());

        let token = keys_a
            .generate_token(Uuid::new_v4(), "alice")
            .expect("token generation should succeed");

        assert!(keys_b.verify_token(&token).is_err());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct-horse-battery-staple").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(verify_password("correct-horse-battery-staple", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_jwt_keys_debug_is_redacted() {
        let keys = test_keys();
        assert_eq!(format!("{:?}", keys), "JwtKeys([REDACTED])");
    }
}
