//! Generation of station and session credentials.
//!
//! Both are opaque prefixed random strings. The station token is the
//! long-lived device identity; the session token is rotated on every
//! registration/reconnect.

use rand::Rng;

/// Prefix identifying station (device) tokens.
const STATION_TOKEN_PREFIX: &str = "pst_";
/// Prefix identifying session tokens.
const SESSION_TOKEN_PREFIX: &str = "pss_";
/// Length of the random part of a token.
const TOKEN_RANDOM_LENGTH: usize = 40;

fn random_token(prefix: &str) -> String {
    let random_part: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(TOKEN_RANDOM_LENGTH)
        .map(char::from)
        .collect();

    format!("{}{}", prefix, random_part)
}

/// Generate a long-lived station identity token.
pub fn generate_station_token() -> String {
    random_token(STATION_TOKEN_PREFIX)
}

/// Generate a short-lived session token.
pub fn generate_session_token() -> String {
    random_token(SESSION_TOKEN_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let station = generate_station_token();
        let session = generate_session_token();

        assert!(station.starts_with(STATION_TOKEN_PREFIX));
        assert!(session.starts_with(SESSION_TOKEN_PREFIX));
        assert_eq!(
            station.len(),
            STATION_TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH
        );
        assert_eq!(
            session.len(),
            SESSION_TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH
        );
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
    }
}
