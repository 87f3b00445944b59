//! Integration tests for account registration and bearer auth.

#[cfg(test)]
mod tests {
    /// Protected endpoints return 401 without a bearer token.
    #[test]
    fn test_protected_endpoints_require_token() {
        // TODO: Implement when a PostgreSQL test harness is set up
        // This test should:
        // 1. GET /files, /stations, /print-queue without Authorization
        // 2. Assert 401 with the UNAUTHORIZED error body
    }

    /// Registration enforces username/password minimums and uniqueness.
    #[test]
    fn test_registration_validation() {
        // TODO: Implement when a PostgreSQL test harness is set up
        // This test should:
        // 1. POST /auth/register with a 2-char username -> 400
        // 2. POST with a 5-char password -> 400
        // 3. POST a valid pair -> 201 with a usable token
        // 4. POST the same username again -> 409
    }

    /// Tokens survive refresh and reject tampering.
    #[test]
    fn test_token_refresh_and_tampering() {
        // TODO: Implement when a PostgreSQL test harness is set up
        // This test should:
        // 1. Login, GET /auth/verify -> 200 {valid: true}
        // 2. POST /auth/refresh -> new token also verifies
        // 3. Flip one character in the token -> 401 on any endpoint
    }
}
