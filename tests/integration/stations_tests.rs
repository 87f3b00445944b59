//! Integration tests for station registration, sessions, and liveness.

#[cfg(test)]
mod tests {
    /// Registering the same (user, name) twice reactivates in place.
    #[test]
    fn test_reregistration_reactivates_and_rotates_session() {
        // TODO: Implement when a PostgreSQL test harness is set up
        // This test should:
        // 1. POST /stations/register {name} -> 201, capture both tokens
        // 2. POST /stations/register {name} again -> 200, same station id,
        //    same station_token, different session_token
        // 3. Heartbeat with the first session_token -> 401
        // 4. Heartbeat with the second session_token -> 200
    }

    /// Heartbeats older than 60s flip the station offline on the next list.
    #[test]
    fn test_stale_heartbeat_reports_offline() {
        // TODO: Implement when a PostgreSQL test harness is set up
        // This test should:
        // 1. Register a station (online), backdate last_heartbeat by 61s
        // 2. GET /stations -> station reported offline
        // 3. Assert the offline status was persisted to the row
    }

    /// Reconnect succeeds regardless of the old session token.
    #[test]
    fn test_reconnect_is_idempotent() {
        // TODO: Implement when a PostgreSQL test harness is set up
        // This test should:
        // 1. Reconnect with the current token -> 200, old token deactivated
        // 2. Reconnect with a stale token -> 200
        // 3. Reconnect with no token at all -> 200
    }

    /// Deactivation invalidates every session for the station.
    #[test]
    fn test_deactivate_invalidates_sessions() {
        // TODO: Implement when a PostgreSQL test harness is set up
        // This test should:
        // 1. Register, then DELETE /stations/{id}
        // 2. Assert is_active=false, status=offline on the row
        // 3. Heartbeat with the last session token -> 401
    }
}
