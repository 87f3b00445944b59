//! Periodic queue statistics broadcaster.
//!
//! A thin polling loop: every tick it reads global queue and station counts
//! and fans them out to WebSocket subscribers. Purely informational; nothing
//! in the core depends on it.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info};

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{JobStatus, WsEvent, WsEventMessage};
use crate::services::EventBroadcaster;

/// Configuration for the stats broadcaster.
#[derive(Clone)]
pub struct StatsConfig {
    /// How often to poll and broadcast (in seconds)
    pub interval_secs: u64,
}

/// Start the stats broadcast background task.
pub fn start_stats_task(pool: Arc<DbPool>, broadcaster: EventBroadcaster, config: StatsConfig) {
    tokio::spawn(async move {
        info!(
            "Starting stats broadcaster (interval: {} seconds)",
            config.interval_secs
        );

        let mut ticker = interval(Duration::from_secs(config.interval_secs));

        loop {
            ticker.tick().await;

            if let Err(e) = broadcast_stats(&pool, &broadcaster).await {
                error!("Stats broadcast error: {}", e);
            }
        }
    });
}

/// Poll counts and fan them out to subscribers.
async fn broadcast_stats(pool: &DbPool, broadcaster: &EventBroadcaster) -> AppResult<()> {
    let pending_jobs = pool.count_jobs_with_status(JobStatus::Pending).await?;
    let printing_jobs = pool.count_jobs_with_status(JobStatus::Printing).await?;
    let (active_stations, online_stations) = pool.station_counts().await?;

    broadcaster.send(WsEventMessage::new(WsEvent::queue_stats(
        pending_jobs,
        printing_jobs,
        active_stations,
        online_stations,
    )));

    Ok(())
}
