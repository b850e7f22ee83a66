//! Scheduled expiration sweeps.
//!
//! The scanner re-derives eligibility from the log on every run, so the
//! schedule only needs at-least-once semantics: a missed or repeated tick
//! is harmless.

use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::state::AppState;

/// Spawn the background task that runs an expiration sweep on the
/// configured interval. The first sweep runs one full interval after
/// startup.
pub fn spawn_sweep_scheduler(state: AppState) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_secs(state.config.sweep_interval_seconds);

    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let engine = state.engine.clone();
            let result =
                tokio::task::spawn_blocking(move || engine.run_expiration_sweep(Utc::now())).await;

            match result {
                Ok(Ok(report)) => {
                    tracing::info!(
                        expired_points = %report.expired_points,
                        transactions_processed = %report.transactions_processed,
                        "Scheduled expiration sweep finished"
                    );
                }
                Ok(Err(e)) => {
                    // Storage hiccups are retried on the next tick.
                    tracing::error!(error = %e, "Scheduled expiration sweep failed");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Expiration sweep task panicked");
                }
            }
        }
    })
}
