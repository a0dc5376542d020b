//! Cancelable periodic cleanup of expired store entries.

use std::sync::Arc;
use std::time::Duration;

use skillswap_application::ExpiredEntrySweeper;
use skillswap_core::{AppError, AppResult};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Handle to a background task that sweeps one store on a fixed interval.
///
/// The task stops on [`BackgroundSweeper::shutdown`] and is aborted if the
/// handle is dropped first.
pub struct BackgroundSweeper {
    name: &'static str,
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundSweeper {
    /// Spawns the sweep loop on the current tokio runtime.
    ///
    /// The first pass runs one full `interval` after spawning. A failed pass is
    /// logged and does not stop the loop.
    pub fn spawn(target: Arc<dyn ExpiredEntrySweeper>, interval: Duration) -> AppResult<Self> {
        if interval.is_zero() {
            return Err(AppError::Validation(
                "sweep interval must be greater than zero".to_owned(),
            ));
        }

        let name = target.sweeper_name();
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match target.sweep_expired().await {
                            Ok(0) => {}
                            Ok(removed) => debug!(sweeper = name, removed, "swept expired entries"),
                            Err(error) => warn!(sweeper = name, error = %error, "sweep pass failed"),
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        info!(sweeper = name, interval_secs = interval.as_secs(), "background sweeper started");

        Ok(Self {
            name,
            shutdown_tx,
            handle: Some(handle),
        })
    }

    /// Name of the swept store.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Signals the loop to stop and waits for it to finish.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);

        if let Some(handle) = self.handle.take()
            && let Err(error) = handle.await
        {
            warn!(sweeper = self.name, error = %error, "sweeper task ended abnormally");
            return;
        }

        info!(sweeper = self.name, "background sweeper stopped");
    }
}

impl Drop for BackgroundSweeper {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
