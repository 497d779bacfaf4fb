//! Scheduled order refresh
//!
//! Ticks on a fixed interval, refreshes the active restaurant and publishes
//! each outcome on a watch channel. The first tick fires immediately.

use std::sync::Arc;
use std::time::Duration;

use shared::Order;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::MIN_POLL_INTERVAL_MS;
use crate::sync::OrderSyncEngine;

/// Outcome of the latest poll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollStatus {
    /// Number of completed polls
    pub tick: u64,
    /// Current order list (kept from the previous poll on failure)
    pub orders: Vec<Order>,
    pub error: Option<String>,
}

/// Handle to the background refresh task. Dropping it stops the task.
pub struct OrderPoller {
    shutdown: CancellationToken,
    status: watch::Receiver<PollStatus>,
    handle: Option<JoinHandle<()>>,
}

impl OrderPoller {
    /// Spawn the refresh loop. A zero period is raised to one millisecond.
    pub fn start(engine: Arc<OrderSyncEngine>, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(MIN_POLL_INTERVAL_MS));
        let shutdown = CancellationToken::new();
        let (tx, rx) = watch::channel(PollStatus::default());

        let token = shutdown.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_ms = period.as_millis() as u64, "Order poller started");

            let mut tick = 0u64;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let result = tokio::select! {
                    _ = token.cancelled() => break,
                    result = engine.refresh_active() => result,
                };

                tick += 1;
                let status = match result {
                    Ok(orders) => {
                        debug!(tick, count = orders.len(), "Poll complete");
                        PollStatus {
                            tick,
                            orders,
                            error: None,
                        }
                    }
                    Err(e) => {
                        warn!(tick, error = %e, "Poll failed");
                        PollStatus {
                            tick,
                            orders: engine.orders().await,
                            error: Some(e.to_string()),
                        }
                    }
                };
                tx.send_replace(status);
            }

            info!("Order poller stopped");
        });

        Self {
            shutdown,
            status: rx,
            handle: Some(handle),
        }
    }

    /// Receiver for poll outcomes
    pub fn subscribe(&self) -> watch::Receiver<PollStatus> {
        self.status.clone()
    }

    /// Latest poll outcome
    pub fn latest(&self) -> PollStatus {
        self.status.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the loop and wait for it to exit
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Err(e) = handle.await {
            warn!(error = %e, "Order poller task failed");
        }
    }
}

impl Drop for OrderPoller {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
