//! Local order state
//!
//! Refreshes are numbered when they are sent. A result is only applied if
//! no newer refresh has been applied already, and statuses confirmed by a
//! transition after the refresh was sent win over the refresh's copy.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use shared::{Order, OrderId, OrderStatus};

/// Outcome of applying a refresh result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A newer refresh was applied first; the result was dropped
    Stale,
}

#[derive(Debug, Clone)]
struct Confirmation {
    status: OrderStatus,
    /// Newest refresh sequence issued when the transition was confirmed
    mark: u64,
}

/// Read-only copy of the board
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardSnapshot {
    pub orders: Vec<Order>,
    pub last_error: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct OrderBoard {
    orders: Vec<Order>,
    last_error: Option<String>,
    last_synced_at: Option<DateTime<Utc>>,
    applied_seq: u64,
    confirmed: HashMap<OrderId, Confirmation>,
}

impl OrderBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            orders: self.orders.clone(),
            last_error: self.last_error.clone(),
            last_synced_at: self.last_synced_at,
        }
    }

    /// Replace the list with the result of refresh `seq`
    pub fn apply_refresh(&mut self, seq: u64, mut orders: Vec<Order>) -> RefreshOutcome {
        if seq < self.applied_seq {
            return RefreshOutcome::Stale;
        }

        for order in &mut orders {
            if let Some(confirmation) = self.confirmed.get(&order.order_id) {
                // Sent before the transition landed: keep the confirmed floor
                if confirmation.mark >= seq && confirmation.status.rank() > order.status.rank() {
                    order.status = confirmation.status.clone();
                }
            }
        }
        self.confirmed.retain(|_, c| c.mark > seq);

        self.orders = orders;
        self.applied_seq = seq;
        self.last_error = None;
        self.last_synced_at = Some(Utc::now());
        RefreshOutcome::Applied
    }

    /// Record a failed refresh. Failures older than the applied list are ignored.
    pub fn record_failure(&mut self, seq: u64, message: String) -> bool {
        if seq < self.applied_seq {
            return false;
        }
        self.last_error = Some(message);
        true
    }

    /// Record an error that did not come from a numbered refresh
    pub fn set_error(&mut self, message: String) {
        self.last_error = Some(message);
    }

    /// Apply a server-confirmed transition to the cached copy.
    ///
    /// `mark` is the newest refresh sequence issued at confirmation time.
    /// Returns the cached order after the update.
    pub fn confirm_status(
        &mut self,
        mark: u64,
        order_id: &str,
        server_order: Order,
        target: &OrderStatus,
    ) -> Order {
        let cached = match self.orders.iter_mut().find(|o| o.order_id == order_id) {
            Some(existing) => {
                existing.status = target.clone();
                existing.clone()
            }
            None => {
                let mut inserted = server_order;
                inserted.order_id = order_id.to_string();
                inserted.status = target.clone();
                self.orders.push(inserted.clone());
                inserted
            }
        };

        self.confirmed.insert(
            order_id.to_string(),
            Confirmation {
                status: target.clone(),
                mark,
            },
        );
        cached
    }
}
