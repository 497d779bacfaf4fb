//! Order sync engine
//!
//! Keeps the active restaurant's orders in sync with the order service and
//! drives status transitions. Local state only changes after the backend
//! confirms a write.

mod board;

pub use board::{BoardSnapshot, OrderBoard, RefreshOutcome};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use shared::{AcceptOrderRequest, Order, OrderStatus};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::{DeskError, DeskResult, PipelineStep};
use crate::gateway::{Gateways, OrderGateway, RestaurantGateway};
use crate::session::SessionProvider;

pub struct OrderSyncEngine {
    orders: Arc<dyn OrderGateway>,
    restaurants: Arc<dyn RestaurantGateway>,
    session: Arc<dyn SessionProvider>,
    board: RwLock<OrderBoard>,
    /// Sequence of the newest refresh sent
    issued: AtomicU64,
}

impl OrderSyncEngine {
    pub fn new(
        orders: Arc<dyn OrderGateway>,
        restaurants: Arc<dyn RestaurantGateway>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            orders,
            restaurants,
            session,
            board: RwLock::new(OrderBoard::new()),
            issued: AtomicU64::new(0),
        }
    }

    pub fn from_gateways(gateways: &Gateways, session: Arc<dyn SessionProvider>) -> Self {
        Self::new(gateways.orders.clone(), gateways.restaurants.clone(), session)
    }

    pub fn session(&self) -> &Arc<dyn SessionProvider> {
        &self.session
    }

    /// Refresh the session's active restaurant
    pub async fn refresh_active(&self) -> DeskResult<Vec<Order>> {
        let restaurant_id = self.session.active_restaurant_id();
        self.refresh(restaurant_id.as_deref()).await
    }

    /// Fetch a restaurant's orders and replace the local list.
    ///
    /// On failure the previous list is kept and `last_error` is set. A
    /// response overtaken by a newer refresh is dropped and the current
    /// list returned.
    #[instrument(skip(self))]
    pub async fn refresh(&self, restaurant_id: Option<&str>) -> DeskResult<Vec<Order>> {
        let Some(restaurant_id) = restaurant_id else {
            let err = DeskError::Lookup("No active restaurant".into());
            self.board.write().await.set_error(err.to_string());
            return Err(err);
        };

        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.orders.fetch_orders_by_restaurant(restaurant_id).await;

        let mut board = self.board.write().await;
        match result {
            Ok(orders) => {
                let count = orders.len();
                match board.apply_refresh(seq, orders) {
                    RefreshOutcome::Applied => debug!(seq, count, "Orders refreshed"),
                    RefreshOutcome::Stale => warn!(seq, "Discarded stale refresh"),
                }
                Ok(board.orders().to_vec())
            }
            Err(e) => {
                if board.record_failure(seq, e.to_string()) {
                    warn!(seq, error = %e, "Order refresh failed");
                }
                Err(e)
            }
        }
    }

    /// Move an order forward and mirror the confirmed status locally
    #[instrument(skip(self, target), fields(target = %target))]
    pub async fn advance_status(&self, order_id: &str, target: OrderStatus) -> DeskResult<Order> {
        self.check_transition(order_id, &target).await?;

        let server_order = self.orders.set_order_status(order_id, &target).await?;

        let mark = self.issued.load(Ordering::SeqCst);
        let order = self
            .board
            .write()
            .await
            .confirm_status(mark, order_id, server_order, &target);
        info!(order_id, status = %target, "Order status updated");
        Ok(order)
    }

    pub async fn accept(&self, order_id: &str) -> DeskResult<Order> {
        self.advance_status(order_id, OrderStatus::Accepted).await
    }

    pub async fn mark_waiting_for_pickup(&self, order_id: &str) -> DeskResult<Order> {
        self.advance_status(order_id, OrderStatus::WaitingForPickup)
            .await
    }

    /// Accept an order at the active restaurant's location and start preparing it.
    ///
    /// Steps run strictly in sequence and stop at the first failure.
    ///
    /// Every failure comes back as [`DeskError::Pipeline`] naming the step,
    /// including a missing active restaurant. Match on [`DeskError::root`]
    /// or use [`DeskError::is_lookup`] / [`DeskError::is_not_found`] rather
    /// than on the outer variant.
    #[instrument(skip(self))]
    pub async fn accept_and_prepare(&self, order_id: &str) -> DeskResult<Order> {
        let restaurant_id = self
            .session
            .active_restaurant_id()
            .ok_or_else(|| DeskError::Lookup("No active restaurant".into()))
            .map_err(|e| e.at(PipelineStep::ResolveRestaurant))?;

        self.check_transition(order_id, &OrderStatus::Preparing)
            .await
            .map_err(|e| e.at(PipelineStep::SetPreparing))?;

        let location = self
            .restaurants
            .get_restaurant_location(&restaurant_id)
            .await
            .map_err(|e| e.at(PipelineStep::LookupLocation))?;

        let request = AcceptOrderRequest::new(order_id, &restaurant_id, location);
        self.restaurants
            .accept_order(&request)
            .await
            .map_err(|e| e.at(PipelineStep::NotifyAcceptance))?;
        info!(order_id, %restaurant_id, "Order accepted");

        self.advance_status(order_id, OrderStatus::Preparing)
            .await
            .map_err(|e| e.at(PipelineStep::SetPreparing))
    }

    async fn check_transition(&self, order_id: &str, target: &OrderStatus) -> DeskResult<()> {
        let board = self.board.read().await;
        match board.order(order_id) {
            Some(order) if !order.status.can_advance_to(target) => {
                Err(DeskError::InvalidTransition {
                    order_id: order_id.to_string(),
                    from: order.status.clone(),
                    to: target.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.board.read().await.orders().to_vec()
    }

    pub async fn order(&self, order_id: &str) -> Option<Order> {
        self.board.read().await.order(order_id).cloned()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.board.read().await.last_error().map(str::to_string)
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        self.board.read().await.snapshot()
    }
}

impl std::fmt::Debug for OrderSyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSyncEngine")
            .field("issued", &self.issued.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
