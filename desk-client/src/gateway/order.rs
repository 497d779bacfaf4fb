use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::{ApiEnvelope, Order, OrderStatus};
use tracing::instrument;

use super::OrderGateway;
use crate::error::{DeskError, DeskResult};
use crate::http::NetworkHttpClient;

#[derive(Debug, Deserialize)]
struct OrderList {
    #[serde(default)]
    orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdate<'a> {
    order_id: &'a str,
    status: &'a OrderStatus,
}

/// Order service over HTTP
#[derive(Debug, Clone)]
pub struct HttpOrderGateway {
    http: NetworkHttpClient,
}

impl HttpOrderGateway {
    pub fn new(http: NetworkHttpClient) -> Self {
        Self { http }
    }
}

fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> DeskResult<T> {
    envelope.into_result().map_err(DeskError::Network)
}

#[async_trait]
impl OrderGateway for HttpOrderGateway {
    #[instrument(skip(self))]
    async fn fetch_orders_by_restaurant(&self, restaurant_id: &str) -> DeskResult<Vec<Order>> {
        let envelope: ApiEnvelope<OrderList> = self
            .http
            .get(&format!("order/restaurant/{restaurant_id}"))
            .await?;
        Ok(unwrap_envelope(envelope)?.orders)
    }

    #[instrument(skip(self, status), fields(status = %status))]
    async fn set_order_status(&self, order_id: &str, status: &OrderStatus) -> DeskResult<Order> {
        let body = StatusUpdate { order_id, status };
        let envelope: ApiEnvelope<Order> = self.http.post("order/update/status", &body).await?;
        unwrap_envelope(envelope)
    }
}
