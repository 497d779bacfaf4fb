//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status as the backend spells it
///
/// The restaurant side only ever writes up to `WAITING_FOR_PICKUP`;
/// anything the delivery systems set afterwards is carried as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    Preparing,
    WaitingForPickup,
    /// Downstream status owned by delivery systems
    Other(String),
}

impl OrderStatus {
    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::WaitingForPickup => "WAITING_FOR_PICKUP",
            OrderStatus::Other(s) => s,
        }
    }

    /// Position in the lifecycle. Downstream statuses rank after pickup.
    pub fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Accepted => 1,
            OrderStatus::Preparing => 2,
            OrderStatus::WaitingForPickup => 3,
            OrderStatus::Other(_) => 4,
        }
    }

    /// Forward moves (including skips) and re-issuing the same status are allowed.
    pub fn can_advance_to(&self, target: &OrderStatus) -> bool {
        target.rank() >= self.rank()
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => OrderStatus::Pending,
            "Accepted" => OrderStatus::Accepted,
            "PREPARING" => OrderStatus::Preparing,
            "WAITING_FOR_PICKUP" => OrderStatus::WaitingForPickup,
            _ => OrderStatus::Other(value),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        OrderStatus::from(value.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Menu entry reference
    pub menu_id: String,
    pub quantity: u32,
    /// Unit price at the time of ordering
    #[serde(default)]
    pub price: f64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Order as served by the order service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub restaurant_id: String,
    /// Assigned courier, unset until delivery picks the order up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn new(
        order_id: impl Into<String>,
        restaurant_id: impl Into<String>,
        status: OrderStatus,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            customer_id: String::new(),
            restaurant_id: restaurant_id.into(),
            delivery_id: None,
            status,
            total_price: 0.0,
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, menu_id: impl Into<String>, quantity: u32, price: f64) -> Self {
        self.items.push(OrderItem {
            menu_id: menu_id.into(),
            quantity,
            price,
        });
        self.total_price = self.items.iter().map(OrderItem::line_total).sum();
        self
    }
}
