//! Shared types for Order Desk
//!
//! Wire and domain types used by the desk client and the runner binary:
//! orders and their status lifecycle, restaurants, menu entries and the
//! backend response envelope.

pub mod models;
pub mod response;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    AcceptLocation, AcceptOrderRequest, Location, MenuDraft, MenuEntry, NewRestaurant, Order,
    OrderItem, OrderStatus, Restaurant,
};
pub use response::{API_CODE_SUCCESS, ApiEnvelope};
pub use types::{MenuId, OrderId, RestaurantId, UserId};
