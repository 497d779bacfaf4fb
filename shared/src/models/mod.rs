//! Domain models
//!
//! Field names follow the backend's camelCase JSON.

pub mod menu;
pub mod order;
pub mod restaurant;

pub use menu::{MenuDraft, MenuEntry};
pub use order::{Order, OrderItem, OrderStatus};
pub use restaurant::{AcceptLocation, AcceptOrderRequest, Location, NewRestaurant, Restaurant};
