//! Desk Client - order desk for restaurant owners
//!
//! Keeps the active restaurant's orders in sync with the order service,
//! advances them through the kitchen lifecycle and resolves menu names
//! for display.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod menu;
pub mod poller;
pub mod restaurants;
pub mod session;
pub mod sync;

#[cfg(test)]
mod mock;

pub use config::ClientConfig;
pub use error::{DeskError, DeskResult, PipelineStep};
pub use gateway::{Gateways, MenuGateway, OrderGateway, RestaurantGateway};
pub use http::NetworkHttpClient;
pub use menu::{MenuNameResolver, UNKNOWN_ITEM};
pub use poller::{OrderPoller, PollStatus};
pub use restaurants::RestaurantDirectory;
pub use session::{FileSession, MemorySession, Session, SessionProvider};
pub use sync::{BoardSnapshot, OrderSyncEngine};

// Re-export shared types for convenience
pub use shared::{
    Location, MenuDraft, MenuEntry, NewRestaurant, Order, OrderItem, OrderStatus, Restaurant,
};
