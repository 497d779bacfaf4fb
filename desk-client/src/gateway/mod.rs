//! Backend gateways
//!
//! One trait per backend resource. The sync engine, resolver and
//! directory only see these traits; [`Gateways::http`] wires the
//! reqwest-backed implementations.

mod menu;
mod order;
mod restaurant;

pub use menu::HttpMenuGateway;
pub use order::HttpOrderGateway;
pub use restaurant::HttpRestaurantGateway;

use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    AcceptOrderRequest, Location, MenuDraft, MenuEntry, NewRestaurant, Order, OrderStatus,
    Restaurant,
};

use crate::config::ClientConfig;
use crate::error::{DeskError, DeskResult};
use crate::http::NetworkHttpClient;

/// Order service
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// All orders placed at a restaurant, in server order
    async fn fetch_orders_by_restaurant(&self, restaurant_id: &str) -> DeskResult<Vec<Order>>;

    /// Set an order's status and return the order as the server now has it
    async fn set_order_status(&self, order_id: &str, status: &OrderStatus) -> DeskResult<Order>;
}

/// Restaurant service
#[async_trait]
pub trait RestaurantGateway: Send + Sync {
    /// Notify the backend that an order was accepted at a pickup location
    async fn accept_order(&self, request: &AcceptOrderRequest) -> DeskResult<()>;

    async fn get_restaurant(&self, restaurant_id: &str) -> DeskResult<Restaurant>;

    /// Register a new restaurant for its owner
    async fn create_restaurant(&self, restaurant: &NewRestaurant) -> DeskResult<Restaurant>;

    /// Pickup location of a restaurant
    async fn get_restaurant_location(&self, restaurant_id: &str) -> DeskResult<Location> {
        let restaurant = self.get_restaurant(restaurant_id).await?;
        restaurant.location.ok_or_else(|| {
            DeskError::InvalidResponse(format!("Restaurant {restaurant_id} has no location"))
        })
    }

    /// Restaurants owned by a user
    async fn find_restaurants_by_user(&self, user_id: &str) -> DeskResult<Vec<Restaurant>>;

    async fn update_open_status(&self, restaurant_id: &str, is_open: bool) -> DeskResult<()>;

    async fn update_verification_status(
        &self,
        restaurant_id: &str,
        is_verified: bool,
    ) -> DeskResult<()>;
}

/// Menu service
#[async_trait]
pub trait MenuGateway: Send + Sync {
    async fn get_menu_entry(&self, menu_id: &str) -> DeskResult<MenuEntry>;

    async fn list_menus_by_restaurant(&self, restaurant_id: &str) -> DeskResult<Vec<MenuEntry>>;

    async fn update_menu_availability(
        &self,
        menu_id: &str,
        available: bool,
    ) -> DeskResult<MenuEntry>;

    async fn create_menu_entry(&self, draft: &MenuDraft) -> DeskResult<MenuEntry>;

    /// Replace an entry's editable fields
    async fn update_menu_entry(&self, menu_id: &str, draft: &MenuDraft) -> DeskResult<MenuEntry>;

    async fn delete_menu_entry(&self, menu_id: &str) -> DeskResult<()>;
}

/// The three gateways, shared between components
#[derive(Clone)]
pub struct Gateways {
    pub orders: Arc<dyn OrderGateway>,
    pub restaurants: Arc<dyn RestaurantGateway>,
    pub menus: Arc<dyn MenuGateway>,
}

impl Gateways {
    pub fn new(
        orders: Arc<dyn OrderGateway>,
        restaurants: Arc<dyn RestaurantGateway>,
        menus: Arc<dyn MenuGateway>,
    ) -> Self {
        Self {
            orders,
            restaurants,
            menus,
        }
    }

    /// HTTP gateways for the configured service URLs
    pub fn http(config: &ClientConfig) -> DeskResult<Self> {
        let timeout = config.request_timeout();
        let client = |base_url: &str| -> DeskResult<NetworkHttpClient> {
            Ok(NetworkHttpClient::new(base_url, timeout)?.with_token(config.access_token.clone()))
        };

        Ok(Self::new(
            Arc::new(HttpOrderGateway::new(client(&config.order_api_url)?)),
            Arc::new(HttpRestaurantGateway::new(client(&config.restaurant_api_url)?)),
            Arc::new(HttpMenuGateway::new(client(&config.menu_api_url)?)),
        ))
    }
}

impl std::fmt::Debug for Gateways {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateways").finish_non_exhaustive()
    }
}
