//! Owned restaurants
//!
//! Loads the owner's restaurants into the session and flips their
//! open/verification flags.

use std::sync::Arc;

use shared::{NewRestaurant, Restaurant};
use tracing::{info, instrument};

use crate::error::{DeskError, DeskResult};
use crate::gateway::{Gateways, RestaurantGateway};
use crate::session::SessionProvider;

pub struct RestaurantDirectory {
    gateway: Arc<dyn RestaurantGateway>,
    session: Arc<dyn SessionProvider>,
}

impl RestaurantDirectory {
    pub fn new(gateway: Arc<dyn RestaurantGateway>, session: Arc<dyn SessionProvider>) -> Self {
        Self { gateway, session }
    }

    pub fn from_gateways(gateways: &Gateways, session: Arc<dyn SessionProvider>) -> Self {
        Self::new(gateways.restaurants.clone(), session)
    }

    /// Fetch the session user's restaurants and store their ids in the session.
    ///
    /// The first owned restaurant becomes active unless the current one is
    /// still owned.
    #[instrument(skip(self))]
    pub async fn load_owned(&self) -> DeskResult<Vec<Restaurant>> {
        let user_id = self
            .session
            .user_id()
            .ok_or_else(|| DeskError::Lookup("No user in session".into()))?;

        let restaurants = self.gateway.find_restaurants_by_user(&user_id).await?;
        let ids = restaurants.iter().map(|r| r.restaurant_id.clone()).collect();
        self.session.set_restaurants(ids)?;

        info!(
            count = restaurants.len(),
            active = ?self.session.active_restaurant_id(),
            "Loaded owned restaurants"
        );
        Ok(restaurants)
    }

    /// Register a restaurant for the session user and add it to the session.
    ///
    /// The draft's `user_id` is replaced by the session user. The new
    /// restaurant becomes active only when none was.
    #[instrument(skip_all, fields(name = %restaurant.name))]
    pub async fn create_restaurant(&self, restaurant: &NewRestaurant) -> DeskResult<Restaurant> {
        let user_id = self
            .session
            .user_id()
            .ok_or_else(|| DeskError::Lookup("No user in session".into()))?;

        let mut restaurant = restaurant.clone();
        restaurant.user_id = user_id;
        let created = self.gateway.create_restaurant(&restaurant).await?;
        let restaurant_id = created.restaurant_id.clone();
        self.session
            .update(&mut |session| session.add_restaurant(restaurant_id.clone()))?;

        info!(restaurant_id = %created.restaurant_id, "Restaurant registered");
        Ok(created)
    }

    /// The session's active restaurant
    pub async fn active_restaurant(&self) -> DeskResult<Restaurant> {
        let restaurant_id = self
            .session
            .active_restaurant_id()
            .ok_or_else(|| DeskError::Lookup("No active restaurant".into()))?;
        self.gateway.get_restaurant(&restaurant_id).await
    }

    #[instrument(skip(self))]
    pub async fn set_open(&self, restaurant_id: &str, is_open: bool) -> DeskResult<()> {
        self.gateway.update_open_status(restaurant_id, is_open).await?;
        info!(restaurant_id, is_open, "Restaurant open status updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_verified(&self, restaurant_id: &str, is_verified: bool) -> DeskResult<()> {
        self.gateway
            .update_verification_status(restaurant_id, is_verified)
            .await?;
        info!(restaurant_id, is_verified, "Restaurant verification updated");
        Ok(())
    }
}
