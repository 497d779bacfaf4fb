use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::{AcceptOrderRequest, ApiEnvelope, NewRestaurant, Restaurant};
use tracing::instrument;

use super::RestaurantGateway;
use crate::error::{DeskError, DeskResult};
use crate::http::NetworkHttpClient;

/// `GET /restaurant/{id}` answers with the object, `{restaurant}` or the
/// coded envelope. The envelope must come before `Bare` so an error reply
/// is never read as a restaurant.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RestaurantBody {
    Wrapped { restaurant: Restaurant },
    Enveloped(ApiEnvelope<Restaurant>),
    Bare(Restaurant),
}

impl RestaurantBody {
    fn into_restaurant(self) -> DeskResult<Restaurant> {
        match self {
            RestaurantBody::Wrapped { restaurant } | RestaurantBody::Bare(restaurant) => {
                Ok(restaurant)
            }
            RestaurantBody::Enveloped(envelope) => {
                envelope.into_result().map_err(DeskError::Network)
            }
        }
    }
}

/// `{restaurants}` is only accepted when the key is present; anything else
/// that is an object has to be the envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RestaurantListBody {
    Wrapped { restaurants: Vec<Restaurant> },
    Enveloped(ApiEnvelope<Vec<Restaurant>>),
    Bare(Vec<Restaurant>),
}

impl RestaurantListBody {
    fn into_restaurants(self) -> DeskResult<Vec<Restaurant>> {
        match self {
            RestaurantListBody::Wrapped { restaurants } | RestaurantListBody::Bare(restaurants) => {
                Ok(restaurants)
            }
            RestaurantListBody::Enveloped(envelope) => {
                envelope.into_result().map_err(DeskError::Network)
            }
        }
    }
}

/// Write endpoints reply with free-form JSON; only a non-zero `code` means failure.
fn check_ack(body: Value) -> DeskResult<()> {
    match body.get("code").and_then(Value::as_i64) {
        Some(code) if code != shared::API_CODE_SUCCESS => {
            let msg = body
                .get("msg")
                .or_else(|| body.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Backend returned code {code}"));
            Err(DeskError::Network(msg))
        }
        _ => Ok(()),
    }
}

/// Restaurant service over HTTP
#[derive(Debug, Clone)]
pub struct HttpRestaurantGateway {
    http: NetworkHttpClient,
}

impl HttpRestaurantGateway {
    pub fn new(http: NetworkHttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl RestaurantGateway for HttpRestaurantGateway {
    #[instrument(skip_all, fields(order_id = %request.order_id, restaurant_id = %request.restaurant_id))]
    async fn accept_order(&self, request: &AcceptOrderRequest) -> DeskResult<()> {
        let body: Value = self.http.post("restaurant/accept-order", request).await?;
        check_ack(body)
    }

    #[instrument(skip(self))]
    async fn get_restaurant(&self, restaurant_id: &str) -> DeskResult<Restaurant> {
        let body: RestaurantBody = self
            .http
            .get(&format!("restaurant/{restaurant_id}"))
            .await?;
        body.into_restaurant()
    }

    #[instrument(skip_all, fields(user_id = %restaurant.user_id, name = %restaurant.name))]
    async fn create_restaurant(&self, restaurant: &NewRestaurant) -> DeskResult<Restaurant> {
        let body: RestaurantBody = self.http.post("restaurant", restaurant).await?;
        body.into_restaurant()
    }

    #[instrument(skip(self))]
    async fn find_restaurants_by_user(&self, user_id: &str) -> DeskResult<Vec<Restaurant>> {
        let body: RestaurantListBody = self
            .http
            .get(&format!("restaurant/user/{user_id}"))
            .await?;
        body.into_restaurants()
    }

    #[instrument(skip(self))]
    async fn update_open_status(&self, restaurant_id: &str, is_open: bool) -> DeskResult<()> {
        let body: Value = self
            .http
            .patch(
                &format!("restaurant/{restaurant_id}/open-status"),
                &json!({ "isOpen": is_open }),
            )
            .await?;
        check_ack(body)
    }

    #[instrument(skip(self))]
    async fn update_verification_status(
        &self,
        restaurant_id: &str,
        is_verified: bool,
    ) -> DeskResult<()> {
        let body: Value = self
            .http
            .patch(
                &format!("restaurant/{restaurant_id}/verification"),
                &json!({ "isVerified": is_verified }),
            )
            .await?;
        check_ack(body)
    }
}
