//! Restaurant Model

use serde::{Deserialize, Serialize};

/// Geographic position of a restaurant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Restaurant registered by an owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub restaurant_id: String,
    /// Owner user id
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, alias = "cuisineType", skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub rating_count: u32,
}

/// Body of `POST /restaurant` when an owner registers a restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRestaurant {
    pub user_id: String,
    pub name: String,
    pub address: String,
    pub location: Location,
    pub phone: String,
    pub cuisine_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_hours: Option<String>,
}

impl NewRestaurant {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            address: address.into(),
            location,
            phone: String::new(),
            cuisine_type: String::new(),
            description: None,
            open_hours: None,
        }
    }
}

/// Location in the shape the acceptance endpoint expects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptLocation {
    pub lat: f64,
    pub lng: f64,
}

impl From<Location> for AcceptLocation {
    fn from(location: Location) -> Self {
        Self {
            lat: location.latitude,
            lng: location.longitude,
        }
    }
}

/// Body of `POST /restaurant/accept-order`
///
/// Ties an accepted order to the pickup location of the restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptOrderRequest {
    pub order_id: String,
    pub restaurant_id: String,
    pub location: AcceptLocation,
}

impl AcceptOrderRequest {
    pub fn new(order_id: &str, restaurant_id: &str, location: Location) -> Self {
        Self {
            order_id: order_id.to_string(),
            restaurant_id: restaurant_id.to_string(),
            location: location.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_request_wire_shape() {
        let req = AcceptOrderRequest::new("o1", "r1", Location::new(6.9271, 79.8612));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["orderId"], "o1");
        assert_eq!(json["restaurantId"], "r1");
        assert_eq!(json["location"]["lat"], 6.9271);
        assert_eq!(json["location"]["lng"], 79.8612);
    }

    #[test]
    fn test_new_restaurant_wire_shape() {
        let mut new = NewRestaurant::new("u1", "Spice Route", "12 Galle Rd", Location::new(6.9, 79.8));
        new.cuisine_type = "Sri Lankan".into();
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["cuisineType"], "Sri Lankan");
        assert_eq!(json["location"]["latitude"], 6.9);
        assert!(json.get("openHours").is_none());

        let created: Restaurant = serde_json::from_value(serde_json::json!({
            "restaurantId": "r9",
            "cuisineType": "Sri Lankan"
        }))
        .unwrap();
        assert_eq!(created.cuisine.as_deref(), Some("Sri Lankan"));
    }

    #[test]
    fn test_restaurant_tolerates_missing_attributes() {
        let r: Restaurant = serde_json::from_str(
            r#"{"restaurantId":"r1","name":"Spice Route","location":{"latitude":1.5,"longitude":2.5},"isOpen":true}"#,
        )
        .unwrap();
        assert!(r.is_open);
        assert!(!r.is_verified);
        assert_eq!(r.location, Some(Location::new(1.5, 2.5)));
        assert!(r.email.is_none());
    }
}
