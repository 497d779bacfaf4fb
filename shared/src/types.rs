//! Common identifier types
//!
//! The backend issues opaque string ids for every resource.

/// Order identifier
pub type OrderId = String;

/// Restaurant identifier
pub type RestaurantId = String;

/// Menu entry identifier
pub type MenuId = String;

/// Owner (user) identifier
pub type UserId = String;
