//! Menu Model

use serde::{Deserialize, Serialize};

/// Menu entry offered by a restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub menu_id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub restaurant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn default_available() -> bool {
    true
}

impl MenuEntry {
    pub fn new(menu_id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            menu_id: menu_id.into(),
            name: name.into(),
            price,
            available: true,
            restaurant_id: String::new(),
            description: None,
            image_url: None,
        }
    }
}

/// Editable fields of a menu entry, sent on create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDraft {
    pub name: String,
    pub price: f64,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub restaurant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl MenuDraft {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            available: true,
            restaurant_id: String::new(),
            description: None,
            image_url: None,
        }
    }

    pub fn for_restaurant(mut self, restaurant_id: impl Into<String>) -> Self {
        self.restaurant_id = restaurant_id.into();
        self
    }
}

impl From<&MenuEntry> for MenuDraft {
    fn from(entry: &MenuEntry) -> Self {
        Self {
            name: entry.name.clone(),
            price: entry.price,
            available: entry.available,
            restaurant_id: entry.restaurant_id.clone(),
            description: entry.description.clone(),
            image_url: entry.image_url.clone(),
        }
    }
}
