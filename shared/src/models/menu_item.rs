//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item, embedded in exactly one restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in BRL, never negative
    pub price: f64,
    /// Image URL or inline data URI
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popular: Option<bool>,
    /// `Some(false)` hides the item from customer menus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl MenuItem {
    /// Visible in customer-facing menus (absent flag counts as active)
    pub fn is_visible(&self) -> bool {
        self.active != Some(false)
    }
}

/// Partial update payload for a menu item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub popular: Option<bool>,
    pub active: Option<bool>,
}
