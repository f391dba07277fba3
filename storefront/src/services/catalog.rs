//! 目录浏览
//!
//! Read-only views over the cached restaurants: the home listing, the
//! customer menu and the per-store card badges.

use chrono::NaiveDateTime;
use serde::Serialize;
use shared::models::{ALL_CATEGORY_ID, GlobalSettings, MenuItem, Restaurant};

use crate::core::StorefrontState;
use crate::hours;
use crate::orders::money::format_brl;

/// Active restaurants in `category_id`; the `all` sentinel disables the filter
pub fn browse<'a>(restaurants: &'a [Restaurant], category_id: &str) -> Vec<&'a Restaurant> {
    restaurants
        .iter()
        .filter(|r| r.is_active())
        .filter(|r| category_id == ALL_CATEGORY_ID || r.category == category_id)
        .collect()
}

/// Menu as the customer sees it
pub fn customer_menu(restaurant: &Restaurant) -> Vec<&MenuItem> {
    restaurant.visible_menu().collect()
}

/// Display name of a category id, the id itself when unknown
pub fn category_name(settings: &GlobalSettings, category_id: &str) -> String {
    settings
        .category(category_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| category_id.to_string())
}

/// "Entrega Grátis" badge: no fee at all, open, and not a ride service
pub fn has_free_delivery(restaurant: &Restaurant, now: NaiveDateTime) -> bool {
    is_fee_free(restaurant) && !restaurant.is_taxi() && hours::is_open_at(restaurant, now)
}

fn is_fee_free(restaurant: &Restaurant) -> bool {
    restaurant.delivery_fee == 0.0 && restaurant.price_per_km == Some(0.0)
}

/// Everything a listing card shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCard {
    pub id: String,
    pub name: String,
    /// Vehicle model for rides, category name otherwise
    pub subtitle: String,
    pub delivery_time: String,
    pub rating: f64,
    pub is_open: bool,
    pub free_delivery: bool,
    pub fee_text: String,
}

impl RestaurantCard {
    pub fn build(restaurant: &Restaurant, settings: &GlobalSettings, now: NaiveDateTime) -> Self {
        let subtitle = match &restaurant.vehicle_model {
            Some(model) if restaurant.is_taxi() && !model.is_empty() => model.clone(),
            _ => category_name(settings, &restaurant.category),
        };
        let fee_text = if is_fee_free(restaurant) {
            if restaurant.is_taxi() {
                "Preço por Viagem".to_string()
            } else {
                "Grátis".to_string()
            }
        } else {
            format!("A partir de {}", format_brl(restaurant.delivery_fee))
        };
        Self {
            id: restaurant.id.clone(),
            name: restaurant.name.clone(),
            subtitle,
            delivery_time: restaurant.delivery_time.clone(),
            rating: restaurant.rating,
            is_open: hours::is_open_at(restaurant, now),
            free_delivery: has_free_delivery(restaurant, now),
            fee_text,
        }
    }
}

impl StorefrontState {
    /// Home listing for the selected category, evaluated at the current local time
    pub fn home_cards(&self, category_id: &str) -> Vec<RestaurantCard> {
        let snapshot = self.snapshot();
        let now = self.now();
        browse(&snapshot.restaurants, category_id)
            .into_iter()
            .map(|r| RestaurantCard::build(r, &snapshot.settings, now))
            .collect()
    }
}
