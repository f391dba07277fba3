//! Restaurant Model
//!
//! A restaurant owns its menu. Ride-hailing establishments reuse the same
//! record with category `taxi`; their single menu item describes a trip.

use super::category::TAXI_CATEGORY_ID;
use super::menu_item::MenuItem;
use serde::{Deserialize, Serialize};

/// Every weekday, 0 = Sunday .. 6 = Saturday
pub const ALL_WEEKDAYS: [u8; 7] = [0, 1, 2, 3, 4, 5, 6];

/// Restaurant entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub rating: f64,
    /// Free text, e.g. "20-40 min"
    pub delivery_time: String,
    pub delivery_fee: f64,
    /// First shift, "HH:MM"
    #[serde(default)]
    pub opening_time: String,
    #[serde(default)]
    pub closing_time: String,
    /// Optional second shift
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_time2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_time2: Option<String>,
    /// Weekday allow-list, absent means every day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_days: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_model: Option<String>,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl Restaurant {
    pub fn is_taxi(&self) -> bool {
        self.category == TAXI_CATEGORY_ID
    }

    /// Absent flag counts as active
    pub fn is_active(&self) -> bool {
        self.active != Some(false)
    }

    /// Weekdays the restaurant operates on, defaulting to the whole week
    pub fn operating_days_or_all(&self) -> Vec<u8> {
        match &self.operating_days {
            Some(days) => days.clone(),
            None => ALL_WEEKDAYS.to_vec(),
        }
    }

    pub fn has_second_shift(&self) -> bool {
        self.opening_time2.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn menu_item(&self, item_id: &str) -> Option<&MenuItem> {
        self.menu.iter().find(|i| i.id == item_id)
    }

    /// Menu as customers see it (inactive items hidden)
    pub fn visible_menu(&self) -> impl Iterator<Item = &MenuItem> {
        self.menu.iter().filter(|i| i.is_visible())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant(json: &str) -> Restaurant {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let r = restaurant(
            r#"{"id":"1","name":"Volpony Burguer","rating":4.9,"deliveryTime":"20-40 min",
                "deliveryFee":5.0,"openingTime":"18:00","closingTime":"23:59",
                "category":"snacks","image":"","menu":[]}"#,
        );
        assert!(r.is_active());
        assert!(!r.is_taxi());
        assert!(!r.has_second_shift());
        assert_eq!(r.operating_days_or_all(), ALL_WEEKDAYS.to_vec());
    }

    #[test]
    fn test_visible_menu_hides_inactive() {
        let r = restaurant(
            r#"{"id":"1","name":"X","rating":5,"deliveryTime":"","deliveryFee":0,
                "category":"taxi","menu":[
                  {"id":"a","name":"A","description":"","price":1.0},
                  {"id":"b","name":"B","description":"","price":2.0,"active":false}
                ]}"#,
        );
        assert!(r.is_taxi());
        let names: Vec<_> = r.visible_menu().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
        assert!(r.menu_item("b").is_some());
    }

    #[test]
    fn test_serializes_camel_case() {
        let r = restaurant(
            r#"{"id":"1","name":"X","rating":5,"deliveryTime":"","deliveryFee":0,
                "category":"snacks","whatsappNumber":"5598"}"#,
        );
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["whatsappNumber"], "5598");
        assert_eq!(json["deliveryFee"], 0.0);
        assert!(json.get("operatingDays").is_none());
    }
}
