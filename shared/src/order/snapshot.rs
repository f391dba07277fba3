//! Order snapshot
//!
//! Created once at checkout. Afterwards only `status`, `courier_id` and
//! `courier_name` change; item lines and the address are copies that later
//! menu or address-book edits never touch.

use super::status::OrderStatus;
use super::types::{CartItem, CustomerAddress, OrderType, ServiceKind};
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Short uppercase code shown to customers
    pub id: String,
    pub customer_name: String,
    pub customer_address: CustomerAddress,
    pub items: Vec<CartItem>,
    pub total: f64,
    /// Fee charged at checkout (0 for pickup)
    #[serde(default)]
    pub delivery_fee: f64,
    /// Unix millis
    pub timestamp: Timestamp,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub order_type: OrderType,
    pub payment_method: String,
    pub status: OrderStatus,
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_distance: Option<f64>,
    #[serde(default)]
    pub service: ServiceKind,
}

impl Order {
    pub fn is_claimed(&self) -> bool {
        self.courier_id.is_some()
    }

    pub fn is_assigned_to(&self, courier_id: &str) -> bool {
        self.courier_id.as_deref() == Some(courier_id)
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
