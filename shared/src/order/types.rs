//! Shared types for orders

use crate::models::{Address, MenuItem, Restaurant, TAXI_CATEGORY_ID};
use serde::{Deserialize, Serialize};

use super::status::OrderStatus;

// ============================================================================
// Order Type
// ============================================================================

/// 配送方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// 外送
    #[default]
    Delivery,
    /// 到店自取
    Pickup,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Delivery => "delivery",
            OrderType::Pickup => "pickup",
        }
    }
}

// ============================================================================
// Payment Method
// ============================================================================

/// 支付方式, settled outside the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Dinheiro")]
    Cash,
    #[serde(rename = "Cartão")]
    Card,
    #[serde(rename = "PIX")]
    Pix,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Pix];

    /// Text stored on the order and shown on the receipt
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Card => "Cartão",
            PaymentMethod::Pix => "PIX",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == label)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Service Kind
// ============================================================================

/// 服务类型: food orders go through the kitchen, ride orders skip it
///
/// Both kinds share the same status graph. The kind decides which statuses a
/// courier may claim from and which words the labels use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    #[default]
    Food,
    Ride,
}

impl ServiceKind {
    pub fn from_category(category: &str) -> Self {
        if category == TAXI_CATEGORY_ID {
            ServiceKind::Ride
        } else {
            ServiceKind::Food
        }
    }

    pub fn of(restaurant: &Restaurant) -> Self {
        Self::from_category(&restaurant.category)
    }

    /// Statuses from which a courier can claim an unassigned order.
    /// Rides have no kitchen phase: only a `pending` ride is offered to couriers.
    pub fn claimable_from(&self) -> &'static [OrderStatus] {
        match self {
            ServiceKind::Food => &[OrderStatus::Ready],
            ServiceKind::Ride => &[OrderStatus::Pending],
        }
    }

    /// "Cliente" / "Passageiro"
    pub fn party_noun(&self) -> &'static str {
        match self {
            ServiceKind::Food => "Cliente",
            ServiceKind::Ride => "Passageiro",
        }
    }
}

// ============================================================================
// Customer Address
// ============================================================================

/// Where the order goes: collected at the store or delivered to a snapshot
/// of the customer's address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CustomerAddress {
    Pickup,
    Delivery { snapshot: Address },
}

impl CustomerAddress {
    pub const PICKUP_TEXT: &'static str = "Retirada na Loja";

    /// Human-readable destination
    pub fn describe(&self) -> String {
        match self {
            CustomerAddress::Pickup => Self::PICKUP_TEXT.to_string(),
            CustomerAddress::Delivery { snapshot } => snapshot.one_line(),
        }
    }

    pub fn order_type(&self) -> OrderType {
        match self {
            CustomerAddress::Pickup => OrderType::Pickup,
            CustomerAddress::Delivery { .. } => OrderType::Delivery,
        }
    }
}

// ============================================================================
// Cart Item
// ============================================================================

/// Menu item placed in a cart, copied into the order at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub item: MenuItem,
    /// Always >= 1 while in a cart
    pub quantity: u32,
    pub restaurant_id: String,
    pub restaurant_name: String,
}

impl CartItem {
    pub fn new(item: MenuItem, restaurant: &Restaurant) -> Self {
        Self {
            item,
            quantity: 1,
            restaurant_id: restaurant.id.clone(),
            restaurant_name: restaurant.name.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_kind() {
        assert_eq!(ServiceKind::from_category("taxi"), ServiceKind::Ride);
        assert_eq!(ServiceKind::from_category("pizza"), ServiceKind::Food);
        assert_eq!(ServiceKind::Ride.party_noun(), "Passageiro");
        assert!(ServiceKind::Ride.claimable_from().contains(&OrderStatus::Pending));
        assert!(!ServiceKind::Food.claimable_from().contains(&OrderStatus::Pending));
        assert!(!ServiceKind::Ride.claimable_from().contains(&OrderStatus::Ready));
    }

    #[test]
    fn test_payment_method_labels() {
        assert_eq!(serde_json::to_value(PaymentMethod::Card).unwrap(), "Cartão");
        assert_eq!(PaymentMethod::from_label("PIX"), Some(PaymentMethod::Pix));
        assert_eq!(PaymentMethod::from_label("Boleto"), None);
    }

    #[test]
    fn test_customer_address_tagged() {
        let pickup = serde_json::to_value(CustomerAddress::Pickup).unwrap();
        assert_eq!(pickup, serde_json::json!({"kind": "pickup"}));

        let json = r#"{"kind":"delivery","snapshot":{"id":"a","label":"Casa",
            "street":"Rua A","number":"1","neighborhood":"Centro","city":"Volpony City"}}"#;
        let addr: CustomerAddress = serde_json::from_str(json).unwrap();
        assert_eq!(addr.order_type(), OrderType::Delivery);
        assert_eq!(addr.describe(), "Rua A, 1 - Centro");
        assert_eq!(CustomerAddress::Pickup.describe(), "Retirada na Loja");
    }

    #[test]
    fn test_cart_item_flattens_menu_item() {
        let item = MenuItem {
            id: "b1".into(),
            name: "Volpony Classic".into(),
            description: String::new(),
            price: 25.0,
            image: String::new(),
            popular: Some(true),
            active: None,
        };
        let cart_item = CartItem {
            item,
            quantity: 2,
            restaurant_id: "1".into(),
            restaurant_name: "Volpony Burguer".into(),
        };
        let json = serde_json::to_value(&cart_item).unwrap();
        assert_eq!(json["id"], "b1");
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["restaurantId"], "1");
        let back: CartItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart_item);
    }
}
