//! 订单转发 - receipt text and the WhatsApp deep-link
//!
//! Hand-off is fire-and-forget: the link is produced for the front end to
//! open, nothing is sent from here and nothing is retried.

use reqwest::Url;
use shared::Order;
use shared::models::Restaurant;
use shared::order::OrderType;

use crate::orders::money::{self, format_brl};
use crate::utils::{AppError, AppResult, ErrorCode};

const DEEP_LINK_BASE: &str = "https://wa.me/";
const SEPARATOR: &str = "----------------------------";

/// Fixed-format order receipt
pub fn render_receipt(order: &Order) -> String {
    let items = order
        .items
        .iter()
        .map(|i| {
            format!(
                "• {}x {} - {}",
                i.quantity,
                i.item.name,
                format_brl(money::to_f64(money::line_total(i)))
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let delivery_line = match order.order_type {
        OrderType::Delivery => format!("Taxa Entrega: {}", format_brl(order.delivery_fee)),
        OrderType::Pickup => "Retirada na Loja".to_string(),
    };
    let order_type = match order.order_type {
        OrderType::Delivery => "🛵 Entrega",
        OrderType::Pickup => "🥡 Retirada",
    };

    [
        "*VOLPONY DELIVERY* 🍃".to_string(),
        SEPARATOR.to_string(),
        format!("*PEDIDO:* #{}", order.id),
        format!("*LOJA:* {}", order.restaurant_name),
        SEPARATOR.to_string(),
        format!("*CLIENTE:* {}", order.customer_name),
        format!("*TIPO:* {}", order_type),
        format!("*ENDEREÇO:* {}", order.customer_address.describe()),
        SEPARATOR.to_string(),
        "*ITENS:*".to_string(),
        items,
        SEPARATOR.to_string(),
        delivery_line,
        format!("*TOTAL:* {}", format_brl(order.total)),
        SEPARATOR.to_string(),
        format!("*PAGAMENTO:* {}", order.payment_method),
        SEPARATOR.to_string(),
        "_Pedido feito via Volpony Delivery_".to_string(),
    ]
    .join("\n")
}

/// wa.me link to `phone` with `text` prefilled
pub fn deep_link(phone: &str, text: &str) -> AppResult<Url> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(AppError::required("whatsappNumber"));
    }
    Url::parse_with_params(&format!("{DEEP_LINK_BASE}{digits}"), &[("text", text)])
        .map_err(|e| AppError::with_message(ErrorCode::InvalidFormat, e.to_string()))
}

/// Deep-link sending the receipt of `order` to the restaurant's number
pub fn order_link(order: &Order, restaurant: &Restaurant) -> AppResult<Url> {
    let phone = restaurant.whatsapp_number.as_deref().unwrap_or_default();
    let link = deep_link(phone, &render_receipt(order)).inspect_err(|_| {
        tracing::warn!(
            order_id = %order.id,
            restaurant_id = %restaurant.id,
            "Restaurant has no WhatsApp number, order cannot be handed off"
        );
    })?;
    tracing::debug!(order_id = %order.id, restaurant_id = %restaurant.id, "Hand-off link built");
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed;
    use crate::orders::test_support::{menu_item, order_fixture};
    use shared::models::Address;
    use shared::order::{CartItem, CustomerAddress};
    use shared::OrderStatus;

    fn delivery_order() -> Order {
        let mut order = order_fixture("AB12CD", "1", OrderStatus::Pending);
        order.items.push(CartItem {
            item: menu_item("b2", 18.0),
            quantity: 2,
            restaurant_id: "1".into(),
            restaurant_name: "Volpony Burguer".into(),
        });
        order.total = 66.0;
        order.customer_address = CustomerAddress::Delivery {
            snapshot: Address {
                id: "a1".into(),
                label: "Casa".into(),
                street: "Rua A".into(),
                number: "10".into(),
                neighborhood: "Centro".into(),
                city: "Volpony City".into(),
                complement: None,
                is_default: Some(true),
            },
        };
        order
    }

    #[test]
    fn test_receipt_delivery() {
        let receipt = render_receipt(&delivery_order());
        assert!(receipt.starts_with("*VOLPONY DELIVERY* 🍃\n"));
        assert!(receipt.contains("*PEDIDO:* #AB12CD"));
        assert!(receipt.contains("*TIPO:* 🛵 Entrega"));
        assert!(receipt.contains("*ENDEREÇO:* Rua A, 10 - Centro"));
        assert!(receipt.contains("• 1x Item b1 - R$ 25.00\n• 2x Item b2 - R$ 36.00"));
        assert!(receipt.contains("Taxa Entrega: R$ 5.00"));
        assert!(receipt.contains("*TOTAL:* R$ 66.00"));
        assert!(receipt.contains("*PAGAMENTO:* PIX"));
        assert!(receipt.ends_with("_Pedido feito via Volpony Delivery_"));
    }

    #[test]
    fn test_receipt_pickup() {
        let mut order = order_fixture("AB12CD", "1", OrderStatus::Pending);
        order.order_type = OrderType::Pickup;
        let receipt = render_receipt(&order);
        assert!(receipt.contains("*TIPO:* 🥡 Retirada"));
        assert!(receipt.contains("*ENDEREÇO:* Retirada na Loja"));
        assert!(!receipt.contains("Taxa Entrega"));
    }

    #[test]
    fn test_deep_link_encodes_text() {
        let url = deep_link("+55 (98) 91234-5678", "*TOTAL:* R$ 5.00\nok").unwrap();
        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/5598912345678");
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "text");
        assert_eq!(value, "*TOTAL:* R$ 5.00\nok");
    }

    #[test]
    fn test_order_link_needs_number() {
        let mut restaurant = seed::default_restaurants().remove(0);
        let order = delivery_order();
        assert!(order_link(&order, &restaurant).is_ok());

        restaurant.whatsapp_number = None;
        let err = order_link(&order, &restaurant).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
    }
}
