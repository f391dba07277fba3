//! 结账
//!
//! ```text
//! confirm_order(app)
//!     ├─ 1. cart / address / payment checks (no I/O)
//!     ├─ 2. store checks: exists, active, open now, minimum order
//!     ├─ 3. snapshot cart + address into an Order
//!     └─ 4. insert into the order collection
//! ```
//!
//! The session state is not touched here; the caller reduces
//! `AppAction::OrderPlaced` with the returned order.

use chrono::NaiveDateTime;
use shared::models::{GlobalSettings, Restaurant};
use shared::order::{CustomerAddress, OrderType, ServiceKind};
use shared::util::{now_millis, short_code};
use shared::{Order, OrderStatus};

use crate::auth::{CurrentUser, gate, permissions};
use crate::core::{AppState, StorefrontState};
use crate::hours;
use crate::utils::{AppError, AppResult, ErrorCode};

pub const ORDER_CODE_LEN: usize = 6;
pub const GUEST_CUSTOMER_ID: &str = "guest";
pub const GUEST_CUSTOMER_NAME: &str = "Cliente";

const MAX_CODE_ATTEMPTS: usize = 3;

/// Build the order snapshot for `app` against `restaurant` at `now`.
/// The id is left empty for the caller to assign.
pub fn build_order(
    app: &AppState,
    restaurant: &Restaurant,
    settings: &GlobalSettings,
    now: NaiveDateTime,
) -> AppResult<Order> {
    if app.cart.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    let service = ServiceKind::of(restaurant);
    // 网约车没有到店自取
    let order_type = match service {
        ServiceKind::Ride => OrderType::Delivery,
        ServiceKind::Food => app.order_type,
    };

    let customer_address = match order_type {
        OrderType::Pickup => CustomerAddress::Pickup,
        OrderType::Delivery => match &app.selected_address {
            Some(address) => CustomerAddress::Delivery {
                snapshot: address.clone(),
            },
            None => {
                return Err(AppError::with_message(
                    ErrorCode::AddressRequired,
                    "Por favor, selecione um endereço para entrega.",
                ));
            }
        },
    };

    let payment_method = app.payment_method.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::PaymentMethodRequired,
            "Selecione a forma de pagamento.",
        )
    })?;

    if !restaurant.is_active() {
        return Err(AppError::new(ErrorCode::RestaurantInactive)
            .with_detail("restaurantId", restaurant.id.as_str()));
    }
    if !hours::is_open_at(restaurant, now) {
        return Err(AppError::new(ErrorCode::RestaurantClosed)
            .with_detail("restaurantId", restaurant.id.as_str()));
    }
    if app.cart.restaurant_id() != Some(restaurant.id.as_str()) {
        return Err(AppError::validation("Cart belongs to another store")
            .with_detail("restaurantId", restaurant.id.as_str()));
    }

    let totals = app.cart.totals(order_type, restaurant.delivery_fee);
    if settings.min_order_value > 0.0 && totals.subtotal < settings.min_order_value {
        return Err(AppError::new(ErrorCode::BelowMinimumOrder)
            .with_detail("minOrderValue", settings.min_order_value)
            .with_detail("subtotal", totals.subtotal));
    }

    let (customer_id, customer_name) = match &app.current_user {
        Some(user) => (user.id.clone(), user.name.clone()),
        None => (GUEST_CUSTOMER_ID.to_string(), GUEST_CUSTOMER_NAME.to_string()),
    };

    Ok(Order {
        id: String::new(),
        customer_name,
        customer_address,
        items: app.cart.snapshot(),
        total: totals.total,
        delivery_fee: totals.delivery_fee,
        timestamp: now_millis(),
        restaurant_id: restaurant.id.clone(),
        restaurant_name: restaurant.name.clone(),
        order_type,
        payment_method: payment_method.label().to_string(),
        status: OrderStatus::Pending,
        customer_id,
        courier_id: None,
        courier_name: None,
        delivery_distance: None,
        service,
    })
}

impl StorefrontState {
    /// Validate the session's checkout choices and store the new order
    pub async fn confirm_order(&self, app: &AppState) -> AppResult<Order> {
        let actor = app.current_user.as_ref().map(CurrentUser::from);
        gate::require_permission(actor.as_ref(), permissions::ORDERS_CREATE)?;

        let restaurant_id = app
            .active_restaurant_id()
            .ok_or_else(|| AppError::new(ErrorCode::OrderEmpty))?;
        let restaurant = self.restaurant(restaurant_id).ok_or_else(|| {
            AppError::new(ErrorCode::RestaurantNotFound).with_detail("restaurantId", restaurant_id)
        })?;

        let mut order = build_order(app, &restaurant, &self.settings(), self.now())?;

        // 短码可能撞号, 换一个再试
        let mut attempt = 0;
        loop {
            attempt += 1;
            order.id = short_code(ORDER_CODE_LEN);
            match self.orders.place(&order).await {
                Ok(()) => return Ok(order),
                Err(e) if e.code == ErrorCode::AlreadyExists && attempt < MAX_CODE_ATTEMPTS => {
                    tracing::debug!(order_id = %order.id, "Order code taken, drawing another");
                }
                Err(e) => return Err(e),
            }
        }
    }
}
