//! Order status state machine
//!
//! ```text
//! pending ──accept──▶ preparing ──mark_ready──▶ ready ──claim──▶ heading_to_pickup
//!    │                    │                       │                   │ confirm_pickup
//!    │                    │                       │ (pickup)          ▼
//!    └──────cancel────────┴───────cancel──────────┤ complete      delivering
//!                                                 ▼                   │ complete
//!                                             completed ◀─────────────┘
//! ```
//!
//! Store staff (admin, or the manager of the order's restaurant) drive the
//! kitchen half and may cancel until a courier takes the order. Couriers
//! drive the road half; only the assigned courier can advance a claimed
//! order. Ride orders share the graph but are claimable only while `pending`.
//!
//! [`apply_transition`] never mutates its input: on success it returns the
//! replacement order, on failure the stored order is untouched.

use serde::{Deserialize, Serialize};
use shared::order::{OrderStatus, OrderType};
use shared::{AppError, ErrorCode, Order};
use thiserror::Error;

use crate::auth::CurrentUser;
use crate::auth::permissions;

/// 订单操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    /// pending → preparing
    Accept,
    /// preparing → ready
    MarkReady,
    /// courier self-assigns: → heading_to_pickup
    Claim,
    /// heading_to_pickup → delivering
    ConfirmPickup,
    /// ready (pickup) → completed, delivering → completed
    Complete,
    /// pending | preparing | ready → cancelled
    Cancel,
}

impl OrderAction {
    pub const ALL: [OrderAction; 6] = [
        OrderAction::Accept,
        OrderAction::MarkReady,
        OrderAction::Claim,
        OrderAction::ConfirmPickup,
        OrderAction::Complete,
        OrderAction::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Accept => "accept",
            OrderAction::MarkReady => "mark_ready",
            OrderAction::Claim => "claim",
            OrderAction::ConfirmPickup => "confirm_pickup",
            OrderAction::Complete => "complete",
            OrderAction::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Cannot {action} an order in status {from}")]
    InvalidTransition {
        from: OrderStatus,
        action: OrderAction,
    },

    #[error("Order already completed: {0}")]
    AlreadyCompleted(String),

    #[error("Order already cancelled: {0}")]
    AlreadyCancelled(String),

    #[error("Role '{role}' cannot {action} orders")]
    NotPermitted { role: String, action: OrderAction },

    #[error("Order {order_id} belongs to restaurant {restaurant_id}")]
    OutOfScope {
        order_id: String,
        restaurant_id: String,
    },

    #[error("Order {order_id} already claimed by {courier_id}")]
    AlreadyClaimed {
        order_id: String,
        courier_id: String,
    },

    #[error("Order {0} is assigned to another courier")]
    NotAssigned(String),
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        let code = match &err {
            LifecycleError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            LifecycleError::AlreadyCompleted(_) => ErrorCode::OrderAlreadyCompleted,
            LifecycleError::AlreadyCancelled(_) => ErrorCode::OrderAlreadyCancelled,
            LifecycleError::NotPermitted { .. } => ErrorCode::PermissionDenied,
            LifecycleError::OutOfScope { .. } => ErrorCode::RestaurantScopeRequired,
            LifecycleError::AlreadyClaimed { .. } => ErrorCode::OrderAlreadyClaimed,
            LifecycleError::NotAssigned(_) => ErrorCode::CourierNotAssigned,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Unassigned delivery order in a status its service kind lets couriers claim
pub fn is_claimable(order: &Order) -> bool {
    !order.is_claimed()
        && order.order_type == OrderType::Delivery
        && order.service.claimable_from().contains(&order.status)
}

/// Validate and apply one action, returning the replacement order
pub fn apply_transition(
    order: &Order,
    action: OrderAction,
    actor: &CurrentUser,
) -> Result<Order, LifecycleError> {
    check_terminal(order)?;
    check_actor(order, action, actor)?;
    let status = next_status(order, action)?;

    let mut next = order.clone();
    next.status = status;
    if action == OrderAction::Claim {
        next.courier_id = Some(actor.id.clone());
        next.courier_name = Some(actor.name.clone());
    }
    Ok(next)
}

/// Actions the actor can currently perform on the order
pub fn available_actions(order: &Order, actor: &CurrentUser) -> Vec<OrderAction> {
    OrderAction::ALL
        .into_iter()
        .filter(|a| apply_transition(order, *a, actor).is_ok())
        .collect()
}

fn check_terminal(order: &Order) -> Result<(), LifecycleError> {
    match order.status {
        OrderStatus::Completed => Err(LifecycleError::AlreadyCompleted(order.id.clone())),
        OrderStatus::Cancelled => Err(LifecycleError::AlreadyCancelled(order.id.clone())),
        _ => Ok(()),
    }
}

fn check_actor(order: &Order, action: OrderAction, actor: &CurrentUser) -> Result<(), LifecycleError> {
    match action {
        OrderAction::Accept | OrderAction::MarkReady | OrderAction::Cancel => {
            check_store_staff(order, action, actor)
        }
        OrderAction::Complete if order.status == OrderStatus::Delivering => {
            check_assigned_courier(order, action, actor)
        }
        OrderAction::Complete => check_store_staff(order, action, actor),
        OrderAction::ConfirmPickup => check_assigned_courier(order, action, actor),
        OrderAction::Claim => {
            require(actor, permissions::ORDERS_CLAIM, action)?;
            if !actor.serves_restaurant(&order.restaurant_id) {
                return Err(out_of_scope(order));
            }
            // 抢单互斥：已有骑手则拒绝
            if let Some(courier_id) = &order.courier_id {
                return Err(LifecycleError::AlreadyClaimed {
                    order_id: order.id.clone(),
                    courier_id: courier_id.clone(),
                });
            }
            Ok(())
        }
    }
}

fn check_store_staff(
    order: &Order,
    action: OrderAction,
    actor: &CurrentUser,
) -> Result<(), LifecycleError> {
    require(actor, permissions::ORDERS_MANAGE, action)?;
    if actor.is_admin() || actor.manages_restaurant(&order.restaurant_id) {
        Ok(())
    } else {
        Err(out_of_scope(order))
    }
}

fn check_assigned_courier(
    order: &Order,
    action: OrderAction,
    actor: &CurrentUser,
) -> Result<(), LifecycleError> {
    require(actor, permissions::ORDERS_DELIVER, action)?;
    if order.is_assigned_to(&actor.id) {
        Ok(())
    } else {
        Err(LifecycleError::NotAssigned(order.id.clone()))
    }
}

fn require(actor: &CurrentUser, permission: &str, action: OrderAction) -> Result<(), LifecycleError> {
    // admin 的 "*" 会覆盖 claim/deliver，骑手动作必须是骑手本人
    let courier_only = permission == permissions::ORDERS_CLAIM || permission == permissions::ORDERS_DELIVER;
    if (courier_only && !actor.is_courier()) || !actor.has_permission(permission) {
        return Err(LifecycleError::NotPermitted {
            role: actor.role.to_string(),
            action,
        });
    }
    Ok(())
}

fn out_of_scope(order: &Order) -> LifecycleError {
    LifecycleError::OutOfScope {
        order_id: order.id.clone(),
        restaurant_id: order.restaurant_id.clone(),
    }
}

fn next_status(order: &Order, action: OrderAction) -> Result<OrderStatus, LifecycleError> {
    let next = match (action, order.status) {
        (OrderAction::Accept, OrderStatus::Pending) => Some(OrderStatus::Preparing),
        (OrderAction::MarkReady, OrderStatus::Preparing) => Some(OrderStatus::Ready),
        (OrderAction::Claim, _) if is_claimable(order) => Some(OrderStatus::HeadingToPickup),
        (OrderAction::ConfirmPickup, OrderStatus::HeadingToPickup) => Some(OrderStatus::Delivering),
        (OrderAction::Complete, OrderStatus::Ready) if order.order_type == OrderType::Pickup => {
            Some(OrderStatus::Completed)
        }
        (OrderAction::Complete, OrderStatus::Delivering) => Some(OrderStatus::Completed),
        (OrderAction::Cancel, s) if s.is_cancellable() => Some(OrderStatus::Cancelled),
        _ => None,
    };
    next.ok_or(LifecycleError::InvalidTransition {
        from: order.status,
        action,
    })
}
