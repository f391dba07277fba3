//! 看板 - store, courier and customer views over the order collection
//!
//! Dashboards are read on demand (manual refresh). Each entry carries the
//! viewer-specific label and the buttons the viewer may press right now.

use serde::Serialize;
use shared::Order;

use crate::auth::gate::{self, CourierBoard};
use crate::auth::{CurrentUser, permissions};
use crate::core::StorefrontState;
use crate::hours;
use crate::orders::OrderAction;
use crate::orders::labels::{StatusLabel, Viewer, action_label, status_label};
use crate::orders::lifecycle::available_actions;
use crate::utils::{AppError, AppResult, ErrorCode};

/// A button on an order card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionButton {
    pub action: OrderAction,
    pub label: &'static str,
}

/// An order as one viewer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderEntry {
    pub order: Order,
    pub status: StatusLabel,
    pub actions: Vec<ActionButton>,
}

impl OrderEntry {
    pub fn build(order: Order, viewer: Viewer, actor: Option<&CurrentUser>) -> Self {
        let actions = match actor {
            Some(actor) => available_actions(&order, actor)
                .into_iter()
                .map(|action| ActionButton {
                    action,
                    label: action_label(action, order.service),
                })
                .collect(),
            None => Vec::new(),
        };
        Self {
            status: status_label(&order, viewer),
            order,
            actions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDashboard {
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub is_open: bool,
    pub orders: Vec<OrderEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourierDashboard {
    pub available: Vec<OrderEntry>,
    pub active: Vec<OrderEntry>,
}

fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

impl StorefrontState {
    /// Orders of one store, newest first (admin or that store's manager)
    pub async fn store_dashboard(
        &self,
        actor: Option<&CurrentUser>,
        restaurant_id: &str,
    ) -> AppResult<StoreDashboard> {
        gate::require_permission(actor, permissions::ORDERS_MANAGE)?;
        let user = gate::require_user(actor)?;
        gate::require_restaurant_scope(user, restaurant_id)?;
        let restaurant = self.restaurant(restaurant_id).ok_or_else(|| {
            AppError::new(ErrorCode::RestaurantNotFound).with_detail("restaurantId", restaurant_id)
        })?;

        let mut orders: Vec<Order> = self
            .orders
            .all()
            .await?
            .into_iter()
            .filter(|o| o.restaurant_id == restaurant_id)
            .collect();
        newest_first(&mut orders);

        Ok(StoreDashboard {
            is_open: hours::is_open_at(&restaurant, self.now()),
            restaurant_id: restaurant.id,
            restaurant_name: restaurant.name,
            orders: orders
                .into_iter()
                .map(|o| OrderEntry::build(o, Viewer::Store, Some(user)))
                .collect(),
        })
    }

    /// Available and active lists for a courier
    pub async fn courier_dashboard(&self, actor: Option<&CurrentUser>) -> AppResult<CourierDashboard> {
        gate::require_permission(actor, permissions::ORDERS_CLAIM)?;
        let courier = gate::require_user(actor)?;
        if !courier.is_courier() {
            return Err(AppError::new(ErrorCode::RoleRequired).with_detail("role", "courier"));
        }

        let orders = self.orders.all().await?;
        let board = CourierBoard::build(courier, &orders);
        let entries = |list: Vec<Order>| -> Vec<OrderEntry> {
            list.into_iter()
                .map(|o| OrderEntry::build(o, Viewer::Courier, Some(courier)))
                .collect()
        };
        Ok(CourierDashboard {
            available: entries(board.available),
            active: entries(board.active),
        })
    }

    /// The signed-in customer's own orders, newest first
    pub async fn customer_history(&self, actor: Option<&CurrentUser>) -> AppResult<Vec<OrderEntry>> {
        let user = gate::require_user(actor)?;
        let all = self.orders.all().await?;
        let mut orders: Vec<Order> = gate::visible_orders(actor, &all)
            .into_iter()
            .filter(|o| o.customer_id == user.id)
            .cloned()
            .collect();
        newest_first(&mut orders);
        Ok(orders
            .into_iter()
            .map(|o| OrderEntry::build(o, Viewer::Customer, None))
            .collect())
    }

    /// Press a dashboard button
    pub async fn advance_order(
        &self,
        actor: Option<&CurrentUser>,
        order_id: &str,
        action: OrderAction,
    ) -> AppResult<Order> {
        let user = gate::require_user(actor)?;
        self.orders.execute(order_id, action, user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::test_support::memory_state;
    use crate::orders::test_support::{admin, courier_of, customer, manager_of, order_fixture};
    use shared::OrderStatus;
    use shared::order::OrderType;

    async fn seeded() -> StorefrontState {
        let state = memory_state().await;
        let mut older = order_fixture("OLD001", "1", OrderStatus::Pending);
        older.timestamp = 10;
        let mut newer = order_fixture("NEW001", "1", OrderStatus::Ready);
        newer.timestamp = 20;
        let mut elsewhere = order_fixture("OTH001", "2", OrderStatus::Pending);
        elsewhere.customer_id = "u2".into();
        for o in [older, newer, elsewhere] {
            state.orders.place(&o).await.unwrap();
        }
        state
    }

    #[tokio::test]
    async fn test_store_dashboard() {
        let state = seeded().await;
        let board = state.store_dashboard(Some(&manager_of("1")), "1").await.unwrap();
        let ids: Vec<&str> = board.orders.iter().map(|e| e.order.id.as_str()).collect();
        assert_eq!(ids, vec!["NEW001", "OLD001"]);

        let pending = &board.orders[1];
        assert_eq!(pending.status.label, "Pendente");
        let actions: Vec<OrderAction> = pending.actions.iter().map(|b| b.action).collect();
        assert_eq!(actions, vec![OrderAction::Accept, OrderAction::Cancel]);

        let err = state.store_dashboard(Some(&manager_of("2")), "1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RestaurantScopeRequired);
        let err = state
            .store_dashboard(Some(&customer("u1")), "1")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert!(state.store_dashboard(Some(&admin()), "1").await.is_ok());
    }

    #[tokio::test]
    async fn test_courier_dashboard_claim_flow() {
        let state = seeded().await;
        let courier = courier_of("c1", &["1"]);
        let board = state.courier_dashboard(Some(&courier)).await.unwrap();
        assert_eq!(board.available.len(), 1);
        assert_eq!(board.available[0].order.id, "NEW001");
        assert!(board.active.is_empty());

        state
            .advance_order(Some(&courier), "NEW001", OrderAction::Claim)
            .await
            .unwrap();
        let board = state.courier_dashboard(Some(&courier)).await.unwrap();
        assert!(board.available.is_empty());
        assert_eq!(board.active[0].order.status, OrderStatus::HeadingToPickup);
        assert_eq!(board.active[0].actions[0].action, OrderAction::ConfirmPickup);

        let err = state.courier_dashboard(Some(&admin())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
    }

    #[tokio::test]
    async fn test_customer_history() {
        let state = seeded().await;
        let mut pickup = order_fixture("PIK001", "1", OrderStatus::Ready);
        pickup.order_type = OrderType::Pickup;
        pickup.timestamp = 30;
        state.orders.place(&pickup).await.unwrap();

        let history = state.customer_history(Some(&customer("u1"))).await.unwrap();
        let ids: Vec<&str> = history.iter().map(|e| e.order.id.as_str()).collect();
        assert_eq!(ids, vec!["PIK001", "NEW001", "OLD001"]);
        assert_eq!(history[0].status.label, "Pronto p/ Retirada");
        assert!(history.iter().all(|e| e.actions.is_empty()));

        let err = state.customer_history(None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }
}
