//! OrdersManager - loads, transitions and stores orders
//!
//! # Action Flow
//!
//! ```text
//! execute(order_id, action, actor)
//!     ├─ 1. Load the stored order
//!     ├─ 2. lifecycle::apply_transition (role, scope, status, claim guard)
//!     ├─ 3. compare_and_swap against the loaded record
//!     └─ 4. Return the replacement, or OrderConflict if someone got there first
//! ```
//!
//! Nothing is retried. A conflict means the caller's view is stale: refresh
//! and decide again.

use std::sync::Arc;

use shared::{AppError, AppResult, ErrorCode, Order};

use super::lifecycle::{self, OrderAction};
use crate::auth::CurrentUser;
use crate::db::{StorageError, StorefrontStore};

#[derive(Clone)]
pub struct OrdersManager {
    store: Arc<dyn StorefrontStore>,
}

impl OrdersManager {
    pub fn new(store: Arc<dyn StorefrontStore>) -> Self {
        Self { store }
    }

    /// Persist a freshly created order
    pub async fn place(&self, order: &Order) -> AppResult<()> {
        self.store
            .insert_order(order)
            .await
            .map_err(|e| storage_failure("insert_order", &order.id, e))?;
        tracing::info!(
            order_id = %order.id,
            restaurant_id = %order.restaurant_id,
            total = order.total,
            "Order placed"
        );
        Ok(())
    }

    /// All stored orders, unfiltered
    pub async fn all(&self) -> AppResult<Vec<Order>> {
        self.store
            .get_orders()
            .await
            .map_err(|e| storage_failure("get_orders", "*", e))
    }

    pub async fn get(&self, order_id: &str) -> AppResult<Order> {
        self.store
            .get_order(order_id)
            .await
            .map_err(|e| storage_failure("get_order", order_id, e))?
            .ok_or_else(|| {
                AppError::new(ErrorCode::OrderNotFound).with_detail("orderId", order_id)
            })
    }

    /// Apply one lifecycle action and store the result atomically
    pub async fn execute(
        &self,
        order_id: &str,
        action: OrderAction,
        actor: &CurrentUser,
    ) -> AppResult<Order> {
        let current = self.get(order_id).await?;

        let next = lifecycle::apply_transition(&current, action, actor).map_err(|e| {
            tracing::debug!(order_id, %action, actor = %actor.id, error = %e, "Transition rejected");
            AppError::from(e)
        })?;

        let swapped = self
            .store
            .compare_and_swap_order(&current, &next)
            .await
            .map_err(|e| storage_failure("compare_and_swap_order", order_id, e))?;

        if !swapped {
            tracing::warn!(order_id, %action, actor = %actor.id, "Order changed concurrently");
            return Err(AppError::new(ErrorCode::OrderConflict).with_detail("orderId", order_id));
        }

        tracing::info!(
            order_id,
            %action,
            from = %current.status,
            to = %next.status,
            actor = %actor.id,
            "Order status updated"
        );
        Ok(next)
    }
}

fn storage_failure(op: &str, order_id: &str, e: StorageError) -> AppError {
    tracing::error!(op, order_id, error = %e, "Order storage failed");
    AppError::from(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RedbStore;
    use crate::orders::test_support::{courier_of, manager_of, order_fixture};
    use shared::order::OrderStatus;

    fn manager() -> OrdersManager {
        OrdersManager::new(Arc::new(RedbStore::open_in_memory().unwrap()))
    }

    #[tokio::test]
    async fn test_execute_persists_transition() {
        let orders = manager();
        orders
            .place(&order_fixture("A1", "1", OrderStatus::Pending))
            .await
            .unwrap();

        let next = orders
            .execute("A1", OrderAction::Accept, &manager_of("1"))
            .await
            .unwrap();
        assert_eq!(next.status, OrderStatus::Preparing);
        assert_eq!(orders.get("A1").await.unwrap().status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn test_rejected_transition_leaves_store_untouched() {
        let orders = manager();
        orders
            .place(&order_fixture("A1", "1", OrderStatus::Pending))
            .await
            .unwrap();

        let err = orders
            .execute("A1", OrderAction::Complete, &manager_of("1"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
        assert_eq!(orders.get("A1").await.unwrap().status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_second_claim_rejected() {
        let orders = manager();
        orders
            .place(&order_fixture("A1", "1", OrderStatus::Ready))
            .await
            .unwrap();

        orders
            .execute("A1", OrderAction::Claim, &courier_of("x", &["1"]))
            .await
            .unwrap();
        let err = orders
            .execute("A1", OrderAction::Claim, &courier_of("y", &["1"]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderAlreadyClaimed);
        assert_eq!(
            orders.get("A1").await.unwrap().courier_id.as_deref(),
            Some("x")
        );
    }

    #[tokio::test]
    async fn test_concurrent_claims_have_one_winner() {
        let orders = manager();
        orders
            .place(&order_fixture("A1", "1", OrderStatus::Ready))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for id in ["c1", "c2", "c3", "c4"] {
            let orders = orders.clone();
            handles.push(tokio::spawn(async move {
                orders
                    .execute("A1", OrderAction::Claim, &courier_of(id, &["1"]))
                    .await
            }));
        }
        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(e) => assert!(matches!(
                    e.code,
                    ErrorCode::OrderAlreadyClaimed | ErrorCode::OrderConflict
                )),
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let err = manager()
            .execute("NOPE", OrderAction::Accept, &manager_of("1"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
    }
}
