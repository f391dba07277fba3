//! 订单模块
//!
//! - [`lifecycle`]: status state machine and who may trigger each step
//! - [`labels`]: per-viewer status labels
//! - [`money`]: decimal pricing
//! - [`manager`]: load → transition → compare-and-set

pub mod labels;
pub mod lifecycle;
pub mod manager;
pub mod money;

#[cfg(test)]
pub(crate) mod test_support;

pub use lifecycle::{LifecycleError, OrderAction, apply_transition, available_actions};
pub use manager::OrdersManager;
pub use money::CartTotals;
