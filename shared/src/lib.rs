//! Shared types for the Volpony storefront
//!
//! Domain records (restaurants, menus, users, orders, settings), the unified
//! error system and small utilities used by the storefront core and by any
//! front end that renders it.

pub mod error;
pub mod models;
pub mod order;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use order::{CustomerAddress, Order, OrderStatus, OrderType, PaymentMethod, ServiceKind};
