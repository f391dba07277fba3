//! Order Module
//!
//! - [`OrderStatus`]: lifecycle states shared by food and ride orders
//! - [`ServiceKind`]: food delivery vs ride, with the vocabulary each uses
//! - [`CustomerAddress`]: pickup or an address snapshot
//! - [`Order`]: the immutable snapshot created at checkout

pub mod snapshot;
pub mod status;
pub mod types;

// Re-exports
pub use snapshot::Order;
pub use status::OrderStatus;
pub use types::*;
