//! Unified error codes for the storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors (restaurants, menus, categories)
//! - 8xxx: Account errors (users, addresses)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so a front end can match
/// on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Username already registered
    UsernameTaken = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Record belongs to another restaurant
    RestaurantScopeRequired = 2006,
    /// Delivery fee can only be changed by an administrator
    DeliveryFeeLocked = 2007,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been completed
    OrderAlreadyCompleted = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,
    /// Cart or order is empty
    OrderEmpty = 4007,
    /// Status transition not allowed from the current state
    InvalidTransition = 4010,
    /// Another courier already claimed the order
    OrderAlreadyClaimed = 4011,
    /// Action requires the courier assigned to the order
    CourierNotAssigned = 4012,
    /// Order changed in the store since it was read
    OrderConflict = 4013,
    /// Delivery order without a delivery address
    AddressRequired = 4014,
    /// No payment method selected
    PaymentMethodRequired = 4015,
    /// Subtotal below the configured minimum order value
    BelowMinimumOrder = 4016,
    /// Restaurant is closed at checkout time
    RestaurantClosed = 4017,

    // ==================== 6xxx: Catalog ====================
    /// Restaurant not found
    RestaurantNotFound = 6001,
    /// Menu item not found
    MenuItemNotFound = 6002,
    /// Restaurant is deactivated
    RestaurantInactive = 6003,
    /// Category not found
    CategoryNotFound = 6004,
    /// The "all" category cannot be edited or deleted
    CategoryProtected = 6005,
    /// Category name already exists
    CategoryNameExists = 6006,

    // ==================== 8xxx: Account ====================
    /// User not found
    UserNotFound = 8001,
    /// Address not found
    AddressNotFound = 8002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Storage backend unavailable
    StorageUnavailable = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::UsernameTaken => "Username is already taken",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::RestaurantScopeRequired => "Record belongs to another restaurant",
            ErrorCode::DeliveryFeeLocked => "Only administrators can change the delivery fee",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::InvalidTransition => "Status transition is not allowed",
            ErrorCode::OrderAlreadyClaimed => "Order was already claimed by a courier",
            ErrorCode::CourierNotAssigned => "Only the assigned courier can do this",
            ErrorCode::OrderConflict => "Order was changed by someone else, refresh and retry",
            ErrorCode::AddressRequired => "Delivery address is required",
            ErrorCode::PaymentMethodRequired => "Payment method is required",
            ErrorCode::BelowMinimumOrder => "Order is below the minimum value",
            ErrorCode::RestaurantClosed => "Restaurant is closed",

            // Catalog
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::RestaurantInactive => "Restaurant is not active",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryProtected => "This category cannot be changed",
            ErrorCode::CategoryNameExists => "Category name already exists",

            // Account
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::AddressNotFound => "Address not found",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::StorageUnavailable => "Storage is unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1008 => Ok(ErrorCode::UsernameTaken),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2006 => Ok(ErrorCode::RestaurantScopeRequired),
            2007 => Ok(ErrorCode::DeliveryFeeLocked),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4003 => Ok(ErrorCode::OrderAlreadyCompleted),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4007 => Ok(ErrorCode::OrderEmpty),
            4010 => Ok(ErrorCode::InvalidTransition),
            4011 => Ok(ErrorCode::OrderAlreadyClaimed),
            4012 => Ok(ErrorCode::CourierNotAssigned),
            4013 => Ok(ErrorCode::OrderConflict),
            4014 => Ok(ErrorCode::AddressRequired),
            4015 => Ok(ErrorCode::PaymentMethodRequired),
            4016 => Ok(ErrorCode::BelowMinimumOrder),
            4017 => Ok(ErrorCode::RestaurantClosed),

            // Catalog
            6001 => Ok(ErrorCode::RestaurantNotFound),
            6002 => Ok(ErrorCode::MenuItemNotFound),
            6003 => Ok(ErrorCode::RestaurantInactive),
            6004 => Ok(ErrorCode::CategoryNotFound),
            6005 => Ok(ErrorCode::CategoryProtected),
            6006 => Ok(ErrorCode::CategoryNameExists),

            // Account
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::AddressNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::StorageUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::DeliveryFeeLocked.code(), 2007);
        assert_eq!(ErrorCode::OrderAlreadyClaimed.code(), 4011);
        assert_eq!(ErrorCode::CategoryProtected.code(), 6005);
        assert_eq!(ErrorCode::AddressNotFound.code(), 8002);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(4010), Ok(ErrorCode::InvalidTransition));
        assert_eq!(ErrorCode::try_from(1008), Ok(ErrorCode::UsernameTaken));
        assert_eq!(ErrorCode::try_from(9003), Ok(ErrorCode::StorageUnavailable));
        assert_eq!(ErrorCode::try_from(1), Err(InvalidErrorCode(1)));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(3001), Err(InvalidErrorCode(3001)));
        assert_eq!(
            format!("{}", InvalidErrorCode(999)),
            "invalid error code: 999"
        );
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderConflict).unwrap();
        assert_eq!(json, "4013");
        let parsed: ErrorCode = serde_json::from_str("4013").unwrap();
        assert_eq!(parsed, ErrorCode::OrderConflict);
        assert!(serde_json::from_str::<ErrorCode>("4242").is_err());
    }
}
