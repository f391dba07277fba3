//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: restaurant, menu item, category, user display name
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions (menu items, trip descriptions)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: username, phone, house number, emoji icon
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords
pub const MAX_PASSWORD_LEN: usize = 128;

/// Street / neighborhood / city
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a money amount: finite and non-negative.
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::with_message(
            shared::ErrorCode::ValueOutOfRange,
            format!("{field} must be a non-negative number, got {value}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}
