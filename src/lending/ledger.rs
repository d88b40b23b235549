//! Stock arithmetic for an item's `raw_stock`

use crate::error::{AppError, AppResult};

/// Quantities moved by a borrow or a return are strictly positive
pub fn validate_quantity(quantity: i32) -> AppResult<()> {
    if quantity < 1 {
        return Err(AppError::Validation(format!(
            "Quantity must be at least 1, got {}",
            quantity
        )));
    }
    Ok(())
}

/// Stock after lending `quantity` units
pub fn debit(item_id: i32, available: i32, quantity: i32) -> AppResult<i32> {
    validate_quantity(quantity)?;
    if available < quantity {
        return Err(AppError::InsufficientStock {
            item_id,
            requested: quantity,
            available,
        });
    }
    Ok(available - quantity)
}

/// Stock after taking back `quantity` units
pub fn credit(item_id: i32, available: i32, quantity: i32) -> AppResult<i32> {
    validate_quantity(quantity)?;
    available.checked_add(quantity).ok_or_else(|| {
        AppError::Internal(format!("Stock overflow on item {}", item_id))
    })
}

/// Signed movement: negative deltas debit, positive deltas credit
pub fn adjust(item_id: i32, available: i32, delta: i32) -> AppResult<i32> {
    if delta < 0 {
        debit(item_id, available, delta.checked_neg().unwrap_or(i32::MAX))
    } else {
        credit(item_id, available, delta)
    }
}
