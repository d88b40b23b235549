//! Turning a return request into a validated settlement
//!
//! A settlement is everything storage needs to close a borrow atomically:
//! the snapshot of the borrow's references, the resolved defaults and the
//! return instant.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::lifecycle;
use crate::{
    error::{AppError, AppResult},
    models::{return_record::ReturnDetails, Borrow, ReturnRecord},
};

pub const DEFAULT_CONDITION: &str = "Good";

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSettlement {
    pub borrow_id: i32,
    pub borrower_id: i32,
    pub item_id: i32,
    pub room_id: Option<i32>,
    pub quantity: i32,
    pub condition: String,
    pub notes: Option<String>,
    pub late_fee: Decimal,
    pub damage_fee: Decimal,
    pub returned_at: DateTime<Utc>,
}

impl ReturnSettlement {
    /// Materialise the return record under the id assigned by storage
    pub fn into_record(self, id: i32) -> ReturnRecord {
        ReturnRecord {
            id,
            borrow_id: self.borrow_id,
            borrower_id: self.borrower_id,
            item_id: self.item_id,
            room_id: self.room_id,
            quantity: self.quantity,
            condition: self.condition,
            notes: self.notes,
            late_fee: self.late_fee,
            damage_fee: self.damage_fee,
            created_at: self.returned_at,
            updated_at: self.returned_at,
        }
    }
}

fn zero_fee() -> Decimal {
    Decimal::new(0, 2)
}

/// Fees are stored as NUMERIC(10,2)
const FEE_SCALE: u32 = 2;

fn fee_ceiling() -> Decimal {
    Decimal::new(100_000_000, 0)
}

fn validate_fee(name: &str, fee: Option<Decimal>) -> AppResult<Decimal> {
    match fee {
        None => Ok(zero_fee()),
        Some(fee) if fee.is_sign_negative() && !fee.is_zero() => Err(AppError::Validation(
            format!("{} must not be negative, got {}", name, fee),
        )),
        Some(fee) if fee.normalize().scale() > FEE_SCALE => Err(AppError::Validation(format!(
            "{} must have at most {} decimal places, got {}",
            name, FEE_SCALE, fee
        ))),
        Some(fee) if fee >= fee_ceiling() => Err(AppError::Validation(format!(
            "{} must be below {}, got {}",
            name,
            fee_ceiling(),
            fee
        ))),
        Some(fee) => Ok(fee),
    }
}

/// Guard, validate and default a return against the borrow as currently stored
pub fn settle(
    borrow: &Borrow,
    details: ReturnDetails,
    returned_at: DateTime<Utc>,
) -> AppResult<ReturnSettlement> {
    if !lifecycle::is_open(borrow) {
        return Err(AppError::AlreadyReturned {
            borrow_id: borrow.id,
        });
    }

    let borrower_id = borrow.borrower_id.ok_or(AppError::InvalidBorrowRecord {
        borrow_id: borrow.id,
        missing: "borrower",
    })?;
    let item_id = borrow.item_id.ok_or(AppError::InvalidBorrowRecord {
        borrow_id: borrow.id,
        missing: "item",
    })?;

    let quantity = details.quantity.unwrap_or(borrow.quantity);
    if quantity < 1 || quantity > borrow.quantity {
        return Err(AppError::Validation(format!(
            "Returned quantity must be between 1 and {}, got {}",
            borrow.quantity, quantity
        )));
    }

    let condition = details
        .condition
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CONDITION.to_string());

    Ok(ReturnSettlement {
        borrow_id: borrow.id,
        borrower_id,
        item_id,
        room_id: borrow.room_id,
        quantity,
        condition,
        notes: details.notes,
        late_fee: validate_fee("late_fee", details.late_fee)?,
        damage_fee: validate_fee("damage_fee", details.damage_fee)?,
        returned_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::BorrowStatus;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap()
    }

    fn borrow() -> Borrow {
        Borrow {
            id: 12,
            borrower_id: Some(4),
            item_id: Some(8),
            room_id: Some(2),
            quantity: 3,
            date_borrowed: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            due_date: Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap(),
            date_returned: None,
            status: BorrowStatus::Borrowed,
            purpose: Some("Lab".to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_defaults() {
        let s = settle(&borrow(), ReturnDetails::default(), now()).unwrap();
        assert_eq!(s.quantity, 3);
        assert_eq!(s.condition, "Good");
        assert_eq!(s.late_fee, dec!(0.00));
        assert_eq!(s.damage_fee, dec!(0.00));
        assert_eq!(s.late_fee.to_string(), "0.00");
        assert_eq!((s.borrower_id, s.item_id, s.room_id), (4, 8, Some(2)));
    }

    #[test]
    fn test_blank_condition_defaults_to_good() {
        let details = ReturnDetails {
            condition: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(settle(&borrow(), details, now()).unwrap().condition, "Good");
    }

    #[test]
    fn test_explicit_values_are_kept() {
        let details = ReturnDetails {
            quantity: Some(2),
            condition: Some("Damaged".to_string()),
            notes: Some("cracked screen".to_string()),
            late_fee: Some(dec!(15.50)),
            damage_fee: Some(dec!(200)),
        };
        let s = settle(&borrow(), details, now()).unwrap();
        assert_eq!(s.quantity, 2);
        assert_eq!(s.condition, "Damaged");
        assert_eq!(s.late_fee, dec!(15.50));
        assert_eq!(s.damage_fee, dec!(200));

        let record = s.into_record(1);
        assert_eq!(record.borrow_id, 12);
        assert_eq!(record.created_at, now());
    }

    #[test]
    fn test_closed_borrow_is_rejected() {
        let mut b = borrow();
        b.status = BorrowStatus::Returned;
        b.date_returned = Some(now());
        let err = settle(&b, ReturnDetails::default(), now()).unwrap_err();
        assert!(matches!(err, AppError::AlreadyReturned { borrow_id: 12 }));
    }

    #[test]
    fn test_missing_references_are_rejected() {
        let mut b = borrow();
        b.borrower_id = None;
        let err = settle(&b, ReturnDetails::default(), now()).unwrap_err();
        assert!(matches!(err, AppError::InvalidBorrowRecord { missing: "borrower", .. }));

        let mut b = borrow();
        b.item_id = None;
        let err = settle(&b, ReturnDetails::default(), now()).unwrap_err();
        assert!(matches!(err, AppError::InvalidBorrowRecord { missing: "item", .. }));
    }

    #[test]
    fn test_invalid_quantity_and_fees() {
        let too_many = ReturnDetails {
            quantity: Some(4),
            ..Default::default()
        };
        assert!(matches!(settle(&borrow(), too_many, now()), Err(AppError::Validation(_))));

        let negative = ReturnDetails {
            damage_fee: Some(dec!(-1)),
            ..Default::default()
        };
        assert!(matches!(settle(&borrow(), negative, now()), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_fees_must_fit_the_stored_precision() {
        for fee in [dec!(0.001), dec!(12.345), dec!(100000000), dec!(123456789.00)] {
            let details = ReturnDetails {
                late_fee: Some(fee),
                ..Default::default()
            };
            assert!(
                matches!(settle(&borrow(), details, now()), Err(AppError::Validation(_))),
                "{} should be rejected",
                fee
            );
        }

        let details = ReturnDetails {
            late_fee: Some(dec!(99999999.99)),
            damage_fee: Some(dec!(2.500)),
            ..Default::default()
        };
        let s = settle(&borrow(), details, now()).unwrap();
        assert_eq!(s.late_fee, dec!(99999999.99));
        assert_eq!(s.damage_fee, dec!(2.5));
    }
}
