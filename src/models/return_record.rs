//! Return record model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Immutable record of how a borrow concluded
///
/// Borrower, item and room references are copied from the borrow when the
/// return is recorded; they are a snapshot, not a join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReturnRecord {
    pub id: i32,
    pub borrow_id: i32,
    pub borrower_id: i32,
    pub item_id: i32,
    pub room_id: Option<i32>,
    pub quantity: i32,
    pub condition: String,
    pub notes: Option<String>,
    #[schema(value_type = String)]
    pub late_fee: Decimal,
    #[schema(value_type = String)]
    pub damage_fee: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Return request; every field is optional
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ReturnDetails {
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    #[validate(length(max = 64))]
    pub condition: Option<String>,
    pub notes: Option<String>,
    #[schema(value_type = Option<String>)]
    pub late_fee: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub damage_fee: Option<Decimal>,
}
