//! Borrow (transaction) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::BorrowStatus;
use crate::lending::lifecycle;

/// Borrow model from database
///
/// References are nullable at the storage level; a borrow missing its
/// borrower or item is rejected when it is returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrow {
    pub id: i32,
    pub borrower_id: Option<i32>,
    pub item_id: Option<i32>,
    pub room_id: Option<i32>,
    pub quantity: i32,
    pub date_borrowed: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub date_returned: Option<DateTime<Utc>>,
    pub status: BorrowStatus,
    pub purpose: Option<String>,
    pub notes: Option<String>,
}

/// Borrow with overdue state derived at read time
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowView {
    #[serde(flatten)]
    pub borrow: Borrow,
    pub is_overdue: bool,
    pub days_overdue: i64,
}

/// Create borrow request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBorrow {
    pub borrower_id: i32,
    pub item_id: i32,
    pub room_id: Option<i32>,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub due_date: DateTime<Utc>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
}

/// Borrow row ready for insertion
#[derive(Debug, Clone)]
pub struct NewBorrow {
    pub borrower_id: i32,
    pub item_id: i32,
    pub room_id: Option<i32>,
    pub quantity: i32,
    pub date_borrowed: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
}

/// Borrow list filter
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BorrowQuery {
    pub status: Option<BorrowStatus>,
    pub borrower_id: Option<i32>,
    pub item_id: Option<i32>,
    pub room_id: Option<i32>,
    /// Only open borrows past their due date
    #[serde(default)]
    pub overdue_only: bool,
}

impl BorrowQuery {
    /// Stored-column part of the filter (overdue is applied afterwards)
    ///
    /// The status filter follows the lifecycle, so a borrow carrying a
    /// return date counts as returned.
    pub fn matches(&self, borrow: &Borrow) -> bool {
        self.status.map_or(true, |s| match s {
            BorrowStatus::Borrowed => lifecycle::is_open(borrow),
            BorrowStatus::Returned => !lifecycle::is_open(borrow),
        })
            && self.borrower_id.map_or(true, |id| borrow.borrower_id == Some(id))
            && self.item_id.map_or(true, |id| borrow.item_id == Some(id))
            && self.room_id.map_or(true, |id| borrow.room_id == Some(id))
    }
}

/// Borrow counters
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowStats {
    pub active: i64,
    pub overdue: i64,
}
