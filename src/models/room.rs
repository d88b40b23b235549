//! Room model and occupancy projection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{borrower::BorrowerShort, enums::RecordStatus, item::ItemShort, Borrow};

/// Room model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Room {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: RecordStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Create room request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRoom {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

/// Open borrow joined with its item and borrower, as read from storage
#[derive(Debug, Clone)]
pub struct OccupiedSlot {
    pub borrow: Borrow,
    pub item: ItemShort,
    pub borrower: BorrowerShort,
}

/// An item currently held in a room through an open borrow
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomItem {
    pub borrow_id: i32,
    pub quantity: i32,
    pub date_borrowed: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub purpose: Option<String>,
    pub item: ItemShort,
    pub borrower: BorrowerShort,
    pub is_overdue: bool,
    pub days_overdue: i64,
}
