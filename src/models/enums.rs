//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// BorrowerType
// ---------------------------------------------------------------------------

/// Borrower category, also the partition key of school ID sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum BorrowerType {
    Student = 1,
    Faculty = 2,
    Staff = 3,
}

impl BorrowerType {
    /// Three-letter prefix used in generated school IDs
    pub fn prefix(self) -> &'static str {
        match self {
            BorrowerType::Student => "STU",
            BorrowerType::Faculty => "FAC",
            BorrowerType::Staff => "STA",
        }
    }
}

impl Default for BorrowerType {
    fn default() -> Self {
        BorrowerType::Student
    }
}

impl From<Option<BorrowerType>> for BorrowerType {
    fn from(v: Option<BorrowerType>) -> Self {
        v.unwrap_or_default()
    }
}

impl std::fmt::Display for BorrowerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BorrowerType::Student => "Student",
            BorrowerType::Faculty => "Faculty",
            BorrowerType::Staff => "Staff",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// RecordStatus
// ---------------------------------------------------------------------------

/// Soft-delete flag for borrowers and rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum RecordStatus {
    Inactive = 0,
    Active = 1,
}

impl Default for RecordStatus {
    fn default() -> Self {
        RecordStatus::Active
    }
}

// ---------------------------------------------------------------------------
// ItemStatus
// ---------------------------------------------------------------------------

/// Physical lifecycle tag of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum ItemStatus {
    New = 1,
    Old = 2,
    Damaged = 3,
    Lost = 4,
}

impl Default for ItemStatus {
    fn default() -> Self {
        ItemStatus::New
    }
}

// ---------------------------------------------------------------------------
// BorrowStatus
// ---------------------------------------------------------------------------

/// Stored borrow status. Overdue is derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum BorrowStatus {
    Borrowed = 1,
    Returned = 2,
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role of an authenticated staff caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Faculty,
    Staff,
}
