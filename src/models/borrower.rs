//! Borrower model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{BorrowerType, RecordStatus};

/// Borrower model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrower {
    pub id: i32,
    /// Generated `<PREFIX>-<YEAR>-<SEQ>` identifier
    pub school_id: String,
    pub firstname: String,
    pub lastname: String,
    pub gender: Option<String>,
    pub contact: Option<String>,
    pub department: Option<String>,
    pub year_section: Option<String>,
    pub borrower_type: BorrowerType,
    /// Hashed legacy password (argon2)
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub status: RecordStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Borrower {
    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Active
    }
}

/// Short borrower representation embedded in borrow views
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowerShort {
    pub id: i32,
    pub school_id: String,
    pub firstname: String,
    pub lastname: String,
    pub borrower_type: BorrowerType,
}

impl From<&Borrower> for BorrowerShort {
    fn from(b: &Borrower) -> Self {
        BorrowerShort {
            id: b.id,
            school_id: b.school_id.clone(),
            firstname: b.firstname.clone(),
            lastname: b.lastname.clone(),
            borrower_type: b.borrower_type,
        }
    }
}

/// Create borrower request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBorrower {
    /// Defaults to student
    pub borrower_type: Option<BorrowerType>,
    #[validate(length(min = 1, max = 100))]
    pub firstname: String,
    #[validate(length(min = 1, max = 100))]
    pub lastname: String,
    pub gender: Option<String>,
    pub contact: Option<String>,
    pub department: Option<String>,
    pub year_section: Option<String>,
    /// Optional legacy password, stored hashed
    #[validate(length(min = 4))]
    pub password: Option<String>,
}

/// Borrower row ready for insertion, school ID already generated
#[derive(Debug, Clone)]
pub struct NewBorrower {
    pub school_id: String,
    pub borrower_type: BorrowerType,
    pub firstname: String,
    pub lastname: String,
    pub gender: Option<String>,
    pub contact: Option<String>,
    pub department: Option<String>,
    pub year_section: Option<String>,
    pub password_hash: Option<String>,
}

/// Update borrower status request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBorrowerStatus {
    pub status: RecordStatus,
}
