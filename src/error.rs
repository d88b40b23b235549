//! Error types for Lendtrack server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Numeric error codes returned alongside every error response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchBorrower = 4,
    NoSuchItem = 5,
    NoSuchRoom = 6,
    NoSuchBorrow = 7,
    InsufficientStock = 8,
    AlreadyReturned = 9,
    InvalidBorrowRecord = 10,
    Duplicate = 11,
    BadValue = 12,
    IdGenerationFallback = 13,
}

/// A storage record referenced by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Borrow(i32),
    Item(i32),
    Borrower(i32),
    Room(i32),
    Return(i32),
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Borrow(id) => write!(f, "Borrow {}", id),
            Resource::Item(id) => write!(f, "Item {}", id),
            Resource::Borrower(id) => write!(f, "Borrower {}", id),
            Resource::Room(id) => write!(f, "Room {}", id),
            Resource::Return(id) => write!(f, "Return for borrow {}", id),
        }
    }
}

impl Resource {
    fn code(&self) -> ErrorCode {
        match self {
            Resource::Borrow(_) | Resource::Return(_) => ErrorCode::NoSuchBorrow,
            Resource::Item(_) => ErrorCode::NoSuchItem,
            Resource::Borrower(_) => ErrorCode::NoSuchBorrower,
            Resource::Room(_) => ErrorCode::NoSuchRoom,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("{0} not found")]
    NotFound(Resource),

    #[error("Borrow {borrow_id} has already been returned")]
    AlreadyReturned { borrow_id: i32 },

    #[error("Insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: i32,
        requested: i32,
        available: i32,
    },

    #[error("Borrow {borrow_id} has no {missing} reference")]
    InvalidBorrowRecord {
        borrow_id: i32,
        missing: &'static str,
    },

    #[error("Sequential borrower ID lookup failed ({reason}), substituted {school_id}")]
    GenerationFallback { school_id: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code, message) = match &self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(resource) => (StatusCode::NOT_FOUND, resource.code(), message),
            AppError::AlreadyReturned { .. } => {
                (StatusCode::CONFLICT, ErrorCode::AlreadyReturned, message)
            }
            AppError::InsufficientStock { .. } => {
                (StatusCode::CONFLICT, ErrorCode::InsufficientStock, message)
            }
            AppError::InvalidBorrowRecord { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::InvalidBorrowRecord,
                message,
            ),
            AppError::GenerationFallback { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::IdGenerationFallback,
                message,
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone())
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::Failure, msg.clone())
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
