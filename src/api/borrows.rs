//! Borrow, return and borrow statistics endpoints

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::{BorrowQuery, BorrowStats, CreateBorrow},
        return_record::ReturnDetails,
        BorrowView, ReturnRecord,
    },
};

use super::AuthenticatedUser;

/// List borrows
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(BorrowQuery),
    responses(
        (status = 200, description = "Matching borrows", body = Vec<BorrowView>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BorrowQuery>,
) -> AppResult<Json<Vec<BorrowView>>> {
    claims.require_read()?;

    let borrows = state.services.borrows.list(&query).await?;
    Ok(Json(borrows))
}

/// Get borrow by ID
#[utoipa::path(
    get,
    path = "/borrows/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow ID")
    ),
    responses(
        (status = 200, description = "Borrow details", body = BorrowView),
        (status = 404, description = "Borrow not found")
    )
)]
pub async fn get_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowView>> {
    claims.require_read()?;

    let borrow = state.services.borrows.get_by_id(id).await?;
    Ok(Json(borrow))
}

/// Lend an item
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = CreateBorrow,
    responses(
        (status = 201, description = "Borrow created", body = BorrowView),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Borrower, item or room not found"),
        (status = 409, description = "Insufficient stock")
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBorrow>,
) -> AppResult<(StatusCode, Json<BorrowView>)> {
    claims.require_write_borrows()?;

    let borrow = state.services.borrows.create_borrow(data).await?;
    Ok((StatusCode::CREATED, Json(borrow)))
}

/// Return a borrowed item
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow ID")
    ),
    request_body(content = ReturnDetails, description = "Optional return details"),
    responses(
        (status = 201, description = "Item returned", body = ReturnRecord),
        (status = 400, description = "Malformed return details"),
        (status = 404, description = "Borrow not found"),
        (status = 409, description = "Already returned"),
        (status = 422, description = "Borrow record is missing its borrower or item")
    )
)]
pub async fn return_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<ReturnRecord>)> {
    claims.require_write_borrows()?;

    let details = parse_return_details(&body)?;
    let record = state.services.returns.record_return(id, details).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Return record of a borrow
#[utoipa::path(
    get,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow ID")
    ),
    responses(
        (status = 200, description = "Return record", body = ReturnRecord),
        (status = 404, description = "Borrow has not been returned")
    )
)]
pub async fn get_borrow_return(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ReturnRecord>> {
    claims.require_read()?;

    let record = state.services.returns.get_for_borrow(id).await?;
    Ok(Json(record))
}

/// List return records, newest first
#[utoipa::path(
    get,
    path = "/returns",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Return records", body = Vec<ReturnRecord>)
    )
)]
pub async fn list_returns(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ReturnRecord>>> {
    claims.require_read()?;

    let records = state.services.returns.list().await?;
    Ok(Json(records))
}

/// Count open and overdue borrows
#[utoipa::path(
    get,
    path = "/stats/borrows",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrow counters", body = BorrowStats)
    )
)]
pub async fn get_borrow_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<BorrowStats>> {
    claims.require_read()?;

    let stats = state.services.borrows.stats().await?;
    Ok(Json(stats))
}

/// An empty body means default details; anything else must be valid JSON
fn parse_return_details(body: &[u8]) -> AppResult<ReturnDetails> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReturnDetails::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid return details: {}", e)))
}
