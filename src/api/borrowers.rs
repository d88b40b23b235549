//! Borrower management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        borrower::{CreateBorrower, UpdateBorrowerStatus},
        Borrower, BorrowView,
    },
};

use super::AuthenticatedUser;

/// List borrowers
#[utoipa::path(
    get,
    path = "/borrowers",
    tag = "borrowers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of borrowers", body = Vec<Borrower>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_borrowers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Borrower>>> {
    claims.require_read()?;

    let borrowers = state.services.borrowers.list().await?;
    Ok(Json(borrowers))
}

/// Get borrower by ID
#[utoipa::path(
    get,
    path = "/borrowers/{id}",
    tag = "borrowers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrower ID")
    ),
    responses(
        (status = 200, description = "Borrower details", body = Borrower),
        (status = 404, description = "Borrower not found")
    )
)]
pub async fn get_borrower(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Borrower>> {
    claims.require_read()?;

    let borrower = state.services.borrowers.get_by_id(id).await?;
    Ok(Json(borrower))
}

/// Register a borrower; the school ID is generated
#[utoipa::path(
    post,
    path = "/borrowers",
    tag = "borrowers",
    security(("bearer_auth" = [])),
    request_body = CreateBorrower,
    responses(
        (status = 201, description = "Borrower created", body = Borrower),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin rights required"),
        (status = 409, description = "No unique school ID could be allocated")
    )
)]
pub async fn create_borrower(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateBorrower>,
) -> AppResult<(StatusCode, Json<Borrower>)> {
    claims.require_admin()?;

    let borrower = state.services.borrowers.create(data).await?;
    Ok((StatusCode::CREATED, Json(borrower)))
}

/// Deactivate or reactivate a borrower
#[utoipa::path(
    put,
    path = "/borrowers/{id}/status",
    tag = "borrowers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrower ID")
    ),
    request_body = UpdateBorrowerStatus,
    responses(
        (status = 200, description = "Status updated", body = Borrower),
        (status = 404, description = "Borrower not found")
    )
)]
pub async fn update_borrower_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateBorrowerStatus>,
) -> AppResult<Json<Borrower>> {
    claims.require_admin()?;

    let borrower = state.services.borrowers.set_status(id, data.status).await?;
    Ok(Json(borrower))
}

/// Open borrows of a borrower
#[utoipa::path(
    get,
    path = "/borrowers/{id}/borrows",
    tag = "borrowers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrower ID")
    ),
    responses(
        (status = 200, description = "Borrower's open borrows", body = Vec<BorrowView>),
        (status = 404, description = "Borrower not found")
    )
)]
pub async fn get_borrower_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<BorrowView>>> {
    claims.require_read()?;

    let borrows = state.services.borrows.borrower_borrows(id).await?;
    Ok(Json(borrows))
}
