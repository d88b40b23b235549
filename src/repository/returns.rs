//! Returns repository for database operations

use sqlx::{Pool, Postgres};

use super::items;
use crate::{
    error::{AppError, AppResult, Resource},
    lending::ReturnSettlement,
    models::{enums::BorrowStatus, ReturnRecord},
};

#[derive(Clone)]
pub struct ReturnsRepository {
    pool: Pool<Postgres>,
}

impl ReturnsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Close the borrow, record the return and credit stock in one transaction.
    ///
    /// The close is a conditional update on `date_returned IS NULL`: of two
    /// concurrent returns on one borrow, the second finds no row to update
    /// and fails with `AlreadyReturned` after the first commits.
    pub async fn apply(&self, settlement: &ReturnSettlement) -> AppResult<ReturnRecord> {
        let mut tx = self.pool.begin().await?;

        let closed: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE borrows SET status = $1, date_returned = $2
            WHERE id = $3 AND status = $4 AND date_returned IS NULL
            RETURNING id
            "#,
        )
        .bind(BorrowStatus::Returned)
        .bind(settlement.returned_at)
        .bind(settlement.borrow_id)
        .bind(BorrowStatus::Borrowed)
        .fetch_optional(&mut *tx)
        .await?;

        if closed.is_none() {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM borrows WHERE id = $1)")
                .bind(settlement.borrow_id)
                .fetch_one(&mut *tx)
                .await?;
            return Err(if exists {
                AppError::AlreadyReturned {
                    borrow_id: settlement.borrow_id,
                }
            } else {
                AppError::NotFound(Resource::Borrow(settlement.borrow_id))
            });
        }

        let record = sqlx::query_as::<_, ReturnRecord>(
            r#"
            INSERT INTO returns (borrow_id, borrower_id, item_id, room_id, quantity, condition,
                                 notes, late_fee, damage_fee, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(settlement.borrow_id)
        .bind(settlement.borrower_id)
        .bind(settlement.item_id)
        .bind(settlement.room_id)
        .bind(settlement.quantity)
        .bind(&settlement.condition)
        .bind(&settlement.notes)
        .bind(settlement.late_fee)
        .bind(settlement.damage_fee)
        .bind(settlement.returned_at)
        .fetch_one(&mut *tx)
        .await?;

        items::adjust_stock(&mut *tx, settlement.item_id, settlement.quantity).await?;

        tx.commit().await?;
        Ok(record)
    }

    /// Return record of a borrow, if any
    pub async fn get_by_borrow(&self, borrow_id: i32) -> AppResult<Option<ReturnRecord>> {
        let record = sqlx::query_as::<_, ReturnRecord>("SELECT * FROM returns WHERE borrow_id = $1")
            .bind(borrow_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    /// All return records, newest first
    pub async fn list(&self) -> AppResult<Vec<ReturnRecord>> {
        let records =
            sqlx::query_as::<_, ReturnRecord>("SELECT * FROM returns ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(records)
    }
}
