//! Borrows repository for database operations

use sqlx::{Pool, Postgres, Row};

use super::items;
use crate::{
    error::{AppError, AppResult, Resource},
    models::{
        borrow::{Borrow, BorrowQuery, NewBorrow},
        borrower::BorrowerShort,
        enums::BorrowStatus,
        item::ItemShort,
        room::OccupiedSlot,
    },
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrow> {
        sqlx::query_as::<_, Borrow>("SELECT * FROM borrows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound(Resource::Borrow(id)))
    }

    /// List borrows matching the stored-column filters
    pub async fn list(&self, query: &BorrowQuery) -> AppResult<Vec<Borrow>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        macro_rules! add_condition {
            ($field:expr, $column:expr) => {
                if $field.is_some() {
                    conditions.push(format!("{} = ${}", $column, idx));
                    idx += 1;
                }
            };
        }

        // A return date closes a borrow whatever its stored status says
        if let Some(status) = query.status {
            conditions.push(match status {
                BorrowStatus::Borrowed => format!("(status = ${} AND date_returned IS NULL)", idx),
                BorrowStatus::Returned => format!("(status = ${} OR date_returned IS NOT NULL)", idx),
            });
            idx += 1;
        }
        add_condition!(query.borrower_id, "borrower_id");
        add_condition!(query.item_id, "item_id");
        add_condition!(query.room_id, "room_id");

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT * FROM borrows {} ORDER BY due_date, id",
            where_clause
        );

        let mut builder = sqlx::query_as::<_, Borrow>(&sql);
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }
        if let Some(borrower_id) = query.borrower_id {
            builder = builder.bind(borrower_id);
        }
        if let Some(item_id) = query.item_id {
            builder = builder.bind(item_id);
        }
        if let Some(room_id) = query.room_id {
            builder = builder.bind(room_id);
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Debit stock and insert an open borrow in one transaction
    pub async fn open(&self, data: &NewBorrow) -> AppResult<Borrow> {
        let mut tx = self.pool.begin().await?;

        items::adjust_stock(&mut *tx, data.item_id, -data.quantity).await?;

        let borrow = sqlx::query_as::<_, Borrow>(
            r#"
            INSERT INTO borrows (borrower_id, item_id, room_id, quantity, date_borrowed,
                                 due_date, date_returned, status, purpose, notes)
            VALUES ($1, $2, $3, $4, $5, $6, NULL, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(data.borrower_id)
        .bind(data.item_id)
        .bind(data.room_id)
        .bind(data.quantity)
        .bind(data.date_borrowed)
        .bind(data.due_date)
        .bind(BorrowStatus::Borrowed)
        .bind(&data.purpose)
        .bind(&data.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(borrow)
    }

    /// Open borrows in a room joined with item and borrower
    pub async fn room_occupancy(&self, room_id: i32) -> AppResult<Vec<OccupiedSlot>> {
        let rows = sqlx::query(
            r#"
            SELECT b.*,
                   i.device_tag, i.model, i.category, i.raw_stock,
                   br.school_id, br.firstname, br.lastname, br.borrower_type
            FROM borrows b
            JOIN items i ON b.item_id = i.id
            JOIN borrowers br ON b.borrower_id = br.id
            WHERE b.room_id = $1 AND b.status = $2 AND b.date_returned IS NULL
            ORDER BY b.due_date, b.id
            "#,
        )
        .bind(room_id)
        .bind(BorrowStatus::Borrowed)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let item_id: i32 = row.try_get("item_id")?;
            let borrower_id: i32 = row.try_get("borrower_id")?;

            result.push(OccupiedSlot {
                borrow: Borrow {
                    id: row.try_get("id")?,
                    borrower_id: Some(borrower_id),
                    item_id: Some(item_id),
                    room_id: row.try_get("room_id")?,
                    quantity: row.try_get("quantity")?,
                    date_borrowed: row.try_get("date_borrowed")?,
                    due_date: row.try_get("due_date")?,
                    date_returned: row.try_get("date_returned")?,
                    status: row.try_get("status")?,
                    purpose: row.try_get("purpose")?,
                    notes: row.try_get("notes")?,
                },
                item: ItemShort {
                    id: item_id,
                    device_tag: row.try_get("device_tag")?,
                    model: row.try_get("model")?,
                    category: row.try_get("category")?,
                    raw_stock: row.try_get("raw_stock")?,
                },
                borrower: BorrowerShort {
                    id: borrower_id,
                    school_id: row.try_get("school_id")?,
                    firstname: row.try_get("firstname")?,
                    lastname: row.try_get("lastname")?,
                    borrower_type: row.try_get("borrower_type")?,
                },
            });
        }

        Ok(result)
    }
}
