//! Borrowers repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult, Resource},
    models::{
        borrower::{Borrower, NewBorrower},
        enums::{BorrowerType, RecordStatus},
    },
};

#[derive(Clone)]
pub struct BorrowersRepository {
    pool: Pool<Postgres>,
}

impl BorrowersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrower by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrower> {
        sqlx::query_as::<_, Borrower>("SELECT * FROM borrowers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound(Resource::Borrower(id)))
    }

    /// List all borrowers
    pub async fn list(&self) -> AppResult<Vec<Borrower>> {
        let borrowers =
            sqlx::query_as::<_, Borrower>("SELECT * FROM borrowers ORDER BY lastname, firstname")
                .fetch_all(&self.pool)
                .await?;
        Ok(borrowers)
    }

    /// School IDs of one type sharing a `PREFIX-YEAR-` scope, highest first
    pub async fn school_ids_in_scope(
        &self,
        scope: &str,
        borrower_type: BorrowerType,
    ) -> AppResult<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT school_id FROM borrowers
            WHERE school_id LIKE $1 AND borrower_type = $2
            ORDER BY school_id DESC
            "#,
        )
        .bind(format!("{}%", scope))
        .bind(borrower_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    /// Insert a borrower; the unique index on `school_id` rejects duplicates
    pub async fn create(&self, data: &NewBorrower) -> AppResult<Borrower> {
        let result = sqlx::query_as::<_, Borrower>(
            r#"
            INSERT INTO borrowers (school_id, firstname, lastname, gender, contact, department,
                                   year_section, borrower_type, password, status,
                                   created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(&data.school_id)
        .bind(&data.firstname)
        .bind(&data.lastname)
        .bind(&data.gender)
        .bind(&data.contact)
        .bind(&data.department)
        .bind(&data.year_section)
        .bind(data.borrower_type)
        .bind(&data.password_hash)
        .bind(RecordStatus::Active)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(borrower) => Ok(borrower),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
                format!("School ID {} already exists", data.school_id),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Set borrower status (soft delete / reactivation)
    pub async fn set_status(&self, id: i32, status: RecordStatus) -> AppResult<Borrower> {
        sqlx::query_as::<_, Borrower>(
            "UPDATE borrowers SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound(Resource::Borrower(id)))
    }
}
