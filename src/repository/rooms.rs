//! Rooms repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult, Resource},
    models::{
        enums::RecordStatus,
        room::{CreateRoom, Room},
    },
};

#[derive(Clone)]
pub struct RoomsRepository {
    pool: Pool<Postgres>,
}

impl RoomsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Room> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound(Resource::Room(id)))
    }

    pub async fn list(&self) -> AppResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rooms)
    }

    pub async fn create(&self, data: &CreateRoom) -> AppResult<Room> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (name, description, status, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(RecordStatus::Active)
        .fetch_one(&self.pool)
        .await?;
        Ok(room)
    }
}
